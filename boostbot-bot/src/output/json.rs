//! JSON output formatting.

use anyhow::Result;
use boostbot_core::{CardSnapshot, SnapshotStatus, StrategyKind};
use boostbot_fetch::StrategyInfo;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// JSON output for one fetch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOutput {
    pub status: SnapshotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_name: Option<String>,
    pub owners: Vec<String>,
    #[serde(serialize_with = "serialize_datetime")]
    pub fetched_at: DateTime<Utc>,
    pub strategy: String,
    pub strategy_kind: StrategyKind,
}

impl SnapshotOutput {
    /// Builds the output from a snapshot.
    pub fn new(snapshot: &CardSnapshot, strategy: &StrategyInfo) -> Self {
        Self {
            status: snapshot.status(),
            card_name: snapshot
                .is_ok()
                .then(|| snapshot.card_name().to_string()),
            owners: snapshot.owners().to_vec(),
            fetched_at: snapshot.fetched_at(),
            strategy: strategy.id.clone(),
            strategy_kind: strategy.kind,
        }
    }
}

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a snapshot.
    pub fn format_snapshot(
        &self,
        snapshot: &CardSnapshot,
        strategy: &StrategyInfo,
    ) -> Result<String> {
        self.format(&SnapshotOutput::new(snapshot, strategy))
    }
}

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}
