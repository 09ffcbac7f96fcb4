//! Card snapshot types.
//!
//! - [`CardSnapshot`] - One point-in-time result of the extraction pipeline
//! - [`SnapshotStatus`] - How that extraction ended

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::CoreError;

// ============================================================================
// Snapshot Status
// ============================================================================

/// Outcome of one authentication-plus-extraction sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    /// Card name extracted; owners may be empty.
    Ok,
    /// Credentials rejected or the session expired.
    AuthFailed,
    /// The target page (or the site itself) could not be loaded.
    PageUnavailable,
    /// The page loaded but the card container was not found.
    SelectorMiss,
    /// Transport failure or timeout.
    NetworkError,
}

impl SnapshotStatus {
    /// Returns a short label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::AuthFailed => "auth failed",
            Self::PageUnavailable => "page unavailable",
            Self::SelectorMiss => "selector miss",
            Self::NetworkError => "network error",
        }
    }

    /// Returns true for every status other than [`SnapshotStatus::Ok`].
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Ok)
    }

    /// Returns true if a snapshot with this status may be served again
    /// from a cache instead of refetching.
    ///
    /// `AuthFailed` needs a new login and `NetworkError` is transient, so
    /// both always trigger a fresh attempt.
    pub fn is_reusable(&self) -> bool {
        !matches!(self, Self::AuthFailed | Self::NetworkError)
    }
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Card Snapshot
// ============================================================================

/// The boosted card and its current owners, as seen at `fetched_at`.
///
/// Immutable once constructed. A snapshot with status `Ok` always has a
/// non-empty card name; every other status carries empty fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSnapshot {
    card_name: String,
    owners: Vec<String>,
    fetched_at: DateTime<Utc>,
    status: SnapshotStatus,
}

impl CardSnapshot {
    /// Creates a successful snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if `card_name` is empty after
    /// trimming.
    pub fn ok(card_name: impl Into<String>, owners: Vec<String>) -> Result<Self, CoreError> {
        let card_name = card_name.into();
        if card_name.trim().is_empty() {
            return Err(CoreError::InvalidData(
                "card name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            card_name,
            owners,
            fetched_at: Utc::now(),
            status: SnapshotStatus::Ok,
        })
    }

    /// Creates a failed snapshot with empty fields.
    ///
    /// Passing [`SnapshotStatus::Ok`] is a logic error; it is recorded as
    /// [`SnapshotStatus::SelectorMiss`] since no card name exists.
    pub fn failed(status: SnapshotStatus) -> Self {
        debug_assert!(status.is_failure(), "failed() called with Ok status");
        let status = if status.is_failure() {
            status
        } else {
            SnapshotStatus::SelectorMiss
        };

        Self {
            card_name: String::new(),
            owners: Vec::new(),
            fetched_at: Utc::now(),
            status,
        }
    }

    /// The card name (empty unless status is `Ok`).
    pub fn card_name(&self) -> &str {
        &self.card_name
    }

    /// Current owners in page order, duplicates preserved.
    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    /// When the snapshot was produced.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Outcome of the fetch.
    pub fn status(&self) -> SnapshotStatus {
        self.status
    }

    /// Returns true if the status is `Ok`.
    pub fn is_ok(&self) -> bool {
        self.status == SnapshotStatus::Ok
    }

    /// Returns true if the caller must log in again before the next attempt.
    pub fn requires_reauth(&self) -> bool {
        self.status == SnapshotStatus::AuthFailed
    }

    /// Returns true if the card currently has no owners.
    pub fn has_no_owners(&self) -> bool {
        self.is_ok() && self.owners.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
