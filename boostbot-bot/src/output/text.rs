//! Text output formatting with colors.

use boostbot_core::{CardSnapshot, SnapshotStatus};
use boostbot_fetch::StrategyInfo;
use chrono::{DateTime, Local, Utc};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats a snapshot for the terminal.
    pub fn format_snapshot(&self, snapshot: &CardSnapshot, strategy: &StrategyInfo) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            self.bold("Boosted card"),
            self.dim(&format!("({}, {})", strategy.id, format_time(snapshot.fetched_at())))
        ));
        lines.push(format!("Status:  {}", self.format_status(snapshot.status())));

        if snapshot.is_ok() {
            lines.push(format!("Card:    {}", self.bold(snapshot.card_name())));
            if snapshot.has_no_owners() {
                lines.push(format!("Owners:  {}", self.dim("none")));
            } else {
                lines.push(format!("Owners:  {}", snapshot.owners().len()));
                for owner in snapshot.owners() {
                    lines.push(format!("  - {owner}"));
                }
            }
        }

        lines.join("\n")
    }

    /// Formats a status label.
    pub fn format_status(&self, status: SnapshotStatus) -> String {
        let label = status.label();
        match status {
            SnapshotStatus::Ok => self.paint(GREEN, label),
            SnapshotStatus::SelectorMiss => self.paint(YELLOW, label),
            SnapshotStatus::AuthFailed
            | SnapshotStatus::PageUnavailable
            | SnapshotStatus::NetworkError => self.paint(RED, label),
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
