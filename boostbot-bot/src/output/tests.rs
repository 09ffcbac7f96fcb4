//! Output formatting tests.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use boostbot_core::{CardSnapshot, SnapshotStatus, StrategyKind};
    use boostbot_fetch::StrategyInfo;

    fn strategy() -> StrategyInfo {
        StrategyInfo {
            id: "http.challenge".to_string(),
            kind: StrategyKind::Challenge,
        }
    }

    #[test]
    fn test_ok_snapshot_lists_owners() {
        let formatter = TextFormatter::new(false);
        let owners = vec!["UserA".to_string(), "UserB".to_string()];
        let snapshot = CardSnapshot::ok("Sakura Card", owners).unwrap();

        let output = formatter.format_snapshot(&snapshot, &strategy());
        assert!(output.starts_with("Boosted card (http.challenge, "));
        assert!(output.contains("Status:  ok"));
        assert!(output.contains("Card:    Sakura Card"));
        assert!(output.contains("Owners:  2\n  - UserA\n  - UserB"));
    }

    #[test]
    fn test_no_owners() {
        let formatter = TextFormatter::new(false);
        let snapshot = CardSnapshot::ok("Sakura Card", Vec::new()).unwrap();

        let output = formatter.format_snapshot(&snapshot, &strategy());
        assert!(output.ends_with("Owners:  none"));
    }

    #[test]
    fn test_failure_has_no_card_lines() {
        let formatter = TextFormatter::new(false);
        let snapshot = CardSnapshot::failed(SnapshotStatus::AuthFailed);

        let output = formatter.format_snapshot(&snapshot, &strategy());
        assert!(output.contains("Status:  auth failed"));
        assert!(!output.contains("Card:"));
    }

    #[test]
    fn test_status_colors() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.format_status(SnapshotStatus::Ok).contains("\x1b[32m"));
        assert!(formatter.format_status(SnapshotStatus::SelectorMiss).contains("\x1b[33m"));
        assert!(formatter.format_status(SnapshotStatus::NetworkError).contains("\x1b[31m"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use boostbot_core::{CardSnapshot, SnapshotStatus, StrategyKind};
    use boostbot_fetch::StrategyInfo;

    fn strategy() -> StrategyInfo {
        StrategyInfo {
            id: "http.plain".to_string(),
            kind: StrategyKind::Plain,
        }
    }

    #[test]
    fn test_ok_snapshot_json() {
        let formatter = JsonFormatter::new(false);
        let snapshot = CardSnapshot::ok("Sakura Card", vec!["UserA".to_string()]).unwrap();

        let json = formatter.format_snapshot(&snapshot, &strategy()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "ok");
        assert_eq!(value["cardName"], "Sakura Card");
        assert_eq!(value["owners"], serde_json::json!(["UserA"]));
        assert_eq!(value["strategy"], "http.plain");
        assert_eq!(value["strategyKind"], "plain");
        assert!(value["fetchedAt"].is_string());
    }

    #[test]
    fn test_failed_snapshot_omits_card_name() {
        let formatter = JsonFormatter::new(true);
        let snapshot = CardSnapshot::failed(SnapshotStatus::SelectorMiss);

        let json = formatter.format_snapshot(&snapshot, &strategy()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "selector_miss");
        assert!(value.get("cardName").is_none());
        assert!(json.contains('\n'));
    }
}
