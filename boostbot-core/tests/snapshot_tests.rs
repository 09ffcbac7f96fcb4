//! Integration tests for core snapshot types.

use boostbot_core::{CardSnapshot, SnapshotStatus};

#[test]
fn test_snapshot_json_shape() {
    let snapshot =
        CardSnapshot::ok("Sakura Card", vec!["UserA".to_string(), "UserB".to_string()]).unwrap();
    let value = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(value["card_name"], "Sakura Card");
    assert_eq!(value["owners"][1], "UserB");
    assert_eq!(value["status"], "ok");
    assert!(value["fetched_at"].is_string());
}

#[test]
fn test_owner_order_and_duplicates_preserved() {
    let owners = vec![
        "UserB".to_string(),
        "UserA".to_string(),
        "UserB".to_string(),
    ];
    let snapshot = CardSnapshot::ok("Card", owners.clone()).unwrap();
    assert_eq!(snapshot.owners(), owners.as_slice());
}

#[test]
fn test_failure_statuses() {
    for status in [
        SnapshotStatus::AuthFailed,
        SnapshotStatus::PageUnavailable,
        SnapshotStatus::SelectorMiss,
        SnapshotStatus::NetworkError,
    ] {
        let snapshot = CardSnapshot::failed(status);
        assert_eq!(snapshot.status(), status);
        assert!(!snapshot.is_ok());
    }
}
