use git_release::boundary::BoundaryWarning;
use std::path::PathBuf;

#[test]
fn test_changelog_unreadable_display() {
    let warning = BoundaryWarning::ChangelogUnreadable {
        path: PathBuf::from("/repo/CHANGELOG.md"),
        reason: "Permission denied".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("/repo/CHANGELOG.md"),
        "Message should contain the path, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("Permission denied"),
        "Message should contain the reason, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("default changelog"),
        "Message should mention the fallback, got: {}",
        display_msg
    );
}

#[test]
fn test_entry_not_inserted_display() {
    let warning = BoundaryWarning::ChangelogEntryNotInserted {
        path: PathBuf::from("CHANGELOG.md"),
        version: "1.2.3".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No '## ' section"),
        "Message should explain the missing section, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("1.2.3"),
        "Message should contain the version, got: {}",
        display_msg
    );
}

#[test]
fn test_warnings_compare_by_value() {
    let a = BoundaryWarning::ChangelogEntryNotInserted {
        path: PathBuf::from("CHANGELOG.md"),
        version: "1.0.0".to_string(),
    };
    let b = a.clone();
    let c = BoundaryWarning::ChangelogEntryNotInserted {
        path: PathBuf::from("CHANGELOG.md"),
        version: "1.0.1".to_string(),
    };

    assert_eq!(a, b);
    assert_ne!(a, c);
}
