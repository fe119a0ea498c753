use autotag::boundary::BoundaryWarning;
use autotag::domain::{RepositoryFacts, TagListing, VersionTagPlanner};
use autotag::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_unparsable_tag_display() {
    let warning = BoundaryWarning::UnparsableTag {
        tag: "release-123".to_string(),
        reason: "Invalid format".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("release-123"),
        "Message should contain the tag, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("0.0.0"),
        "Message should mention the fallback version, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_no_tags_display() {
    let display_msg = BoundaryWarning::NoTagsFound.to_string();
    assert!(
        display_msg.contains("No tags found"),
        "Message should contain 'No tags found', got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_non_semver_tags_display() {
    let warning = BoundaryWarning::NonSemverTags {
        tags: vec!["nightly".to_string(), "release-1".to_string()],
    };

    assert_eq!(
        warning.to_string(),
        "2 tag(s) do not follow semantic versioning: nightly, release-1"
    );
}

// ============================================================================
// Warnings raised while planning
// ============================================================================

#[test]
fn test_unparsable_latest_tag_produces_warning() {
    let facts = RepositoryFacts {
        branch: "main".to_string(),
        tags: vec!["release-candidate".to_string()],
        ..Default::default()
    };

    let context = VersionTagPlanner::default().analyze(&facts);
    match context.warnings.as_slice() {
        [BoundaryWarning::UnparsableTag { tag, reason }] => {
            assert_eq!(tag, "release-candidate");
            assert!(!reason.is_empty());
        }
        other => panic!("expected one unparsable tag warning, got {:?}", other),
    }
}

#[test]
fn test_listing_reports_non_semver_tags() {
    let facts = RepositoryFacts {
        tags: vec!["v1.0.0".to_string(), "latest".to_string()],
        ..Default::default()
    };

    let listing = TagListing::from_facts(&facts);
    assert_eq!(
        listing.warnings(),
        vec![BoundaryWarning::NonSemverTags {
            tags: vec!["latest".to_string()]
        }]
    );
}

#[test]
fn test_display_boundary_warning() {
    // Visual verification test - output is printed to stderr
    ui::display_boundary_warning(&BoundaryWarning::NoTagsFound);
}
