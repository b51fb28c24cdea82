//! Integration tests for the offline pipeline stages
//!
//! Exercises normalize → cohort filter → resolve → aggregate → persist
//! over in-memory records, with no network involved. The three-record
//! consent scenario is the canonical privacy check: one public, one
//! internal, one with no consent recorded.

use chrono::Utc;
use sb_common::store::{self, ArtifactPaths};
use sb_common::types::{ConsentLevel, PersonRole, RawRecord, Story};
use sb_ingest::airtable::fields;
use sb_ingest::pipeline::{aggregate, privacy, resolve};
use serde_json::json;

fn record(id: &str, fields: serde_json::Value) -> RawRecord {
    RawRecord {
        id: id.to_string(),
        fields: fields.as_object().unwrap().clone(),
        created_time: Utc::now(),
    }
}

/// Normalize, cohort-filter, and resolve a batch of raw story records.
fn run_offline(
    raw_stories: &[RawRecord],
    raw_storytellers: &[RawRecord],
) -> Vec<Story> {
    let people = resolve::build_person_map(raw_storytellers, &[], &[]);
    raw_stories
        .iter()
        .map(fields::normalize_story)
        .filter_map(|f| privacy::retain_for_cohort(f, "Storybank"))
        .map(|f| resolve::resolve_story(f, &people))
        .collect()
}

#[test]
fn test_consent_scenario_three_records() {
    let storytellers = vec![record(
        "recP1",
        json!({"Name": "Jane Doe", "Anonymity Level": "Full Name"}),
    )];
    let raw_stories = vec![
        record(
            "recS1",
            json!({
                "Title": "Arrival",
                "Story Transcript": "I came with one suitcase.",
                "Consent Level": "Public",
                "Project": "Storybank",
                "Storytellers": ["recP1"],
            }),
        ),
        record(
            "recS2",
            json!({
                "Title": "Community Night",
                "Story Transcript": "Names and details inside.",
                "Consent Level": "Internal",
                "Project": "Storybank",
                "Storytellers": ["recP1"],
            }),
        ),
        record(
            "recS3",
            json!({
                "Title": "Untagged",
                "Story Transcript": "No consent on file.",
                "Project": "Storybank",
                "Storytellers": ["recP1"],
            }),
        ),
    ];

    let stories = run_offline(&raw_stories, &storytellers);
    assert_eq!(stories.len(), 3);

    // Public: content and full name visible
    assert_eq!(stories[0].content, "I came with one suitcase.");
    assert_eq!(stories[0].storyteller.name.as_deref(), Some("Jane Doe"));
    assert!(!stories[0].storyteller.anonymous);

    // Internal: fixed placeholder, no transcript text
    assert_eq!(stories[1].content, privacy::INTERNAL_PLACEHOLDER);
    assert!(!stories[1].content.contains("Names and details"));

    // Missing consent: stricter placeholder and fully anonymous
    assert_eq!(stories[2].content, privacy::PENDING_PLACEHOLDER);
    assert!(stories[2].storyteller.name.is_none());
    assert!(stories[2].storyteller.anonymous);
    assert_eq!(stories[2].consent_level, ConsentLevel::Unknown);
}

#[test]
fn test_no_transcript_text_escapes_unshareable_stories() {
    let raw_stories = vec![
        record(
            "recS1",
            json!({
                "Title": "Internal Only",
                "Story Transcript": "SECRET-MARKER-ONE",
                "Consent Level": "Internal",
                "Project": "Storybank",
            }),
        ),
        record(
            "recS2",
            json!({
                "Title": "Pending",
                "Story Transcript": "SECRET-MARKER-TWO",
                "Project": "Storybank",
            }),
        ),
    ];

    let stories = run_offline(&raw_stories, &[]);
    let serialized = serde_json::to_string(&stories).unwrap();
    assert!(!serialized.contains("SECRET-MARKER-ONE"));
    assert!(!serialized.contains("SECRET-MARKER-TWO"));
}

#[test]
fn test_cohort_mismatch_excluded_from_all_artifacts() {
    let raw_stories = vec![
        record(
            "recS1",
            json!({
                "Title": "Ours",
                "Consent Level": "Public",
                "Project": "Storybank",
                "Themes": ["Home"],
            }),
        ),
        record(
            "recS2",
            json!({
                "Title": "Someone else's",
                "Consent Level": "Public",
                "Project": "Other Program",
                "Themes": ["Leaked"],
            }),
        ),
        record("recS3", json!({"Title": "No program tag"})),
    ];

    let stories = run_offline(&raw_stories, &[]);
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].id, "recS1");

    let filters = aggregate::build_filter_index(&stories);
    assert_eq!(filters.themes, vec!["Home"]);

    let snapshot = aggregate::build_snapshot(&stories, 0);
    assert_eq!(snapshot.total_stories, 1);
}

#[test]
fn test_dangling_storyteller_still_exports() {
    let raw_stories = vec![record(
        "recS1",
        json!({
            "Title": "Orphaned",
            "Consent Level": "Public",
            "Project": "Storybank",
            "Storytellers": ["recGone"],
        }),
    )];

    let stories = run_offline(&raw_stories, &[]);
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].storyteller.id, "anonymous");
    assert_eq!(stories[0].storyteller.name.as_deref(), Some("Anonymous"));
}

#[test]
fn test_artifact_round_trip_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());

    let storytellers = vec![record(
        "recP1",
        json!({"Name": "Jane Doe", "Anonymity Level": "Initials"}),
    )];
    let raw_stories = vec![record(
        "recS1",
        json!({
            "Title": "Round Trip",
            "Quote": "Worth keeping.",
            "Story Transcript": "Full text here.",
            "Consent Level": "Public",
            "Project": "Storybank",
            "Storytellers": ["recP1"],
            "Themes": ["Home"],
        }),
    )];

    let stories = run_offline(&raw_stories, &storytellers);
    store::write_json(&paths.stories(), &stories).unwrap();
    for story in &stories {
        store::write_json(&paths.story_full(&story.id), story).unwrap();
    }

    let back: Vec<Story> = store::read_json(&paths.stories()).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].title, "Round Trip");
    assert_eq!(back[0].storyteller.name.as_deref(), Some("J.D."));
    assert_eq!(back[0].storyteller.role, PersonRole::Storyteller);

    let full: Story = store::read_json(&paths.story_full("recS1")).unwrap();
    assert_eq!(full.id, "recS1");
    assert_eq!(full.content, "Full text here.");
}

#[test]
fn test_camel_case_artifact_keys() {
    let raw_stories = vec![record(
        "recS1",
        json!({
            "Title": "Key Shape",
            "Consent Level": "Internal",
            "Project": "Storybank",
        }),
    )];
    let stories = run_offline(&raw_stories, &[]);
    let value = serde_json::to_value(&stories[0]).unwrap();

    assert!(value.get("consentLevel").is_some());
    assert!(value.get("consent_level").is_none());
    let storyteller = value.get("storyteller").unwrap();
    assert!(storyteller.get("anonymous").is_some());
}
