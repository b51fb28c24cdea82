//! Story ↔ person resolution
//!
//! Links each story to its storyteller by record id and applies the
//! privacy policy with the storyteller's anonymity preference in hand.
//! A dangling or missing link never drops a story; the record gets the
//! synthetic anonymous placeholder so every emitted story carries a
//! storyteller.

use crate::airtable::fields::{normalize_person, StoryFields};
use crate::pipeline::privacy;
use sb_common::types::{
    ConsentLevel, PersonRole, PersonSummary, RawRecord, Story, StorytellerRef,
};
use std::collections::HashMap;
use tracing::warn;

/// Build the id → person lookup from all three person tables.
///
/// The source table determines the role; later tables never overwrite an
/// id already present (a person listed as a storyteller stays one).
pub fn build_person_map(
    storytellers: &[RawRecord],
    friends: &[RawRecord],
    volunteers: &[RawRecord],
) -> HashMap<String, PersonSummary> {
    let mut people = HashMap::new();
    let sources = [
        (storytellers, PersonRole::Storyteller),
        (friends, PersonRole::Friend),
        (volunteers, PersonRole::Volunteer),
    ];
    for (records, role) in sources {
        for record in records {
            let person = normalize_person(record, role);
            people.entry(person.id.clone()).or_insert(person);
        }
    }
    people
}

/// Resolve one normalized story into its sanitized export shape.
///
/// Only the first linked storyteller is used; additional links are
/// ignored. Redaction happens here because the display name depends on
/// both the story's consent and the person's anonymity preference.
pub fn resolve_story(fields: StoryFields, people: &HashMap<String, PersonSummary>) -> Story {
    let consent = fields.consent_level;
    let storyteller = match fields.storyteller_ids.first() {
        Some(person_id) => match people.get(person_id) {
            Some(person) => storyteller_ref(consent, person),
            None => {
                warn!(
                    story = %fields.id,
                    person = %person_id,
                    "Story links to unknown person; using anonymous placeholder"
                );
                StorytellerRef::anonymous_placeholder()
            }
        },
        None => StorytellerRef::anonymous_placeholder(),
    };

    Story {
        id: fields.id,
        title: fields.title,
        quote: fields.quote,
        content: privacy::redact(consent, fields.transcript.as_deref()),
        themes: fields.themes,
        location: fields.location,
        date: fields.date,
        storyteller,
        consent_level: consent,
        featured: fields.featured,
        media: fields.media.into_iter().map(|m| m.id).collect(),
    }
}

/// Apply the anonymity transform to a known person.
fn storyteller_ref(consent: ConsentLevel, person: &PersonSummary) -> StorytellerRef {
    let (name, anonymous) = privacy::display_name(consent, person.anonymity, &person.name);
    StorytellerRef {
        id: person.id.clone(),
        name,
        role: person.role,
        anonymous,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sb_common::types::AnonymityLevel;
    use serde_json::json;

    fn raw(id: &str, fields: serde_json::Value) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            fields: fields.as_object().unwrap().clone(),
            created_time: Utc::now(),
        }
    }

    fn story_fields(consent: ConsentLevel, storyteller_ids: Vec<&str>) -> StoryFields {
        StoryFields {
            id: "recS1".to_string(),
            title: "Test".to_string(),
            quote: String::new(),
            transcript: Some("The transcript.".to_string()),
            themes: Vec::new(),
            location: None,
            date: None,
            consent_level: consent,
            anonymity: AnonymityLevel::FullName,
            program: Some("Storybank".to_string()),
            featured: false,
            storyteller_ids: storyteller_ids.into_iter().map(String::from).collect(),
            media: Vec::new(),
        }
    }

    #[test]
    fn test_person_map_role_from_table_and_no_overwrite() {
        let tellers = vec![raw("recP1", json!({"Name": "Jane Doe"}))];
        let friends = vec![
            raw("recP1", json!({"Name": "Jane D. (friend copy)"})),
            raw("recP2", json!({"Name": "Sam Roe"})),
        ];
        let map = build_person_map(&tellers, &friends, &[]);

        assert_eq!(map.len(), 2);
        assert_eq!(map["recP1"].role, PersonRole::Storyteller);
        assert_eq!(map["recP1"].name, "Jane Doe");
        assert_eq!(map["recP2"].role, PersonRole::Friend);
    }

    #[test]
    fn test_resolve_links_first_storyteller() {
        let people = build_person_map(
            &[
                raw("recP1", json!({"Name": "Jane Doe", "Anonymity Level": "Full Name"})),
                raw("recP2", json!({"Name": "Sam Roe"})),
            ],
            &[],
            &[],
        );
        let story = resolve_story(
            story_fields(ConsentLevel::Public, vec!["recP1", "recP2"]),
            &people,
        );
        assert_eq!(story.storyteller.id, "recP1");
        assert_eq!(story.storyteller.name.as_deref(), Some("Jane Doe"));
        assert!(!story.storyteller.anonymous);
        assert_eq!(story.content, "The transcript.");
    }

    #[test]
    fn test_dangling_link_gets_placeholder() {
        let people = HashMap::new();
        let story = resolve_story(story_fields(ConsentLevel::Public, vec!["recMissing"]), &people);
        assert_eq!(story.storyteller.id, "anonymous");
        assert_eq!(story.storyteller.name.as_deref(), Some("Anonymous"));
        assert!(story.storyteller.anonymous);
    }

    #[test]
    fn test_no_link_gets_placeholder() {
        let story = resolve_story(story_fields(ConsentLevel::Public, vec![]), &HashMap::new());
        assert_eq!(story.storyteller.id, "anonymous");
    }

    #[test]
    fn test_unknown_consent_anonymizes_known_person() {
        let people = build_person_map(
            &[raw("recP1", json!({"Name": "Jane Doe", "Anonymity Level": "Full Name"}))],
            &[],
            &[],
        );
        let story = resolve_story(story_fields(ConsentLevel::Unknown, vec!["recP1"]), &people);
        // The link survives but the name is withheld
        assert_eq!(story.storyteller.id, "recP1");
        assert!(story.storyteller.name.is_none());
        assert!(story.storyteller.anonymous);
        assert_eq!(story.content, privacy::PENDING_PLACEHOLDER);
    }

    #[test]
    fn test_initials_preference_applied() {
        let people = build_person_map(
            &[raw("recP1", json!({"Name": "Jane Doe", "Anonymity Level": "Initials"}))],
            &[],
            &[],
        );
        let story = resolve_story(story_fields(ConsentLevel::Public, vec!["recP1"]), &people);
        assert_eq!(story.storyteller.name.as_deref(), Some("J.D."));
    }

    #[test]
    fn test_media_ids_carried_through() {
        let mut fields = story_fields(ConsentLevel::Public, vec![]);
        fields.media = vec![crate::airtable::fields::MediaAttachment {
            id: "att1".to_string(),
            url: "https://cdn.example/att1.jpg".to_string(),
            filename: "a.jpg".to_string(),
        }];
        let story = resolve_story(fields, &HashMap::new());
        assert_eq!(story.media, vec!["att1"]);
    }
}
