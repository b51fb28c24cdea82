//! Field-bag normalization
//!
//! The remote source returns loosely-typed field bags whose key spellings
//! drifted over the life of the base (`Themes` vs `Theme Tags`,
//! `Story Transcript` vs `Transcript`). All alternate-name probing is
//! confined to this module: one normalization function per entity type
//! converts a raw record into a typed one, defaulting explicitly per
//! missing field. Downstream stages only ever see the typed shapes.

use chrono::NaiveDate;
use sb_common::types::{AnonymityLevel, ConsentLevel, PersonRole, PersonSummary, RawRecord};
use serde_json::{Map, Value};

/// Typed story fields after normalization, before privacy filtering.
#[derive(Debug, Clone)]
pub struct StoryFields {
    pub id: String,
    pub title: String,
    pub quote: String,
    /// Raw transcript text; never leaves the pipeline unredacted
    pub transcript: Option<String>,
    pub themes: Vec<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub consent_level: ConsentLevel,
    pub anonymity: AnonymityLevel,
    /// Program/cohort tag; stories outside the expected cohort are dropped
    pub program: Option<String>,
    pub featured: bool,
    pub storyteller_ids: Vec<String>,
    pub media: Vec<MediaAttachment>,
}

/// One media attachment linked from a story.
#[derive(Debug, Clone)]
pub struct MediaAttachment {
    pub id: String,
    pub url: String,
    pub filename: String,
}

/// Normalize a raw story record.
pub fn normalize_story(record: &RawRecord) -> StoryFields {
    let fields = &record.fields;
    StoryFields {
        id: record.id.clone(),
        title: first_str(fields, &["Title", "Story Title"])
            .unwrap_or("Untitled Story")
            .to_string(),
        quote: first_str(fields, &["Quote", "Pull Quote"])
            .unwrap_or_default()
            .to_string(),
        transcript: first_str(fields, &["Story Transcript", "Transcript", "Content"])
            .map(str::to_string),
        themes: string_list(fields, &["Themes", "Theme Tags"]),
        location: first_str(fields, &["Location", "City"]).map(str::to_string),
        date: first_str(fields, &["Date", "Story Date"])
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()),
        consent_level: ConsentLevel::parse(first_str(fields, &["Consent Level", "Consent Status"])),
        anonymity: AnonymityLevel::parse(first_str(fields, &["Anonymity Level", "Anonymity"])),
        program: first_str(fields, &["Project", "Program"]).map(str::to_string),
        featured: first_bool(fields, &["Featured"]),
        storyteller_ids: string_list(fields, &["Storytellers", "Storyteller"]),
        media: attachments(fields, &["Media", "Photos"]),
    }
}

/// Normalize a raw person record.
///
/// `source_role` is the table the record came from; the person tables
/// carry no explicit role field, so membership is the role.
pub fn normalize_person(record: &RawRecord, source_role: PersonRole) -> PersonSummary {
    let fields = &record.fields;
    let anonymity = AnonymityLevel::parse(first_str(fields, &["Anonymity Level", "Anonymity"]));
    PersonSummary {
        id: record.id.clone(),
        name: first_str(fields, &["Name", "Full Name"])
            .unwrap_or("Unknown")
            .to_string(),
        role: source_role,
        location: first_str(fields, &["Location", "City"]).map(str::to_string),
        anonymous: anonymity == AnonymityLevel::Anonymous,
        anonymity,
    }
}

// ============================================================================
// Probing helpers
// ============================================================================

/// First non-empty string value under any of the candidate keys.
fn first_str<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// First array-of-strings under any candidate key; a bare string counts
/// as a single-element list.
fn string_list(fields: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    for key in keys {
        match fields.get(*key) {
            Some(Value::Array(items)) => {
                return items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
            }
            Some(Value::String(s)) if !s.trim().is_empty() => {
                return vec![s.trim().to_string()];
            }
            _ => continue,
        }
    }
    Vec::new()
}

fn first_bool(fields: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .filter_map(Value::as_bool)
        .next()
        .unwrap_or(false)
}

/// Attachment arrays carry `{id, url, filename}` objects; entries missing
/// a url are unusable and skipped.
fn attachments(fields: &Map<String, Value>, keys: &[&str]) -> Vec<MediaAttachment> {
    for key in keys {
        if let Some(Value::Array(items)) = fields.get(*key) {
            return items
                .iter()
                .filter_map(|item| {
                    let id = item.get("id")?.as_str()?.to_string();
                    let url = item.get("url")?.as_str()?.to_string();
                    let filename = item
                        .get("filename")
                        .and_then(Value::as_str)
                        .unwrap_or(&id)
                        .to_string();
                    Some(MediaAttachment { id, url, filename })
                })
                .collect();
        }
    }
    Vec::new()
}

// ============================================================================
// Tests
// ============================================================================
