//! Core domain types for the storybank pipeline
//!
//! Everything the ETL emits and the read API serves is defined here:
//! raw tabular records, the consent/anonymity policy enums, the sanitized
//! story shape, aggregate analytics, and photo index records.
//!
//! Artifact-facing types serialize in camelCase because the consuming
//! frontend reads the JSON files directly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ============================================================================
// Raw records from the tabular source
// ============================================================================

/// One record as returned by the remote tabular API.
///
/// `fields` is kept opaque here; normalization into typed records happens
/// at the fetch boundary, not downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Record id assigned by the remote source
    pub id: String,
    /// Untyped field bag
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Record creation timestamp
    #[serde(rename = "createdTime")]
    pub created_time: DateTime<Utc>,
}

// ============================================================================
// Consent and anonymity policy
// ============================================================================

/// Per-story consent level controlling public disclosure.
///
/// Parsing is case-sensitive: `"public"` is NOT `Public` and falls through
/// to `Unknown`, the strictest tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentLevel {
    /// Full public sharing permitted
    Public,
    /// Public sharing permitted, including commercial reuse
    Commercial,
    /// Shared within the program community only
    Internal,
    /// Missing or unrecognized consent value
    Unknown,
}

impl ConsentLevel {
    /// Parse the raw consent field, case-sensitively.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("Public") => ConsentLevel::Public,
            Some("Commercial") => ConsentLevel::Commercial,
            Some("Internal") => ConsentLevel::Internal,
            _ => ConsentLevel::Unknown,
        }
    }

    /// Whether transcript content may appear in public exports.
    pub fn is_shareable(self) -> bool {
        matches!(self, ConsentLevel::Public | ConsentLevel::Commercial)
    }

    /// Stable key for tallies and JSON maps.
    pub fn as_str(self) -> &'static str {
        match self {
            ConsentLevel::Public => "Public",
            ConsentLevel::Commercial => "Commercial",
            ConsentLevel::Internal => "Internal",
            ConsentLevel::Unknown => "Unknown",
        }
    }
}

/// Per-person anonymity preference applied when consent permits sharing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnonymityLevel {
    /// Display the full name
    FullName,
    /// Display initials only (e.g. "J.D.")
    Initials,
    /// No name displayed
    Anonymous,
}

impl AnonymityLevel {
    /// Parse the raw anonymity field. Anything unrecognized is `Anonymous`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("Full Name") => AnonymityLevel::FullName,
            Some("Initials") => AnonymityLevel::Initials,
            _ => AnonymityLevel::Anonymous,
        }
    }
}

// ============================================================================
// People
// ============================================================================

/// Which person table a summary came from; doubles as the display role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonRole {
    Storyteller,
    Friend,
    Volunteer,
}

/// Lookup value for resolving story → person links.
///
/// Built once per unique person id; never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub id: String,
    pub name: String,
    pub role: PersonRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub anonymous: bool,
    pub anonymity: AnonymityLevel,
}

/// The storyteller subset embedded in each emitted story.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorytellerRef {
    pub id: String,
    /// Display name after the anonymity transform; absent when withheld
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: PersonRole,
    pub anonymous: bool,
}

impl StorytellerRef {
    /// Synthetic placeholder used when a story's person link is missing
    /// or dangling. Every emitted story carries a storyteller.
    pub fn anonymous_placeholder() -> Self {
        Self {
            id: "anonymous".to_string(),
            name: Some("Anonymous".to_string()),
            role: PersonRole::Storyteller,
            anonymous: true,
        }
    }
}

// ============================================================================
// Stories
// ============================================================================

/// A sanitized story record, safe for public JSON export.
///
/// Invariant: `content` never carries the raw transcript unless
/// `consent_level.is_shareable()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub quote: String,
    pub content: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub storyteller: StorytellerRef,
    pub consent_level: ConsentLevel,
    #[serde(default)]
    pub featured: bool,
    /// Attachment ids for downstream media download
    #[serde(default)]
    pub media: Vec<String>,
}

/// Flat entry in the search index (`search.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEntry {
    pub id: String,
    pub title: String,
    pub quote: String,
    pub themes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub storyteller: String,
}

// ============================================================================
// Aggregates
// ============================================================================

/// A tag (theme or location) with its story count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedTag {
    pub name: String,
    pub count: usize,
}

/// Derived aggregate counts, recomputed wholesale on every pipeline run.
///
/// A pure function of the filtered story list: the same input always
/// serializes to byte-identical output (BTreeMap keeps tally keys ordered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_stories: usize,
    pub total_storytellers: usize,
    pub themes: Vec<CountedTag>,
    pub locations: Vec<CountedTag>,
    pub consent_levels: BTreeMap<String, usize>,
}

/// Sorted-unique tag lists for the UI filter dropdowns (`filters.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterIndex {
    pub themes: Vec<String>,
    pub locations: Vec<String>,
}

// ============================================================================
// Photos
// ============================================================================

/// GPS coordinates from EXIF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One entry in the photo index (`photo-index.json`), keyed by filename.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Path of the optimized file, relative to the optimized directory
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsPoint>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_parse_case_sensitive() {
        assert_eq!(ConsentLevel::parse(Some("Public")), ConsentLevel::Public);
        assert_eq!(
            ConsentLevel::parse(Some("Commercial")),
            ConsentLevel::Commercial
        );
        assert_eq!(ConsentLevel::parse(Some("Internal")), ConsentLevel::Internal);
        // Case matters: lowercase falls through to the strictest tier
        assert_eq!(ConsentLevel::parse(Some("public")), ConsentLevel::Unknown);
        assert_eq!(ConsentLevel::parse(Some("INTERNAL")), ConsentLevel::Unknown);
        assert_eq!(ConsentLevel::parse(None), ConsentLevel::Unknown);
    }

    #[test]
    fn test_consent_shareable() {
        assert!(ConsentLevel::Public.is_shareable());
        assert!(ConsentLevel::Commercial.is_shareable());
        assert!(!ConsentLevel::Internal.is_shareable());
        assert!(!ConsentLevel::Unknown.is_shareable());
    }

    #[test]
    fn test_anonymity_parse() {
        assert_eq!(
            AnonymityLevel::parse(Some("Full Name")),
            AnonymityLevel::FullName
        );
        assert_eq!(
            AnonymityLevel::parse(Some("Initials")),
            AnonymityLevel::Initials
        );
        assert_eq!(AnonymityLevel::parse(Some("full name")), AnonymityLevel::Anonymous);
        assert_eq!(AnonymityLevel::parse(None), AnonymityLevel::Anonymous);
    }

    #[test]
    fn test_anonymous_placeholder_shape() {
        let anon = StorytellerRef::anonymous_placeholder();
        assert_eq!(anon.id, "anonymous");
        assert_eq!(anon.name.as_deref(), Some("Anonymous"));
        assert!(anon.anonymous);
    }
}
