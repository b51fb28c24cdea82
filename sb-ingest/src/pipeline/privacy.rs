//! Consent-driven privacy filter
//!
//! The core invariant of the whole pipeline lives here: no story leaving
//! this module exposes transcript text unless its consent level permits
//! sharing. Consent strings are matched case-sensitively; anything
//! unrecognized lands in the strictest tier.
//!
//! Policy:
//! - `Public` / `Commercial`: content visible, name subject to the
//!   anonymity transform.
//! - `Internal`: content replaced with [`INTERNAL_PLACEHOLDER`].
//! - anything else: content replaced with [`PENDING_PLACEHOLDER`] and the
//!   record treated as fully anonymous.
//! - a story whose program tag does not match the expected cohort is
//!   dropped entirely, not redacted.

use crate::airtable::fields::StoryFields;
use sb_common::types::{AnonymityLevel, ConsentLevel};

/// Content shown for Internal-consent stories
pub const INTERNAL_PLACEHOLDER: &str =
    "This story is shared within the program community only.";

/// Content shown when consent is missing or unrecognized
pub const PENDING_PLACEHOLDER: &str = "This story is awaiting consent review.";

/// Whether a story belongs to the expected cohort.
///
/// Missing tag or mismatched tag both disqualify the record.
pub fn cohort_matches(program: Option<&str>, expected: &str) -> bool {
    program == Some(expected)
}

/// Redact transcript content according to consent level.
pub fn redact(consent: ConsentLevel, transcript: Option<&str>) -> String {
    match consent {
        ConsentLevel::Public | ConsentLevel::Commercial => {
            transcript.unwrap_or_default().to_string()
        }
        ConsentLevel::Internal => INTERNAL_PLACEHOLDER.to_string(),
        ConsentLevel::Unknown => PENDING_PLACEHOLDER.to_string(),
    }
}

/// Apply the anonymity transform to a display name.
///
/// Returns `(name, anonymous)`. Unknown consent overrides everything:
/// the record is fully anonymous regardless of the stated anonymity level.
pub fn display_name(
    consent: ConsentLevel,
    anonymity: AnonymityLevel,
    full_name: &str,
) -> (Option<String>, bool) {
    if consent == ConsentLevel::Unknown {
        return (None, true);
    }
    match anonymity {
        AnonymityLevel::FullName => (Some(full_name.to_string()), false),
        AnonymityLevel::Initials => (Some(initials(full_name)), false),
        AnonymityLevel::Anonymous => (None, true),
    }
}

/// First letter of each name token, joined with `.` and terminated with
/// one: `"Jane Doe"` → `"J.D."`.
pub fn initials(name: &str) -> String {
    let mut out = String::new();
    for token in name.split_whitespace() {
        if let Some(first) = token.chars().next() {
            out.push(first);
            out.push('.');
        }
    }
    out
}

/// Drop stories outside the expected cohort; pass the rest through.
///
/// Redaction itself happens during resolution, where the storyteller's
/// anonymity level is known.
pub fn retain_for_cohort(fields: StoryFields, expected_program: &str) -> Option<StoryFields> {
    if cohort_matches(fields.program.as_deref(), expected_program) {
        Some(fields)
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
