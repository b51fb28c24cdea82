//! End-to-end sync pipeline
//!
//! Fetch → normalize → privacy-filter → resolve → aggregate → persist →
//! download. Table fetches are all-or-nothing: the first failed fetch
//! aborts the run before anything is written, so a half-synced data
//! directory never exists. Media downloads run last and are best-effort.

pub mod aggregate;
pub mod download;
pub mod privacy;
pub mod resolve;

use crate::airtable::{fields, AirtableClient};
use crate::pipeline::privacy::initials;
use sb_common::store::{self, ArtifactPaths};
use sb_common::types::{AnonymityLevel, PersonRole, PersonSummary, Story};
use sb_common::Result;
use tracing::info;

/// Cohort tag a story must carry to be exported
pub const EXPECTED_PROGRAM: &str = "Storybank";

/// Source table names
const STORIES_TABLE: &str = "Stories";
const STORYTELLERS_TABLE: &str = "Storytellers";
const FRIENDS_TABLE: &str = "Friends";
const VOLUNTEERS_TABLE: &str = "Volunteers";

/// Counts reported after a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub stories_exported: usize,
    pub stories_dropped: usize,
    pub people: usize,
    pub media: download::DownloadStats,
}

/// Run the full sync into the given data directory.
///
/// # Errors
/// Fatal on any table fetch failure or artifact write failure. Media
/// download failures are tallied, not fatal.
pub async fn run(client: &AirtableClient, paths: &ArtifactPaths) -> Result<RunSummary> {
    // All four fetches must succeed before any output is written.
    let raw_stories = client.fetch_all(STORIES_TABLE).await?;
    let raw_storytellers = client.fetch_all(STORYTELLERS_TABLE).await?;
    let raw_friends = client.fetch_all(FRIENDS_TABLE).await?;
    let raw_volunteers = client.fetch_all(VOLUNTEERS_TABLE).await?;

    let people = resolve::build_person_map(&raw_storytellers, &raw_friends, &raw_volunteers);

    let total_fetched = raw_stories.len();
    let mut attachments = Vec::new();
    let mut stories: Vec<Story> = Vec::with_capacity(total_fetched);
    for record in &raw_stories {
        let fields = fields::normalize_story(record);
        let Some(fields) = privacy::retain_for_cohort(fields, EXPECTED_PROGRAM) else {
            continue;
        };
        attachments.extend(fields.media.iter().cloned());
        stories.push(resolve::resolve_story(fields, &people));
    }
    let dropped = total_fetched - stories.len();
    info!(
        exported = stories.len(),
        dropped,
        "Privacy filter applied"
    );

    let storyteller_count = raw_storytellers.len();
    let snapshot = aggregate::build_snapshot(&stories, storyteller_count);
    let filter_index = aggregate::build_filter_index(&stories);
    let search_index = aggregate::build_search_index(&stories);
    let people_export = export_people(&people);

    store::write_json(&paths.stories(), &stories)?;
    store::write_json(&paths.storytellers(), &people_export)?;
    store::write_json(&paths.analytics(), &snapshot)?;
    store::write_json(&paths.filters(), &filter_index)?;
    store::write_json(&paths.search(), &search_index)?;
    for story in &stories {
        store::write_json(&paths.story_full(&story.id), story)?;
    }

    let media = download::download_media(&attachments, &paths.media_dir()).await?;

    Ok(RunSummary {
        stories_exported: stories.len(),
        stories_dropped: dropped,
        people: people_export.len(),
        media,
    })
}

/// Person summaries safe for the public export.
///
/// The anonymity transform applies here too: an `Initials` person is
/// listed by initials, an `Anonymous` person as "Anonymous". Sorted by
/// id so reruns produce identical files.
fn export_people(people: &std::collections::HashMap<String, PersonSummary>) -> Vec<PersonSummary> {
    let mut out: Vec<PersonSummary> = people
        .values()
        .filter(|p| p.role == PersonRole::Storyteller)
        .map(|person| {
            let name = match person.anonymity {
                AnonymityLevel::FullName => person.name.clone(),
                AnonymityLevel::Initials => initials(&person.name),
                AnonymityLevel::Anonymous => "Anonymous".to_string(),
            };
            PersonSummary {
                name,
                ..person.clone()
            }
        })
        .collect();
    out.sort_by(|a, b| a.id.cmp(&b.id));
    out
}

// ============================================================================
// Tests
// ============================================================================
