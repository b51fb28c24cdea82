//! Derived artifacts: analytics, filters, search index
//!
//! Every builder here is a pure function of the sanitized story list, so
//! rerunning the pipeline over unchanged input produces byte-identical
//! JSON. Tag lists come out sorted; counts preserve that order.

use sb_common::types::{AnalyticsSnapshot, CountedTag, FilterIndex, SearchEntry, Story};
use std::collections::{BTreeMap, BTreeSet};

/// Build the analytics snapshot over the filtered story list.
pub fn build_snapshot(stories: &[Story], total_storytellers: usize) -> AnalyticsSnapshot {
    let mut consent_levels: BTreeMap<String, usize> = BTreeMap::new();
    for story in stories {
        *consent_levels
            .entry(story.consent_level.as_str().to_string())
            .or_insert(0) += 1;
    }

    AnalyticsSnapshot {
        total_stories: stories.len(),
        total_storytellers,
        themes: counted_tags(stories, |s| s.themes.as_slice()),
        locations: counted_tags(stories, |s| {
            s.location.as_slice()
        }),
        consent_levels,
    }
}

/// Sorted-unique theme and location lists for filter dropdowns.
pub fn build_filter_index(stories: &[Story]) -> FilterIndex {
    FilterIndex {
        themes: sorted_unique(stories.iter().flat_map(|s| s.themes.iter())),
        locations: sorted_unique(stories.iter().filter_map(|s| s.location.as_ref())),
    }
}

/// Flat search entries, one per story.
///
/// The storyteller column is a plain display string; anonymous records
/// show as "Anonymous" rather than an empty cell.
pub fn build_search_index(stories: &[Story]) -> Vec<SearchEntry> {
    stories
        .iter()
        .map(|story| SearchEntry {
            id: story.id.clone(),
            title: story.title.clone(),
            quote: story.quote.clone(),
            themes: story.themes.clone(),
            location: story.location.clone(),
            storyteller: story
                .storyteller
                .name
                .clone()
                .unwrap_or_else(|| "Anonymous".to_string()),
        })
        .collect()
}

/// Tally tag occurrences across stories, sorted by tag name.
fn counted_tags<'a, F, I>(stories: &'a [Story], tags_of: F) -> Vec<CountedTag>
where
    F: Fn(&'a Story) -> I,
    I: IntoIterator<Item = &'a String>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for story in stories {
        for tag in tags_of(story) {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(name, count)| CountedTag {
            name: name.to_string(),
            count,
        })
        .collect()
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let set: BTreeSet<&str> = values.map(String::as_str).collect();
    set.into_iter().map(str::to_string).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sb_common::types::{ConsentLevel, StorytellerRef};

    fn story(id: &str, themes: &[&str], location: Option<&str>, consent: ConsentLevel) -> Story {
        Story {
            id: id.to_string(),
            title: format!("Story {id}"),
            quote: String::new(),
            content: String::new(),
            themes: themes.iter().map(|t| t.to_string()).collect(),
            location: location.map(str::to_string),
            date: None,
            storyteller: StorytellerRef::anonymous_placeholder(),
            consent_level: consent,
            featured: false,
            media: Vec::new(),
        }
    }

    #[test]
    fn test_snapshot_counts() {
        let stories = vec![
            story("s1", &["Home", "Belonging"], Some("Melbourne"), ConsentLevel::Public),
            story("s2", &["Home"], Some("Sydney"), ConsentLevel::Internal),
            story("s3", &[], Some("Melbourne"), ConsentLevel::Public),
        ];
        let snapshot = build_snapshot(&stories, 2);

        assert_eq!(snapshot.total_stories, 3);
        assert_eq!(snapshot.total_storytellers, 2);
        assert_eq!(
            snapshot.themes,
            vec![
                CountedTag { name: "Belonging".to_string(), count: 1 },
                CountedTag { name: "Home".to_string(), count: 2 },
            ]
        );
        assert_eq!(
            snapshot.locations,
            vec![
                CountedTag { name: "Melbourne".to_string(), count: 2 },
                CountedTag { name: "Sydney".to_string(), count: 1 },
            ]
        );
        assert_eq!(snapshot.consent_levels["Public"], 2);
        assert_eq!(snapshot.consent_levels["Internal"], 1);
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let stories = vec![
            story("s1", &["Zeal", "Arrival"], Some("Perth"), ConsentLevel::Public),
            story("s2", &["Arrival"], None, ConsentLevel::Unknown),
        ];
        let a = serde_json::to_vec(&build_snapshot(&stories, 5)).unwrap();
        let b = serde_json::to_vec(&build_snapshot(&stories, 5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_filter_index_sorted_unique() {
        let stories = vec![
            story("s1", &["Home", "Arrival"], Some("Sydney"), ConsentLevel::Public),
            story("s2", &["Home"], Some("Melbourne"), ConsentLevel::Public),
            story("s3", &[], None, ConsentLevel::Public),
        ];
        let filters = build_filter_index(&stories);
        assert_eq!(filters.themes, vec!["Arrival", "Home"]);
        assert_eq!(filters.locations, vec!["Melbourne", "Sydney"]);
    }

    #[test]
    fn test_search_index_anonymous_display() {
        let mut named = story("s1", &[], None, ConsentLevel::Public);
        named.storyteller = StorytellerRef {
            id: "recP1".to_string(),
            name: Some("J.D.".to_string()),
            role: sb_common::types::PersonRole::Storyteller,
            anonymous: false,
        };
        let mut anon = story("s2", &[], None, ConsentLevel::Public);
        anon.storyteller.name = None;

        let entries = build_search_index(&[named, anon]);
        assert_eq!(entries[0].storyteller, "J.D.");
        assert_eq!(entries[1].storyteller, "Anonymous");
    }
}
