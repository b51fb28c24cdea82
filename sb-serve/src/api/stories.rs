//! Story list and per-story endpoints
//!
//! The list endpoint reads `stories.json` through the TTL cache and
//! applies query-parameter filters in order: theme, location, featured,
//! then limit. The per-story endpoint reads the full file directly; a
//! missing id is a 404, not an empty body.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use sb_common::store;
use sb_common::types::Story;
use serde::Deserialize;

/// Query parameters for GET /api/stories, all optional.
#[derive(Debug, Default, Deserialize)]
pub struct StoriesQuery {
    pub theme: Option<String>,
    pub location: Option<String>,
    pub featured: Option<bool>,
    pub limit: Option<usize>,
}

/// GET /api/stories
pub async fn list_stories(
    State(state): State<AppState>,
    Query(query): Query<StoriesQuery>,
) -> Result<Json<Vec<Story>>, ApiError> {
    let stories = state
        .stories_cache
        .get_or_load(|| store::read_json::<Vec<Story>>(&state.paths.stories()))?;

    Ok(Json(apply_filters(&stories, &query)))
}

/// GET /api/stories/:id
pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Story>, ApiError> {
    let story: Story = store::read_json(&state.paths.story_full(&id))
        .map_err(|err| match err {
            sb_common::Error::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound => {
                ApiError::NotFound(format!("No story with id '{}'", id))
            }
            other => other.into(),
        })?;
    Ok(Json(story))
}

/// Filter and truncate the story list per the query.
pub fn apply_filters(stories: &[Story], query: &StoriesQuery) -> Vec<Story> {
    let mut out: Vec<Story> = stories
        .iter()
        .filter(|story| match &query.theme {
            Some(theme) => story.themes.iter().any(|t| t == theme),
            None => true,
        })
        .filter(|story| match &query.location {
            Some(location) => story.location.as_deref() == Some(location.as_str()),
            None => true,
        })
        .filter(|story| match query.featured {
            Some(featured) => story.featured == featured,
            None => true,
        })
        .cloned()
        .collect();

    if let Some(limit) = query.limit {
        out.truncate(limit);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
