//! sb-serve library - JSON read API
//!
//! Thin read layer over the artifacts the pipelines write. Handlers
//! read JSON files (the story list through a TTL cache); the photo
//! index is loaded once at startup and served from memory, never from
//! disk at request time.

use crate::cache::TtlCache;
use axum::routing::get;
use axum::Router;
use sb_common::store::{self, ArtifactPaths};
use sb_common::types::{PhotoRecord, Story};
use sb_common::Result;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod api;
pub mod cache;
pub mod error;

/// How long a loaded story list is served before rereading the file
pub const STORIES_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Artifact layout under the data directory
    pub paths: ArtifactPaths,
    /// Gallery index, preloaded at startup
    pub photo_index: Arc<Vec<PhotoRecord>>,
    /// Cached story list
    pub stories_cache: Arc<TtlCache<Vec<Story>>>,
}

impl AppState {
    /// Create state, preloading the photo index.
    ///
    /// A missing index file means the photo pipeline has not run yet;
    /// the gallery serves empty. An unparseable index is fatal.
    pub fn new(paths: ArtifactPaths) -> Result<Self> {
        Self::with_cache(paths, TtlCache::new(STORIES_CACHE_TTL))
    }

    /// Create state with a caller-supplied cache (tests inject a clock).
    pub fn with_cache(paths: ArtifactPaths, cache: TtlCache<Vec<Story>>) -> Result<Self> {
        let index_path = paths.photo_index();
        let photo_index: Vec<PhotoRecord> = if index_path.exists() {
            let records: Vec<PhotoRecord> = store::read_json(&index_path)?;
            info!(records = records.len(), "Photo index preloaded");
            records
        } else {
            warn!(file = %index_path.display(), "No photo index, gallery serves empty");
            Vec::new()
        };

        Ok(Self {
            paths,
            photo_index: Arc::new(photo_index),
            stories_cache: Arc::new(cache),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/api/stories", get(api::stories::list_stories))
        .route("/api/stories/:id", get(api::stories::get_story))
        .route("/api/storytellers", get(api::data::get_storytellers))
        .route("/api/analytics", get(api::data::get_analytics))
        .route("/api/filters", get(api::data::get_filters))
        .route("/api/search", get(api::data::get_search))
        .route("/api/photos", get(api::photos::list_photos))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
