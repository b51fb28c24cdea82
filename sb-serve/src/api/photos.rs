//! Gallery endpoint
//!
//! Serves the in-memory photo index loaded at startup. No filesystem
//! access happens per request, which is what lets this handler run in
//! environments without a data directory at all.

use crate::AppState;
use axum::extract::State;
use axum::Json;
use sb_common::types::PhotoRecord;

/// GET /api/photos
pub async fn list_photos(State(state): State<AppState>) -> Json<Vec<PhotoRecord>> {
    Json(state.photo_index.as_ref().clone())
}
