//! Direct artifact passthrough endpoints
//!
//! These handlers read a JSON artifact and return it as-is. They stay
//! schema-agnostic on purpose: the pipeline owns the shapes, and the
//! read layer should not need a release to track an additive change.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use sb_common::store;
use serde_json::Value;
use std::path::PathBuf;

async fn read_artifact(path: PathBuf) -> Result<Json<Value>, ApiError> {
    let value: Value = store::read_json(&path)?;
    Ok(Json(value))
}

/// GET /api/storytellers
pub async fn get_storytellers(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    read_artifact(state.paths.storytellers()).await
}

/// GET /api/analytics
pub async fn get_analytics(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    read_artifact(state.paths.analytics()).await
}

/// GET /api/filters
pub async fn get_filters(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    read_artifact(state.paths.filters()).await
}

/// GET /api/search
pub async fn get_search(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    read_artifact(state.paths.search()).await
}
