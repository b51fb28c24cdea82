//! Filename-keyed metadata backup
//!
//! Optimization re-encodes every image and strips embedded metadata, so
//! extraction persists what it found first. `photo-metadata.json` is the
//! hand-off between the stages and may also be edited by hand to fill in
//! fields the camera never wrote (city, state, country).

use chrono::NaiveDate;
use sb_common::store;
use sb_common::types::GpsPoint;
use sb_common::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Metadata captured from one original photo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMeta {
    /// Embedded image description, used as alt text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsPoint>,
    /// Named place, curated by hand when the camera wrote nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// The backup map, keyed by original filename. BTreeMap keeps the file
/// diff-friendly across reruns.
pub type MetaMap = BTreeMap<String, PhotoMeta>;

/// Write the backup map.
pub fn save(path: &Path, map: &MetaMap) -> Result<()> {
    store::write_json(path, map)
}

/// Load the backup map. Missing file and parse errors both propagate.
pub fn load(path: &Path) -> Result<MetaMap> {
    store::read_json(path)
}

// ============================================================================
// Tests
// ============================================================================
