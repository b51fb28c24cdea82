//! Gallery index builder
//!
//! Joins the metadata backup against the optimized output directory and
//! emits `photo-index.json`. Only photos present in BOTH survive: a
//! backup entry whose optimized file is missing is logged and skipped,
//! and an optimized file with no backup entry never made it through
//! extraction in the first place.

use crate::meta::{MetaMap, PhotoMeta};
use sb_common::types::PhotoRecord;
use sb_common::Result;
use std::path::Path;
use tracing::{info, warn};

/// Build index records for every backup entry with an optimized file.
pub fn build_index(map: &MetaMap, optimized_dir: &Path) -> Result<Vec<PhotoRecord>> {
    let mut records = Vec::with_capacity(map.len());
    for (filename, meta) in map {
        let src = optimized_name(filename);
        let path = optimized_dir.join(&src);
        if !path.exists() {
            warn!(file = %filename, "No optimized output for backup entry, skipping");
            continue;
        }
        let (width, height) = match image::image_dimensions(&path) {
            Ok(dims) => dims,
            Err(err) => {
                warn!(file = %src, error = %err, "Cannot read optimized dimensions, skipping");
                continue;
            }
        };

        records.push(PhotoRecord {
            src,
            width,
            height,
            alt: alt_text(filename, meta),
            tags: meta.keywords.clone(),
            location: derive_location(meta),
            date: meta.date,
            gps: meta.gps,
        });
    }

    sort_index(&mut records);
    info!(records = records.len(), "Index built");
    Ok(records)
}

/// Newest date first, dateless records last, otherwise input order.
pub fn sort_index(records: &mut [PhotoRecord]) {
    records.sort_by(|a, b| match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Best human-readable location, most specific source first:
/// curated city/state/country, then the named location, then a GPS
/// area string.
pub fn derive_location(meta: &PhotoMeta) -> Option<String> {
    let parts: Vec<&str> = [&meta.city, &meta.state, &meta.country]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect();
    if !parts.is_empty() {
        return Some(parts.join(", "));
    }
    if let Some(location) = meta.location.as_deref() {
        if !location.is_empty() {
            return Some(location.to_string());
        }
    }
    meta.gps
        .map(|gps| format!("{:.3}, {:.3}", gps.lat, gps.lon))
}

/// Optimized output name for an original filename.
pub fn optimized_name(filename: &str) -> String {
    match Path::new(filename).file_stem().and_then(|s| s.to_str()) {
        Some(stem) => format!("{stem}.jpg"),
        None => filename.to_string(),
    }
}

/// Alt text: embedded description when present, else the filename stem
/// with separators spaced out.
fn alt_text(filename: &str, meta: &PhotoMeta) -> String {
    if let Some(description) = meta.description.as_deref() {
        if !description.is_empty() {
            return description.to_string();
        }
    }
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .replace(['-', '_'], " ")
}

// ============================================================================
// Tests
// ============================================================================
