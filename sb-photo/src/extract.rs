//! Embedded metadata extraction
//!
//! Reads EXIF out of each original before optimization strips it. Date
//! handling: the embedded capture date is authoritative; when absent, a
//! leading `YYYYMMDD` filename prefix is the fallback; otherwise the
//! photo has no date and sorts last in the index.
//!
//! A file with no EXIF segment at all is still indexed (phones and
//! editors routinely strip it); only files that cannot be opened are
//! skipped.

use crate::meta::{MetaMap, PhotoMeta};
use crate::scan::scan_images;
use chrono::NaiveDate;
use exif::{Context, In, Tag, Value};
use sb_common::types::GpsPoint;
use sb_common::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

/// Windows XP keyword tags, UTF-16LE byte arrays in IFD0. Curators tag
/// photos in Explorer, which writes these rather than IPTC.
const XP_KEYWORDS: Tag = Tag(Context::Tiff, 0x9c9e);
const XP_SUBJECT: Tag = Tag(Context::Tiff, 0x9c9f);

/// Capture-date tags in priority order
const DATE_TAGS: &[Tag] = &[Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Extract metadata for every image under `root`, keyed by filename.
pub fn extract_dir(root: &Path) -> MetaMap {
    let files = scan_images(root);
    info!(files = files.len(), dir = %root.display(), "Scanning originals");

    let mut map = MetaMap::new();
    for path in files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(file = %path.display(), "Non-UTF8 filename, skipping");
            continue;
        };
        match extract_file(&path) {
            Ok(mut meta) => {
                if meta.date.is_none() {
                    meta.date = filename_date(name);
                }
                map.insert(name.to_string(), meta);
            }
            Err(err) => {
                warn!(file = %path.display(), error = %err, "Metadata extraction failed, skipping");
            }
        }
    }
    info!(extracted = map.len(), "Extraction complete");
    map
}

/// Read EXIF from one file.
///
/// # Errors
/// Only when the file cannot be opened. An unparseable or absent EXIF
/// segment yields empty metadata.
pub fn extract_file(path: &Path) -> Result<PhotoMeta> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(err) => {
            debug!(file = %path.display(), error = %err, "No readable EXIF segment");
            return Ok(PhotoMeta::default());
        }
    };

    Ok(PhotoMeta {
        description: ascii_field(&exif, Tag::ImageDescription),
        date: DATE_TAGS.iter().find_map(|tag| date_field(&exif, *tag)),
        gps: gps_field(&exif),
        keywords: [XP_KEYWORDS, XP_SUBJECT]
            .iter()
            .find_map(|tag| utf16_keywords(&exif, *tag))
            .unwrap_or_default(),
        ..PhotoMeta::default()
    })
}

/// Leading `YYYYMMDD` filename prefix, e.g. `20240615-IMG_001.jpg`.
pub fn filename_date(name: &str) -> Option<NaiveDate> {
    let prefix = name.get(..8)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = prefix[..4].parse().ok()?;
    let month: u32 = prefix[4..6].parse().ok()?;
    let day: u32 = prefix[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// ============================================================================
// Field readers
// ============================================================================

fn ascii_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    if let Value::Ascii(ref groups) = field.value {
        let text = String::from_utf8_lossy(groups.first()?).trim().to_string();
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

fn date_field(exif: &exif::Exif, tag: Tag) -> Option<NaiveDate> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    if let Value::Ascii(ref groups) = field.value {
        let dt = exif::DateTime::from_ascii(groups.first()?).ok()?;
        return NaiveDate::from_ymd_opt(dt.year.into(), dt.month.into(), dt.day.into());
    }
    None
}

fn gps_field(exif: &exif::Exif) -> Option<GpsPoint> {
    let lat = dms_coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, "S")?;
    let lon = dms_coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, "W")?;
    Some(GpsPoint { lat, lon })
}

/// Degrees/minutes/seconds rationals to signed decimal degrees.
fn dms_coordinate(
    exif: &exif::Exif,
    value_tag: Tag,
    ref_tag: Tag,
    negative_ref: &str,
) -> Option<f64> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let Value::Rational(ref parts) = field.value else {
        return None;
    };
    if parts.len() < 3 {
        return None;
    }
    let decimal = dms_to_decimal(parts[0].to_f64(), parts[1].to_f64(), parts[2].to_f64());

    let sign = match ascii_field_in(exif, ref_tag) {
        Some(r) if r == negative_ref => -1.0,
        _ => 1.0,
    };
    Some(decimal * sign)
}

pub(crate) fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

fn ascii_field_in(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    if let Value::Ascii(ref groups) = field.value {
        return Some(String::from_utf8_lossy(groups.first()?).trim().to_string());
    }
    None
}

/// Decode a UTF-16LE XP keyword field, split on `;`.
fn utf16_keywords(exif: &exif::Exif, tag: Tag) -> Option<Vec<String>> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Byte(ref bytes) = field.value else {
        return None;
    };
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let decoded = String::from_utf16_lossy(&units);
    let keywords: Vec<String> = decoded
        .split(';')
        .map(|k| k.trim_matches('\0').trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        None
    } else {
        Some(keywords)
    }
}

// ============================================================================
// Tests
// ============================================================================
