//! Image optimization
//!
//! Re-encodes every original as a web-sized JPEG in the optimized
//! directory. Resizing never upscales; small images are re-encoded at
//! their native size. Embedded metadata does not survive re-encoding,
//! which is exactly why extraction runs first.

use crate::scan::scan_images;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use sb_common::{Error, Result};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Widest output the gallery ever renders
pub const MAX_WIDTH: u32 = 1600;

/// JPEG re-encode quality
const JPEG_QUALITY: u8 = 80;

/// Outcome tally for one optimization pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OptimizeStats {
    pub optimized: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Optimize every image under `originals` into `optimized`.
///
/// Already-present outputs are left alone, so reruns only process new
/// originals. Per-file decode/encode failures are logged and skipped.
pub fn optimize_dir(originals: &Path, optimized: &Path) -> Result<OptimizeStats> {
    std::fs::create_dir_all(optimized)?;
    let files = scan_images(originals);
    info!(files = files.len(), dir = %originals.display(), "Optimizing originals");

    let mut stats = OptimizeStats::default();
    for path in files {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!(file = %path.display(), "Non-UTF8 filename, skipping");
            stats.failed += 1;
            continue;
        };
        let target = optimized.join(format!("{stem}.jpg"));
        if target.exists() {
            debug!(file = %target.display(), "Output already present, skipping");
            stats.skipped += 1;
            continue;
        }

        match optimize_file(&path, &target) {
            Ok(()) => stats.optimized += 1,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "Optimization failed, skipping");
                stats.failed += 1;
            }
        }
    }

    info!(
        optimized = stats.optimized,
        skipped = stats.skipped,
        failed = stats.failed,
        "Optimization pass complete"
    );
    Ok(stats)
}

/// Decode, resize to the width bound, re-encode as JPEG.
pub fn optimize_file(source: &Path, target: &Path) -> Result<()> {
    let img = image::open(source)
        .map_err(|err| Error::InvalidInput(format!("{}: {}", source.display(), err)))?;
    let (width, height) = scaled_dimensions(img.width(), img.height(), MAX_WIDTH);
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let mut out = File::create(target)?;
    let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder
        .encode_image(&resized.to_rgb8())
        .map_err(|err| Error::InvalidInput(format!("{}: {}", target.display(), err)))?;
    debug!(file = %target.display(), width, height, "Re-encoded");
    Ok(())
}

/// Proportional scale capped at `max_width`; never upscales.
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scale = max_width as f64 / width as f64;
    let scaled_height = (height as f64 * scale).round().max(1.0) as u32;
    (max_width, scaled_height)
}

// ============================================================================
// Tests
// ============================================================================
