//! Photo directory scanner
//!
//! Recursive discovery of image files under the originals directory.
//! Extension-based: the pipeline only ever sees files curators exported
//! from known tooling, so magic-byte sniffing buys nothing here.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions the pipeline processes, lowercase
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff"];

/// Names skipped during traversal
const IGNORE_PATTERNS: &[&str] = &[".DS_Store", "Thumbs.db", ".git"];

/// Recursively collect image files under `root`, sorted by path.
///
/// Traversal errors (unreadable subdirectory, broken symlink) are logged
/// and skipped; the scan itself never fails once the root exists.
pub fn scan_images(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(should_process)
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!("Error accessing entry: {}", err);
                None
            }
        })
        .filter(|path| has_image_extension(path))
        .collect();
    // Deterministic processing order regardless of filesystem layout
    files.sort();
    files
}

fn should_process(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    !IGNORE_PATTERNS.iter().any(|pattern| name.contains(pattern))
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

// ============================================================================
// Tests
// ============================================================================
