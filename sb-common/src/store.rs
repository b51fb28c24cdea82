//! JSON artifact store
//!
//! Every derived collection lands at a fixed relative path under the data
//! directory; the read API and the frontend both consume this layout:
//!
//! ```text
//! data/
//!   stories.json          sanitized story list
//!   storytellers.json     person summaries
//!   analytics.json        aggregate counts
//!   filters.json          sorted-unique theme/location lists
//!   search.json           flat search index
//!   photo-index.json      gallery records
//!   photo-metadata.json   extract → reindex hand-off backup
//!   stories/full/{id}.json  one file per story
//! ```
//!
//! Parse errors on existing artifacts are surfaced, never swallowed:
//! a script that depends on a previously-written file fails fast rather
//! than guessing.

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fixed artifact layout under one data directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl ArtifactPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stories(&self) -> PathBuf {
        self.root.join("stories.json")
    }

    pub fn storytellers(&self) -> PathBuf {
        self.root.join("storytellers.json")
    }

    pub fn analytics(&self) -> PathBuf {
        self.root.join("analytics.json")
    }

    pub fn filters(&self) -> PathBuf {
        self.root.join("filters.json")
    }

    pub fn search(&self) -> PathBuf {
        self.root.join("search.json")
    }

    pub fn photo_index(&self) -> PathBuf {
        self.root.join("photo-index.json")
    }

    pub fn photo_metadata(&self) -> PathBuf {
        self.root.join("photo-metadata.json")
    }

    pub fn story_full(&self, id: &str) -> PathBuf {
        self.root.join("stories").join("full").join(format!("{}.json", id))
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.join("media")
    }
}

/// Write a collection as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(path, bytes)?;
    info!(file = %path.display(), "Wrote artifact");
    Ok(())
}

/// Read a JSON artifact into a typed collection.
///
/// I/O errors and parse errors both propagate; callers treat them as
/// fatal for the invocation.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());

        let value = json!({"themes": ["Belonging", "Home"]});
        write_json(&paths.filters(), &value).unwrap();

        let back: serde_json::Value = read_json(&paths.filters()).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_story_full_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());

        let path = paths.story_full("rec123");
        write_json(&path, &json!({"id": "rec123"})).unwrap();
        assert!(path.exists());
        assert!(path.ends_with("stories/full/rec123.json"));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, b"{not json").unwrap();

        let result: Result<serde_json::Value> = read_json(&path);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<serde_json::Value> = read_json(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
