//! Local interaction markers
//!
//! Per-client record of which blogs were already liked or read, kept in a
//! small JSON file. The server never sees these; they only stop one client
//! from repeating an interaction.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkerSet {
    #[serde(default)]
    liked_blogs: BTreeSet<i64>,
    #[serde(default)]
    read_blogs: BTreeSet<i64>,
}

/// Advisory "already liked" / "already read" markers for one client
#[derive(Debug)]
pub struct InteractionMarkers {
    path: Option<PathBuf>,
    markers: MarkerSet,
}

impl InteractionMarkers {
    /// Load markers from `path`. A missing or empty file is an empty set.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let markers = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => MarkerSet::default(),
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Invalid marker file: {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MarkerSet::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read marker file: {}", path.display()))
            }
        };
        Ok(Self {
            path: Some(path),
            markers,
        })
    }

    /// Markers that live only as long as this value
    pub fn in_memory() -> Self {
        Self {
            path: None,
            markers: MarkerSet::default(),
        }
    }

    pub fn has_liked(&self, blog_id: i64) -> bool {
        self.markers.liked_blogs.contains(&blog_id)
    }

    pub fn has_read(&self, blog_id: i64) -> bool {
        self.markers.read_blogs.contains(&blog_id)
    }

    /// Record a like. Returns `false` if it was already recorded.
    ///
    /// Nothing changes in memory unless the file write succeeds.
    pub fn mark_liked(&mut self, blog_id: i64) -> Result<bool> {
        self.update(|markers| markers.liked_blogs.insert(blog_id))
    }

    /// Record a read. Returns `false` if it was already recorded.
    ///
    /// Nothing changes in memory unless the file write succeeds.
    pub fn mark_read(&mut self, blog_id: i64) -> Result<bool> {
        self.update(|markers| markers.read_blogs.insert(blog_id))
    }

    fn update(&mut self, apply: impl FnOnce(&mut MarkerSet) -> bool) -> Result<bool> {
        let mut next = self.markers.clone();
        if !apply(&mut next) {
            return Ok(false);
        }
        self.save(&next)?;
        self.markers = next;
        Ok(true)
    }

    fn save(&self, markers: &MarkerSet) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(markers).context("Failed to encode markers")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write marker file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let markers = InteractionMarkers::open(dir.path().join("markers.json")).unwrap();
        assert!(!markers.has_liked(1));
        assert!(!markers.has_read(1));
    }

    #[test]
    fn test_markers_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("markers.json");

        let mut markers = InteractionMarkers::open(&path).unwrap();
        assert!(markers.mark_liked(3).unwrap());
        assert!(markers.mark_read(5).unwrap());

        let reopened = InteractionMarkers::open(&path).unwrap();
        assert!(reopened.has_liked(3));
        assert!(reopened.has_read(5));
        assert!(!reopened.has_liked(5));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["likedBlogs"], serde_json::json!([3]));
        assert_eq!(raw["readBlogs"], serde_json::json!([5]));
    }

    #[test]
    fn test_marking_twice_is_idempotent() {
        let mut markers = InteractionMarkers::in_memory();
        assert!(markers.mark_read(9).unwrap());
        assert!(!markers.mark_read(9).unwrap());
        assert!(markers.has_read(9));
        assert!(!markers.has_liked(9));
    }

    #[test]
    fn test_failed_write_keeps_marker_unset() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let mut markers = InteractionMarkers::open(blocker.join("markers.json")).unwrap();
        assert!(markers.mark_read(2).is_err());
        assert!(!markers.has_read(2));
        assert!(markers.mark_read(2).is_err());

        assert!(markers.mark_liked(2).is_err());
        assert!(!markers.has_liked(2));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("markers.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(InteractionMarkers::open(&path).is_err());
    }
}
