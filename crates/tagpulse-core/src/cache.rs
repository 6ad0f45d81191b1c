//! Persistent hashtag → post-count cache.
//!
//! The cache is a single JSON file with one recognized top-level field,
//! `hashtag_data`, mapping hashtag (no leading `#`) to its resolved count.
//! It is loaded once per run, mutated in memory while the aggregator works,
//! and flushed exactly once at the end of the run. Entries are never
//! invalidated: once a hashtag is resolved its count is reused for the
//! lifetime of the file, including counts of 0 from degraded lookups.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache file {path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk shape. Unknown top-level fields are ignored on load and not
/// preserved on save.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    hashtag_data: BTreeMap<String, u64>,
}

/// In-memory view of the count cache, with an optional backing file.
#[derive(Debug)]
pub struct CountCache {
    entries: BTreeMap<String, u64>,
    /// `None` for the in-memory substitute used in tests; [`Self::persist`]
    /// is then a no-op.
    path: Option<PathBuf>,
}

impl CountCache {
    /// Creates an empty cache with no backing file.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            entries: BTreeMap::new(),
            path: None,
        }
    }

    /// Loads the cache from `path`.
    ///
    /// A missing file is not an error: the cache starts empty and the empty
    /// form is written out immediately, so later runs find a valid file.
    ///
    /// # Errors
    ///
    /// [`CacheError::Io`] if the file exists but cannot be read (or the
    /// initial empty write fails), [`CacheError::Malformed`] if it exists
    /// but does not parse. A broken cache file surfaces to the operator
    /// instead of being silently replaced.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        if !path.exists() {
            tracing::info!(path = %path.display(), "cache file absent — initializing empty cache");
            let cache = Self {
                entries: BTreeMap::new(),
                path: Some(path),
            };
            cache.persist()?;
            return Ok(cache);
        }

        let raw = fs::read_to_string(&path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        let file: CacheFile =
            serde_json::from_str(&raw).map_err(|source| CacheError::Malformed {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(
            path = %path.display(),
            entries = file.hashtag_data.len(),
            "loaded count cache"
        );
        Ok(Self {
            entries: file.hashtag_data,
            path: Some(path),
        })
    }

    #[must_use]
    pub fn get(&self, hashtag: &str) -> Option<u64> {
        self.entries.get(hashtag).copied()
    }

    pub fn insert(&mut self, hashtag: impl Into<String>, count: u64) {
        self.entries.insert(hashtag.into(), count);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the full mapping back to the backing file; no-op for an
    /// in-memory cache.
    ///
    /// The write goes to a sibling temp file first and is renamed over the
    /// target, so a crash mid-write cannot truncate an existing cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::Io`] on any filesystem failure (disk full, permission
    /// denied). Callers must surface this: losing the final cache write
    /// defeats the point of caching.
    pub fn persist(&self) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = CacheFile {
            hashtag_data: self.entries.clone(),
        };
        // Serialization of a string→integer map cannot fail; any serde_json
        // error here would indicate an I/O-less bug, so fold it into Io via
        // the write path instead of a dedicated variant.
        let body = serde_json::to_string_pretty(&file).map_err(|source| CacheError::Malformed {
            path: path.clone(),
            source,
        })?;

        let tmp_path = tmp_sibling(path);
        let io_err = |source| CacheError::Io {
            path: path.clone(),
            source,
        };

        let mut tmp = fs::File::create(&tmp_path).map_err(io_err)?;
        tmp.write_all(body.as_bytes()).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            CacheError::Io {
                path: path.clone(),
                source,
            }
        })?;
        tmp.sync_all().map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            CacheError::Io {
                path: path.clone(),
                source,
            }
        })?;
        drop(tmp);

        fs::rename(&tmp_path, path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            CacheError::Io {
                path: path.clone(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), entries = self.entries.len(), "persisted count cache");
        Ok(())
    }
}

/// Temp-file path next to `path` so the final rename stays on one filesystem.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map_or_else(
        || std::ffi::OsString::from("cache"),
        std::ffi::OsStr::to_os_string,
    );
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_initializes_and_writes_empty_file_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");

        let cache = CountCache::load(&path).unwrap();
        assert!(cache.is_empty());
        assert!(path.exists(), "empty cache must be persisted immediately");

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(parsed["hashtag_data"].as_object().unwrap().is_empty());
    }

    #[test]
    fn round_trips_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");

        let mut cache = CountCache::load(&path).unwrap();
        cache.insert("beach", 500);
        cache.insert("sunset", 2_000_000);
        cache.persist().unwrap();

        let reloaded = CountCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("beach"), Some(500));
        assert_eq!(reloaded.get("sunset"), Some(2_000_000));
    }

    #[test]
    fn persist_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");

        let mut cache = CountCache::load(&path).unwrap();
        cache.insert("old", 1);
        cache.persist().unwrap();

        let mut cache = CountCache::load(&path).unwrap();
        cache.insert("new", 2);
        cache.persist().unwrap();

        let reloaded = CountCache::load(&path).unwrap();
        assert_eq!(reloaded.get("old"), Some(1));
        assert_eq!(reloaded.get("new"), Some(2));
    }

    #[test]
    fn persist_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");

        let mut cache = CountCache::load(&path).unwrap();
        cache.insert("beach", 500);
        cache.persist().unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["database.json"]);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(&path, "{not json").unwrap();

        let result = CountCache::load(&path);
        assert!(
            matches!(result, Err(CacheError::Malformed { .. })),
            "expected Malformed, got: {result:?}"
        );
    }

    #[test]
    fn load_ignores_unknown_top_level_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(
            &path,
            r#"{"hashtag_data": {"beach": 500}, "schema_version": 2}"#,
        )
        .unwrap();

        let cache = CountCache::load(&path).unwrap();
        assert_eq!(cache.get("beach"), Some(500));
    }

    #[test]
    fn in_memory_persist_is_noop() {
        let mut cache = CountCache::in_memory();
        cache.insert("beach", 500);
        cache.persist().unwrap();
        assert_eq!(cache.get("beach"), Some(500));
    }
}
