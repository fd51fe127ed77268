//! File-backed note cache.
//!
//! The whole collection lives in one JSON array. Writes go to a sibling
//! temp file which is then renamed over the cache file, so readers see
//! either the old or the new collection, never a torn one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use ainotes_core::{defaults, LocalCacheStore, Note, Result};

/// Durable note cache stored as a JSON file.
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    /// Create a cache backed by the file at `path`.
    ///
    /// The file and its parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default cache location: `<data dir>/ainotes/ainotes_backup_storage.json`.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from(".local/share"));
        path.push(defaults::APP_DIR_NAME);
        path.push(defaults::CACHE_FILE_NAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LocalCacheStore for JsonFileCache {
    fn read_all(&self) -> Vec<Note> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(
                    subsystem = "store",
                    path = %self.path.display(),
                    error = %e,
                    "Cache unreadable, treating as empty"
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Note>>(&bytes) {
            Ok(notes) => notes,
            Err(e) => {
                warn!(
                    subsystem = "store",
                    path = %self.path.display(),
                    error = %e,
                    "Cache corrupt, treating as empty"
                );
                Vec::new()
            }
        }
    }

    fn write_all(&self, notes: &[Note]) -> Result<()> {
        let data = serde_json::to_vec(notes)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Atomic write: temp file + rename
        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| {
            warn!(
                subsystem = "store",
                from = %temp_path.display(),
                to = %self.path.display(),
                error = %e,
                "Cache rename failed"
            );
            e
        })?;

        debug!(
            subsystem = "store",
            cache_size = notes.len(),
            bytes = data.len(),
            "Cache written"
        );
        Ok(())
    }
}
