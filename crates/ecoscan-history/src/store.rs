use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ecoscan_core::{Product, ScanHistoryEntry};

use crate::error::HistoryError;

/// File-backed scan history.
///
/// The file holds a JSON array of [`ScanHistoryEntry`] ordered newest first.
/// Every call reads the file fresh; nothing is cached between calls.
/// Writes go to a sibling temp file that is then renamed over the original.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Opens a store at `path`. The file is created on the first
    /// [`record`](Self::record).
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns all entries, newest first. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::Io`] if the file exists but cannot be read.
    /// - [`HistoryError::Corrupt`] if its contents are not a list of entries.
    pub fn entries(&self) -> Result<Vec<ScanHistoryEntry>, HistoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(HistoryError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| HistoryError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Prepends a snapshot of `product` and returns the stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Corrupt`] without touching the file if the
    /// existing history cannot be parsed, or [`HistoryError::Io`] if the
    /// write fails.
    pub fn record(&self, product: Product) -> Result<ScanHistoryEntry, HistoryError> {
        self.insert(ScanHistoryEntry::new(product))
    }

    /// Prepends an already-built entry.
    ///
    /// # Errors
    ///
    /// Same as [`record`](Self::record).
    pub fn insert(&self, entry: ScanHistoryEntry) -> Result<ScanHistoryEntry, HistoryError> {
        let mut entries = self.entries()?;
        entries.insert(0, entry.clone());
        self.write(&entries)?;

        tracing::debug!(
            path = %self.path.display(),
            product_id = %entry.product_id,
            total = entries.len(),
            "scan recorded in history"
        );
        Ok(entry)
    }

    /// Deletes the history file. A missing file is already clear.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Io`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), HistoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "history cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HistoryError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn write(&self, entries: &[ScanHistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(HistoryError::Serialize)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> HistoryError {
    HistoryError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
