//! History Store: the persisted, newest-first log of past generation results.
//!
//! The whole log lives in one JSON file, the service-side analog of the web
//! client's single localStorage key. The store is an injectable service with
//! an explicit lifecycle: `load` once at startup, then `append`/`list`/`clear`.
//!
//! Invariant: the in-memory sequence and the persisted file are in lockstep
//! after every `append`/`clear`. All mutation happens under one async mutex,
//! so concurrent appends from different controllers cannot lose updates, and
//! a failed write rolls the in-memory prepend back.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::history::HistoryEntry;

pub mod handlers;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct HistoryStore {
    path: PathBuf,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryStore {
    /// Loads the persisted log, once, at process start. A missing file means
    /// an empty log; an unreadable or corrupt file degrades to an empty log
    /// with a warning rather than failing startup.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        "Failed to parse history file {}: {e}; starting with an empty log",
                        path.display()
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(
                    "Failed to read history file {}: {e}; starting with an empty log",
                    path.display()
                );
                Vec::new()
            }
        };

        if !entries.is_empty() {
            info!(
                "Loaded {} history entries from {}",
                entries.len(),
                path.display()
            );
        }

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Prepends the entry and writes the full log to disk before returning.
    /// The entry is visible to every subsequent `list()` once this returns.
    /// A failed write is rolled back and propagated; the entry is dropped.
    pub async fn append(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(0, entry);
        if let Err(e) = self.persist(&entries) {
            entries.remove(0);
            return Err(e);
        }
        Ok(())
    }

    /// Returns a snapshot of the log, newest first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn find(&self, id: Uuid) -> Option<HistoryEntry> {
        self.entries.lock().await.iter().find(|e| e.id == id).cloned()
    }

    /// Empties the log and removes the persisted file. Irreversible.
    /// A missing file is not an error.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        entries.clear();
        Ok(())
    }

    /// Serializes the whole log atomically: temp file in the same directory,
    /// then rename over the target.
    fn persist(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
