//! Ordered registry of dropped photo files
//!
//! Entries keep insertion order and may repeat the same path. Each entry is
//! addressed by an [`EntryHandle`] issued when it is added, so two entries for
//! the same file can be removed independently of each other.

use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque identifier for one registry entry
///
/// Handles are issued from a monotonically increasing counter and are never
/// reused within a registry, so a stale handle can never address a newer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryHandle(u64);

impl EntryHandle {
    /// Raw numeric value, for presentation layers that need to print or parse it
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Rebuild a handle from a value previously obtained with [`EntryHandle::value`]
    pub fn from_value(value: u64) -> Self {
        EntryHandle(value)
    }
}

impl fmt::Display for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A dropped photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub handle: EntryHandle,
    pub path: PathBuf,
}

/// Outcome of [`FileRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Added {
    /// Handle to pass to [`FileRegistry::remove`]
    pub handle: EntryHandle,
    /// Number of entries after the add
    pub count: usize,
}

/// In-memory ordered list of dropped file references
#[derive(Debug, Clone, Default)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
    next_handle: u64,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path and return its handle together with the new count
    pub fn add(&mut self, path: impl Into<PathBuf>) -> Added {
        let handle = EntryHandle(self.next_handle);
        self.next_handle += 1;

        self.entries.push(FileEntry {
            handle,
            path: path.into(),
        });

        Added {
            handle,
            count: self.entries.len(),
        }
    }

    /// Remove the single entry addressed by `handle` and return the new count
    ///
    /// An unknown handle (never issued, or already removed) is logged and
    /// leaves the registry untouched.
    pub fn remove(&mut self, handle: EntryHandle) -> usize {
        match self.entries.iter().position(|entry| entry.handle == handle) {
            Some(index) => {
                let removed = self.entries.remove(index);
                log::debug!("Removed {} ({})", removed.handle, removed.path.display());
            }
            None => {
                log::warn!("Ignoring removal of unknown registry entry {}", handle);
            }
        }
        self.entries.len()
    }

    /// Current number of entries
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, handle: EntryHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    /// Look up the path behind a handle
    pub fn get(&self, handle: EntryHandle) -> Option<&Path> {
        self.entries
            .iter()
            .find(|entry| entry.handle == handle)
            .map(|entry| entry.path.as_path())
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Copy of the current paths in order, as handed to the assembler
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|entry| entry.path.clone()).collect()
    }

    /// Human-readable count label, e.g. "Photos (3)"
    pub fn label(&self) -> String {
        format!("Photos ({})", self.entries.len())
    }
}
