//! Interactive portfolio session
//!
//! Ties the photo registry to the assembler and remembers every portfolio
//! generated during the session. Presentation layers feed it drop events and
//! observe it through [`SessionObserver`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local};
use url::Url;

use crate::date::default_file_name;
use crate::error::{Error, Result};
use crate::pdf::Assembler;
use crate::registry::{EntryHandle, FileRegistry};

/// Receives session events. Every method defaults to doing nothing.
pub trait SessionObserver {
    /// The registry now holds `count` entries
    fn registry_changed(&mut self, _count: usize) {}

    /// A portfolio was written to `path`
    fn document_generated(&mut self, _path: &Path) {}
}

impl SessionObserver for () {}

/// A portfolio written during this session
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    created_at: DateTime<Local>,
    output_path: PathBuf,
    photos: Vec<PathBuf>,
    page_count: usize,
}

impl GeneratedDocument {
    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Photos the portfolio was generated from, in page order
    pub fn photos(&self) -> &[PathBuf] {
        &self.photos
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

/// Turn one dropped item into a local path
///
/// Accepts `file://` URIs and plain paths. Blank entries, URIs with any other
/// scheme, and `file://` URIs naming a remote host or no file yield `None`.
pub fn path_from_drop(item: &str) -> Option<PathBuf> {
    let item = item.trim();
    if item.is_empty() {
        return None;
    }

    match Url::parse(item) {
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) if path.file_name().is_some() => Some(path),
            Ok(_) => None,
            Err(()) => {
                log::warn!("Ignoring drop of non-local file {}", item);
                None
            }
        },
        Ok(_) if item.contains("://") => {
            log::debug!("Ignoring non-file drop {}", item);
            None
        }
        _ => Some(PathBuf::from(item)),
    }
}

/// Registry, assembler and generated documents for one run of the application
pub struct PortfolioSession<O = ()> {
    registry: FileRegistry,
    assembler: Assembler,
    output_dir: PathBuf,
    documents: BTreeMap<DateTime<Local>, GeneratedDocument>,
    observer: O,
}

impl PortfolioSession<()> {
    /// Session without an observer
    pub fn unobserved(assembler: Assembler, output_dir: impl Into<PathBuf>) -> Self {
        Self::new(assembler, output_dir, ())
    }
}

impl<O: SessionObserver> PortfolioSession<O> {
    pub fn new(assembler: Assembler, output_dir: impl Into<PathBuf>, observer: O) -> Self {
        Self {
            registry: FileRegistry::new(),
            assembler,
            output_dir: output_dir.into(),
            documents: BTreeMap::new(),
            observer,
        }
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Handle one drop gesture
    ///
    /// Returns the handles of the entries added, in drop order.
    pub fn drop_uris<S: AsRef<str>>(&mut self, items: &[S]) -> Vec<EntryHandle> {
        let mut handles = Vec::new();
        for path in items.iter().filter_map(|item| path_from_drop(item.as_ref())) {
            log::debug!("Dropped {}", path.display());
            handles.push(self.registry.add(path).handle);
        }

        if !handles.is_empty() {
            self.observer.registry_changed(self.registry.count());
        }
        handles
    }

    pub fn add(&mut self, path: impl Into<PathBuf>) -> EntryHandle {
        let added = self.registry.add(path);
        self.observer.registry_changed(added.count);
        added.handle
    }

    /// Remove one entry; an unknown handle changes nothing and emits nothing
    pub fn remove(&mut self, handle: EntryHandle) -> usize {
        if !self.registry.contains(handle) {
            log::warn!("Ignoring removal of unknown registry entry {}", handle);
            return self.registry.count();
        }
        let count = self.registry.remove(handle);
        self.observer.registry_changed(count);
        count
    }

    /// e.g. "Photos (3)"
    pub fn photos_label(&self) -> String {
        self.registry.label()
    }

    /// The count label followed by one path per line
    pub fn listing(&self) -> String {
        let mut listing = format!("{}\n------", self.photos_label());
        for entry in self.registry.entries() {
            listing.push('\n');
            listing.push_str(&entry.path.display().to_string());
        }
        listing
    }

    /// Generate a portfolio from the current registry contents
    ///
    /// Without `output` the file is named after the generation time and placed
    /// in the session's output directory. The registry is left unchanged. A
    /// failed generation records nothing.
    pub fn generate(&mut self, output: Option<&Path>) -> Result<&GeneratedDocument> {
        let photos = self.registry.snapshot();
        let started = Local::now();
        let output_path = match output {
            Some(path) => path.to_path_buf(),
            None => self.unused_default_path(&started),
        };

        let report = self.assembler.generate(&output_path, &photos)?;

        let mut created_at = started;
        while self.documents.contains_key(&created_at) {
            created_at += Duration::microseconds(1);
        }

        self.observer.document_generated(&report.output_path);
        log::info!(
            "Generated {} ({} pages)",
            report.output_path.display(),
            report.page_count
        );

        let document = self.documents.entry(created_at).or_insert(GeneratedDocument {
            created_at,
            output_path: report.output_path,
            photos,
            page_count: report.page_count,
        });
        Ok(&*document)
    }

    /// Default output path for a generation started at `started`
    ///
    /// A name already taken on disk or by an earlier document gets a
    /// ` (2)`, ` (3)`, ... suffix.
    fn unused_default_path(&self, started: &DateTime<Local>) -> PathBuf {
        let file_name = default_file_name(started);
        let stem = file_name.trim_end_matches(".pdf");

        let mut candidate = self.output_dir.join(&file_name);
        let mut n = 2;
        while candidate.exists() || self.documents.values().any(|doc| doc.output_path == candidate) {
            candidate = self.output_dir.join(format!("{} ({}).pdf", stem, n));
            n += 1;
        }
        candidate
    }

    /// Generated documents, oldest first
    pub fn documents(&self) -> impl Iterator<Item = &GeneratedDocument> {
        self.documents.values()
    }

    pub fn document(&self, created_at: &DateTime<Local>) -> Option<&GeneratedDocument> {
        self.documents.get(created_at)
    }

    /// Most recently generated document
    pub fn latest(&self) -> Option<&GeneratedDocument> {
        self.documents.values().next_back()
    }

    /// Open a generated document with the platform's default viewer
    ///
    /// The viewer is launched detached and its outcome is not checked.
    pub fn open_document(&self, created_at: &DateTime<Local>) -> Result<()> {
        let document = self
            .document(created_at)
            .ok_or_else(|| Error::UnknownDocument(created_at.to_rfc3339()))?;

        log::debug!("Opening {}", document.output_path.display());
        if let Err(e) = open::that_detached(&document.output_path) {
            log::warn!("Could not open {}: {}", document.output_path.display(), e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::AssemblerOptions;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        counts: Vec<usize>,
        generated: Vec<PathBuf>,
    }

    impl SessionObserver for Recorder {
        fn registry_changed(&mut self, count: usize) {
            self.counts.push(count);
        }

        fn document_generated(&mut self, path: &Path) {
            self.generated.push(path.to_path_buf());
        }
    }

    fn session(dir: &Path) -> PortfolioSession<Recorder> {
        let options = AssemblerOptions::new(dir.join("left.png"), dir.join("right.png"));
        PortfolioSession::new(Assembler::new(options), dir, Recorder::default())
    }

    #[test]
    #[cfg(unix)]
    fn test_path_from_drop() {
        assert_eq!(
            path_from_drop("file:///home/me/beach.jpg"),
            Some(PathBuf::from("/home/me/beach.jpg"))
        );
        assert_eq!(
            path_from_drop("file://localhost/tmp/a.png"),
            Some(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            path_from_drop("file:///tmp/my%20photo.png"),
            Some(PathBuf::from("/tmp/my photo.png"))
        );
        assert_eq!(path_from_drop("photos/a.png"), Some(PathBuf::from("photos/a.png")));
        assert_eq!(path_from_drop("https://example.com/a.png"), None);
        assert_eq!(path_from_drop("   "), None);
        assert_eq!(path_from_drop("file://"), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_path_from_drop_remote_host_is_ignored() {
        assert_eq!(path_from_drop("file://fileserver/share/photo.jpg"), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_path_from_drop_strips_query() {
        assert_eq!(
            path_from_drop("file:///tmp/a.jpg?x=1"),
            Some(PathBuf::from("/tmp/a.jpg"))
        );
        assert_eq!(
            path_from_drop("file:///tmp/a.jpg#frag"),
            Some(PathBuf::from("/tmp/a.jpg"))
        );
    }

    #[test]
    fn test_drop_emits_once_per_gesture() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());

        let handles = session.drop_uris(&["file:///a.png", "https://x/b.png", "", "c.png"]);
        assert_eq!(handles.len(), 2);
        assert_eq!(session.observer().counts, vec![2]);

        // Nothing accepted, nothing emitted
        assert!(session.drop_uris(&["ftp://host/file.png"]).is_empty());
        assert_eq!(session.observer().counts, vec![2]);
    }

    #[test]
    fn test_duplicates_are_separate_entries() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());

        let first = session.add("/a.png");
        session.add("/a.png");
        assert_eq!(session.photos_label(), "Photos (2)");

        assert_eq!(session.remove(first), 1);
        assert_eq!(session.registry().snapshot(), vec![PathBuf::from("/a.png")]);
        assert_eq!(session.observer().counts, vec![1, 2, 1]);
    }

    #[test]
    fn test_remove_unknown_emits_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());

        let handle = session.add("/a.png");
        session.remove(handle);
        assert_eq!(session.remove(handle), 0);
        assert_eq!(session.remove(EntryHandle::from_value(99)), 0);
        assert_eq!(session.observer().counts, vec![1, 0]);
    }

    #[test]
    fn test_listing() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());
        assert_eq!(session.listing(), "Photos (0)\n------");

        session.add("/a.png");
        session.add("/b.png");
        assert_eq!(session.listing(), "Photos (2)\n------\n/a.png\n/b.png");
    }

    #[test]
    fn test_failed_generation_records_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());
        session.add(dir.path().join("photo.png"));

        // Logo assets do not exist
        assert!(session.generate(None).is_err());
        assert!(session.documents().next().is_none());
        assert!(session.latest().is_none());
        assert!(session.observer().generated.is_empty());
        assert_eq!(session.registry().count(), 1);
    }

    #[test]
    fn test_open_unknown_document() {
        let dir = TempDir::new().unwrap();
        let session = session(dir.path());

        let result = session.open_document(&Local::now());
        assert!(matches!(result, Err(Error::UnknownDocument(_))));
    }
}
