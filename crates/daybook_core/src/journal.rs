//! The journal store: one markdown document bound to a filesystem path.
//!
//! All mutations go through parse → mutate → re-serialize; the text on
//! disk is the only persisted state. Storage failures are typed and
//! surfaced so callers can reload last-known-good state instead of
//! trusting possibly-inconsistent memory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::NaiveDate;

use crate::document;
use crate::entry::DayEntry;
use crate::error::{DaybookError, Result};
use crate::fs::FileSystem;
use crate::parse::parse;
use crate::write::write;

/// A day-record document at a fixed path.
pub struct JournalStore<F: FileSystem> {
    fs: Arc<F>,
    path: PathBuf,
}

impl<F: FileSystem> JournalStore<F> {
    /// Bind a store to a document path.
    pub fn new(fs: Arc<F>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    /// The document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw document text. A missing file reads as empty.
    pub fn text(&self) -> Result<String> {
        if !self.fs.exists(&self.path) {
            return Ok(String::new());
        }
        self.fs
            .read_to_string(&self.path)
            .map_err(|source| self.storage_err(source))
    }

    /// Parse the whole document.
    pub fn load(&self) -> Result<Vec<DayEntry>> {
        Ok(parse(&self.text()?))
    }

    /// Replace the document with the canonical serialization of `entries`.
    pub fn save(&self, entries: &[DayEntry]) -> Result<()> {
        self.persist(&write(entries))
    }

    /// Append a day record.
    pub fn append_day(&self, entry: DayEntry) -> Result<()> {
        let text = self.text()?;
        self.persist(&document::append_day(&text, entry))
    }

    /// Replace the record for the entry's date, or add it if absent.
    pub fn update_day(&self, entry: DayEntry) -> Result<()> {
        let text = self.text()?;
        self.persist(&document::update_day(&text, entry))
    }

    /// Remove all records for a date.
    pub fn remove_day(&self, date: NaiveDate) -> Result<()> {
        let text = self.text()?;
        self.persist(&document::remove_day(&text, date))
    }

    /// The document's last modification time, or `None` if it does not
    /// exist yet.
    pub fn last_modified(&self) -> Result<Option<SystemTime>> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        self.fs
            .last_modified(&self.path)
            .map(Some)
            .map_err(|source| self.storage_err(source))
    }

    fn persist(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            self.fs
                .create_dir_all(parent)
                .map_err(|source| self.storage_err(source))?;
        }
        self.fs
            .write_file(&self.path, text)
            .map_err(|source| self.storage_err(source))
    }

    fn storage_err(&self, source: std::io::Error) -> DaybookError {
        DaybookError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Task;
    use crate::test_utils::MockFileSystem;

    fn store() -> JournalStore<MockFileSystem> {
        JournalStore::new(Arc::new(MockFileSystem::new()), "/journal/daybook.md")
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let store = store();
        assert_eq!(store.text().unwrap(), "");
        assert!(store.load().unwrap().is_empty());
        assert!(store.last_modified().unwrap().is_none());
    }

    #[test]
    fn test_append_and_reload() {
        let store = store();
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut entry = DayEntry::new(date);
        entry.tasks.push(Task::with_hours("Review PRs", 1.5));
        store.append_day(entry).unwrap();

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tasks[0].title, "Review PRs");
        assert!(store.last_modified().unwrap().is_some());
    }

    #[test]
    fn test_update_replaces_same_date() {
        let store = store();
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        store.append_day(DayEntry::new(date)).unwrap();

        let mut entry = DayEntry::new(date);
        entry.tasks.push(Task::new("Added later"));
        store.update_day(entry).unwrap();

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tasks.len(), 1);
    }

    #[test]
    fn test_remove_day() {
        let store = store();
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        store.append_day(DayEntry::new(date)).unwrap();
        store.remove_day(date).unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
