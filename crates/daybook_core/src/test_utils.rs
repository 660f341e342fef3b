//! Test utilities shared across crates.
//!
//! Provides an in-memory filesystem with settable modification times so
//! storage and sync behavior can be tested without touching the disk.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::fs::FileSystem;

/// An in-memory mock filesystem.
///
/// Uses `Arc<Mutex<HashMap>>` for thread-safety and allows cloning while
/// sharing the same underlying file storage.
#[derive(Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockFile>>>,
}

#[derive(Clone)]
struct MockFile {
    content: String,
    modified: SystemTime,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (builder pattern).
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files.lock().unwrap().insert(
            PathBuf::from(path),
            MockFile {
                content: content.to_string(),
                modified: SystemTime::now(),
            },
        );
        self
    }

    /// Get the content of a file (for test assertions).
    pub fn get_content(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(&PathBuf::from(path))
            .map(|f| f.content.clone())
    }

    /// Override a file's modification time (for grace-period and
    /// newest-wins tests).
    pub fn set_modified(&self, path: &str, modified: SystemTime) {
        if let Some(file) = self.files.lock().unwrap().get_mut(&PathBuf::from(path)) {
            file.modified = modified;
        }
    }

    /// Remove a file.
    pub fn remove(&self, path: &str) {
        self.files.lock().unwrap().remove(&PathBuf::from(path));
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|f| f.content.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "file not found"))
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files.lock().unwrap().insert(
            path.to_path_buf(),
            MockFile {
                content: content.to_string(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn last_modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|f| f.modified)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "file not found"))
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}
