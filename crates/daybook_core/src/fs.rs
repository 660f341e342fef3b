//! Filesystem abstraction.
//!
//! The `FileSystem` trait decouples document storage from the real disk
//! so the journal store and the sync engine can be exercised against an
//! in-memory implementation in tests (see [`crate::test_utils`]).

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Abstraction over the handful of filesystem operations the document
/// store and sync engine need.
///
/// Implementations must be safe to share across threads.
pub trait FileSystem: Send + Sync {
    /// Read the file content as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Overwrite (or create) a file with new content.
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check whether a file exists.
    fn exists(&self, path: &Path) -> bool;

    /// The file's last modification time.
    fn last_modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// `FileSystem` backed by the real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn last_modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
