//! Remote file-store abstraction.
//!
//! The sync engine talks to the remote through this trait only, so tests
//! drive it with an in-memory store and the production build plugs in
//! [`crate::webdav::WebdavStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::RemoteError;

/// A stateless HTTP file store: GET / PUT / exists / last-modified /
/// shallow listing / make-collection.
///
/// Paths are relative to the store's base URL and use `/` separators.
#[async_trait]
pub trait RemoteFileStore: Send + Sync {
    /// Fetch a file's content. A missing file (404) is `None`, not an
    /// error.
    async fn get(&self, path: &str) -> Result<Option<String>, RemoteError>;

    /// Upload (create or overwrite) a file.
    async fn put(&self, path: &str, content: &str) -> Result<(), RemoteError>;

    /// Whether a file exists.
    async fn exists(&self, path: &str) -> Result<bool, RemoteError>;

    /// The file's last-modified timestamp, or `None` if the file is
    /// missing or the store does not report one.
    async fn last_modified(&self, path: &str) -> Result<Option<DateTime<Utc>>, RemoteError>;

    /// Shallow listing of a directory's entries.
    async fn list_dir(&self, path: &str) -> Result<Vec<String>, RemoteError>;

    /// Create a directory (collection). "Already exists" responses count
    /// as success.
    async fn make_dir(&self, path: &str) -> Result<(), RemoteError>;
}
