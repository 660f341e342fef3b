//! # `daybook_sync`
//!
//! Synchronization engine for Daybook. Reconciles the local journal
//! document with a copy on a WebDAV-style remote file store, treating
//! both sides as opaque text: the engine never inspects day records.
//!
//! There is no central lock and no conflict merging beyond
//! most-recent-wins; a grace period after local writes reduces (but does
//! not eliminate) races with an external client writing the same path.

#![warn(missing_docs)]

/// The reconciliation engine and its lifecycle.
pub mod engine;

/// Error and failure-classification types.
pub mod error;

/// Remote file-store trait.
pub mod remote;

/// WebDAV implementation of the remote store.
pub mod webdav;

pub use engine::{EngineConfig, SyncEngine, SyncEvent, SyncEventHandler, SyncOutcome, SyncState};
pub use error::{CycleError, FailureClass, RemoteError};
pub use remote::RemoteFileStore;
pub use webdav::WebdavStore;
