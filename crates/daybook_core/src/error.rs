//! Error types for `daybook_core`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the core library.
///
/// Parsing never produces errors (malformed input degrades silently), so
/// the variants here cover storage and configuration only.
#[derive(Debug, Error)]
pub enum DaybookError {
    /// A local storage operation failed.
    ///
    /// Callers should reload last-known-good state from disk rather than
    /// trust possibly-inconsistent in-memory records.
    #[error("storage error on {path}: {source}")]
    Storage {
        /// The file the operation targeted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// A date string did not match the strict `YYYY-MM-DD` form.
    #[error("invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DaybookError>;
