//! # `daybook_core`
//!
//! Core library for Daybook: daily task/notes records stored as plain,
//! hand-editable markdown.
//!
//! The document model is transient — records are reconstructed fresh on
//! every [`parse`] and the text itself is the only persisted state. The
//! [`write`] function produces the canonical form (descending date order,
//! single blank lines between blocks). Higher-level operations in
//! [`document`] and [`journal`] always go through parse → mutate →
//! re-serialize; nothing patches text in place.

#![warn(missing_docs)]

/// Application configuration (TOML).
pub mod config;

/// Date parsing and day-header formatting.
pub mod date;

/// Derived whole-document operations.
pub mod document;

/// Day record, section, and task entities.
pub mod entry;

/// Error types.
pub mod error;

/// Filesystem abstraction.
pub mod fs;

/// The journal store bound to a document path.
pub mod journal;

/// Text → day records.
pub mod parse;

/// Test utilities (in-memory filesystem).
pub mod test_utils;

/// Day records → canonical text.
pub mod write;

pub use parse::parse;
pub use write::write;
