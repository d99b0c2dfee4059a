//! Error types for newsdex
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Propagation policy: only persistence failures during an explicit
//! build/save and an unreadable corpus root are surfaced to the caller.
//! Single-document failures are logged and skipped, and query-time lookup
//! misses are represented as empty collections, never as errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for newsdex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the newsdex search engine
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A persisted index file is missing, truncated, or corrupt
    #[error("index file {path:?} unusable: {reason}")]
    IndexFormat {
        /// Path of the offending index file
        path: PathBuf,
        /// Decoder diagnostic
        reason: String,
    },

    /// A single source document could not be read or parsed
    #[error("document {path:?} unreadable: {reason}")]
    Document {
        /// Path of the offending document
        path: PathBuf,
        /// Parser diagnostic
        reason: String,
    },

    /// The corpus root itself cannot be enumerated
    #[error("cannot read corpus root {path:?}: {source}")]
    CorpusRoot {
        /// Corpus root that failed to open
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },
}
