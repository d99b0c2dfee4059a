//! Core types and error taxonomy shared across the newsdex crates.
//!
//! This crate has no dependencies on the rest of the workspace and defines
//! the vocabulary every other crate speaks: document identifiers, posting
//! maps, the extracted article record, typed query terms, and the error
//! type with its `Result` alias.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ArticleRecord, DocId, PostingMap, QueryTerm};
