//! Index management and search orchestration for newsdex.
//!
//! This crate provides:
//! - [`IndexCatalog`]: the three inverted indices with coordinated,
//!   all-or-nothing persistence
//! - [`ArticleReader`] and the concrete [`JsonArticleReader`]
//! - [`walk_corpus`]: deterministic recursive corpus traversal
//! - [`SearchEngine`]: load-or-build startup, ingestion, query parsing,
//!   and ranked retrieval

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod reader;
pub mod searcher;
pub mod walker;

pub use catalog::{IndexCatalog, IndexPaths};
pub use reader::{ArticleReader, JsonArticleReader};
pub use searcher::SearchEngine;
pub use walker::walk_corpus;
