//! Newsdex - single-node ranked search over structured news articles
//!
//! Newsdex builds three inverted indices — organization names, person names,
//! and stemmed body words — over a corpus of JSON news articles, persists
//! them in a checksummed binary format, and answers free-text queries with
//! frequency-ranked results.
//!
//! # Quick Start
//!
//! ```ignore
//! use newsdex::SearchEngine;
//! use std::path::Path;
//!
//! // Load the persisted index, or build it from the corpus and save it.
//! let engine = SearchEngine::open(Path::new("corpus"), Path::new(".newsdex"))?;
//!
//! // Ranked retrieval with entity filters and negation.
//! let hits = engine.search("profit -loss org:acme");
//! ```
//!
//! # Query surface
//!
//! `org:<value>` and `person:<value>` filter on the entity indices with the
//! verbatim case-folded value; `-<word>` excludes documents containing the
//! word; every other token is a positive, stemmed word term. Stopwords
//! never match anything, and a query with no positive terms returns an
//! empty result.

pub use newsdex_core::{ArticleRecord, DocId, Error, PostingMap, QueryTerm, Result};
pub use newsdex_engine::{
    walk_corpus, ArticleReader, IndexCatalog, IndexPaths, JsonArticleReader, SearchEngine,
};
pub use newsdex_index::BalancedIndex;
pub use newsdex_text::{is_stopword, process_word, stem, tokenize};
