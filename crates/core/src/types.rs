//! Shared data model for newsdex
//!
//! The vocabulary here is deliberately small: a document is identified by a
//! stable path-like string, a term maps to a posting map (document id →
//! occurrence count), and a parsed query is a set of typed terms.

use std::collections::HashMap;

/// Stable document identifier (the article's path within the corpus).
pub type DocId = String;

/// Posting map for one term: document id → occurrence count.
///
/// Counts are non-negative and increment by one each time the term is
/// associated again with the same document.
pub type PostingMap = HashMap<DocId, u64>;

/// Structured fields extracted from one source article.
///
/// Produced by a document reader during ingestion and consumed transiently;
/// the indices persist postings keyed by term, never this record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Article title
    pub title: String,
    /// Publishing site or outlet
    pub publication: String,
    /// Publication date as found in the source (not parsed)
    pub date: String,
    /// Stable identifier, also the path the article was read from
    pub doc_id: DocId,
    /// Organization entity names mentioned in the article
    pub organizations: Vec<String>,
    /// Person entity names mentioned in the article
    pub persons: Vec<String>,
    /// Full body text
    pub body: String,
}

/// One typed term of a parsed query.
///
/// Word terms carry their normalized (stemmed) form; entity terms carry the
/// verbatim case-folded text after their `org:` / `person:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryTerm {
    /// Positive word term, matched against the word index
    Word(String),
    /// Negated word term: documents containing it are excluded
    NotWord(String),
    /// Entity filter against the organization index
    Org(String),
    /// Entity filter against the person-name index
    Person(String),
}
