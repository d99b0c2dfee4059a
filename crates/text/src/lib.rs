//! Text normalization for indexing and querying.
//!
//! This crate canonicalizes raw tokens into index terms:
//! - [`tokenize`] splits body text into lowercase alphanumeric tokens
//! - [`is_stopword`] tests membership in a fixed English stopword set
//! - [`stem`] applies Porter-style suffix stripping
//! - [`process_word`] combines the two: stopwords map to the empty string,
//!   which callers treat as "drop this token"
//!
//! Every function here is total: no input produces an error.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod stemmer;
mod stopwords;

pub use stemmer::stem;
pub use stopwords::is_stopword;

/// Normalize one token into an index/query term.
///
/// Returns the empty string for stopwords; otherwise the stemmed,
/// case-folded form. Empty output signals "drop this token".
pub fn process_word(word: &str) -> String {
    if is_stopword(word) {
        return String::new();
    }
    stem(word)
}

/// Tokenize body text into lowercase terms.
///
/// Splits on any non-alphanumeric character and drops empty fragments.
/// Repeated words are kept; ingestion counts one association per occurrence.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
