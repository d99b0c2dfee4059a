//! The search engine: ingestion pipeline, query parsing, ranked retrieval.
//!
//! Startup is load-or-build: [`SearchEngine::open`] tries to load the
//! persisted catalog and falls back to a full rebuild followed by a save.
//! After that the catalog is read-only; queries never mutate it.

use crate::catalog::{IndexCatalog, IndexPaths};
use crate::reader::{ArticleReader, JsonArticleReader};
use crate::walker::walk_corpus;
use newsdex_core::{ArticleRecord, DocId, QueryTerm, Result};
use newsdex_text::{process_word, tokenize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;

/// Ingestion, query parsing, and ranked retrieval over an [`IndexCatalog`].
pub struct SearchEngine<R: ArticleReader> {
    catalog: IndexCatalog,
    reader: R,
}

impl SearchEngine<JsonArticleReader> {
    /// Open with the JSON article reader: load the persisted catalog from
    /// `index_dir`, or rebuild from `corpus_dir` and save.
    pub fn open(corpus_dir: &Path, index_dir: &Path) -> Result<Self> {
        Self::open_with_reader(corpus_dir, index_dir, JsonArticleReader)
    }
}

impl<R: ArticleReader> SearchEngine<R> {
    /// Load-or-build startup with a caller-supplied reader.
    ///
    /// A failed load is recovered locally by rebuilding; a failed save after
    /// the rebuild is fatal.
    pub fn open_with_reader(corpus_dir: &Path, index_dir: &Path, reader: R) -> Result<Self> {
        let paths = IndexPaths::in_dir(index_dir);
        match IndexCatalog::load(&paths) {
            Ok(catalog) => Ok(SearchEngine { catalog, reader }),
            Err(e) => {
                tracing::info!(
                    target: "newsdex::engine",
                    error = %e,
                    "No usable persisted index, rebuilding from corpus"
                );
                let mut engine = SearchEngine {
                    catalog: IndexCatalog::new(),
                    reader,
                };
                engine.build_from_scratch(corpus_dir)?;
                engine.catalog.save(&paths)?;
                Ok(engine)
            }
        }
    }

    /// Build an engine around an already-populated catalog.
    ///
    /// Useful for tests and for callers that manage persistence themselves.
    pub fn with_catalog(catalog: IndexCatalog, reader: R) -> Self {
        SearchEngine { catalog, reader }
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Rebuild the catalog from every document under `corpus_dir`.
    ///
    /// Always starts from empty indices; re-running a build never
    /// accumulates onto previously loaded state. A single unreadable
    /// document is logged and skipped; only an unreadable corpus root
    /// aborts the build.
    pub fn build_from_scratch(&mut self, corpus_dir: &Path) -> Result<()> {
        let started = Instant::now();
        self.catalog = IndexCatalog::new();

        let files = walk_corpus(corpus_dir)?;
        let mut indexed = 0usize;
        let mut skipped = 0usize;
        for path in &files {
            match self.reader.read(path) {
                Ok(record) => {
                    self.ingest(&record);
                    indexed += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        target: "newsdex::ingest",
                        path = %path.display(),
                        error = %e,
                        "Skipping unreadable document"
                    );
                    skipped += 1;
                }
            }
        }

        let (orgs, names, words) = self.catalog.term_counts();
        tracing::info!(
            target: "newsdex::ingest",
            indexed,
            skipped,
            orgs,
            names,
            words,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Corpus indexed"
        );
        Ok(())
    }

    /// Index one article: entity names case-folded verbatim, body words
    /// normalized through the stemmer, one association per occurrence.
    fn ingest(&mut self, record: &ArticleRecord) {
        for org in &record.organizations {
            self.catalog
                .associate_org(&org.to_lowercase(), &record.doc_id);
        }
        for person in &record.persons {
            self.catalog
                .associate_name(&person.to_lowercase(), &record.doc_id);
        }
        for token in tokenize(&record.body) {
            let term = process_word(&token);
            if !term.is_empty() {
                self.catalog.associate_word(&term, &record.doc_id);
            }
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Parse a raw query string into a set of typed terms.
    ///
    /// Tokens split on whitespace and case-fold, then classify:
    /// `org:`/`person:` prefixes become entity filters kept verbatim,
    /// a leading `-` negates a word term, everything else is a positive
    /// word term. Word terms normalize through [`process_word`] and drop
    /// when normalization yields nothing. Duplicates collapse.
    pub fn parse(&self, query: &str) -> HashSet<QueryTerm> {
        let mut terms = HashSet::new();
        for raw in query.split_whitespace() {
            let token = raw.to_lowercase();
            if let Some(value) = token.strip_prefix("org:") {
                terms.insert(QueryTerm::Org(value.to_owned()));
            } else if let Some(value) = token.strip_prefix("person:") {
                terms.insert(QueryTerm::Person(value.to_owned()));
            } else if let Some(rest) = token.strip_prefix('-') {
                let term = process_word(rest);
                if !term.is_empty() {
                    terms.insert(QueryTerm::NotWord(term));
                }
            } else {
                let term = process_word(&token);
                if !term.is_empty() {
                    terms.insert(QueryTerm::Word(term));
                }
            }
        }
        terms
    }

    /// Ranked retrieval: scored by summed occurrence counts over all
    /// positive terms, negations excluded, ordered by descending score with
    /// ties broken by ascending document id.
    ///
    /// A query with no positive terms returns an empty result; unknown
    /// terms contribute empty posting maps, never errors.
    pub fn search(&self, query: &str) -> Vec<DocId> {
        let terms = self.parse(query);

        let mut scores: HashMap<DocId, u64> = HashMap::new();
        let mut has_positive = false;
        for term in &terms {
            let postings = match term {
                QueryTerm::Word(word) => self.catalog.files_by_word(word),
                QueryTerm::Org(org) => self.catalog.files_by_org(org),
                QueryTerm::Person(person) => self.catalog.files_by_name(person),
                QueryTerm::NotWord(_) => continue,
            };
            has_positive = true;
            for (doc_id, count) in postings {
                *scores.entry(doc_id).or_insert(0) += count;
            }
        }
        if !has_positive {
            return Vec::new();
        }

        for term in &terms {
            if let QueryTerm::NotWord(word) = term {
                for doc_id in self.catalog.files_by_word(word).keys() {
                    scores.remove(doc_id);
                }
            }
        }

        let mut ranked: Vec<(DocId, u64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.into_iter().map(|(doc_id, _)| doc_id).collect()
    }
}
