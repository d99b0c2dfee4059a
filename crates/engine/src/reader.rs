//! Document readers: turn an on-disk article into an [`ArticleRecord`].
//!
//! The engine only depends on the [`ArticleReader`] trait; the concrete
//! [`JsonArticleReader`] understands the news-corpus JSON shape. A parse
//! failure for a single document is an [`Error::Document`] the ingestion
//! loop logs and skips.

use newsdex_core::{ArticleRecord, Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Extracts structured fields from one document.
pub trait ArticleReader {
    /// Read and parse the document at `path`.
    fn read(&self, path: &Path) -> Result<ArticleRecord>;
}

/// Reader for the news-corpus JSON encoding.
///
/// Recognized fields: `title`, `published`, `text`, `thread.site`
/// (publication), `entities.organizations[].name`, `entities.persons[].name`.
/// Missing fields default to empty; only malformed JSON fails the parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonArticleReader;

#[derive(Deserialize, Default)]
struct RawArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    published: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    thread: RawThread,
    #[serde(default)]
    entities: RawEntities,
}

#[derive(Deserialize, Default)]
struct RawThread {
    #[serde(default)]
    site: String,
}

#[derive(Deserialize, Default)]
struct RawEntities {
    #[serde(default)]
    organizations: Vec<RawEntity>,
    #[serde(default)]
    persons: Vec<RawEntity>,
}

#[derive(Deserialize, Default)]
struct RawEntity {
    #[serde(default)]
    name: String,
}

impl ArticleReader for JsonArticleReader {
    fn read(&self, path: &Path) -> Result<ArticleRecord> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Document {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let raw: RawArticle = serde_json::from_str(&text).map_err(|e| Error::Document {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let names = |entities: Vec<RawEntity>| {
            entities
                .into_iter()
                .map(|e| e.name)
                .filter(|n| !n.is_empty())
                .collect()
        };

        Ok(ArticleRecord {
            title: raw.title,
            publication: raw.thread.site,
            date: raw.published,
            doc_id: path.to_string_lossy().into_owned(),
            organizations: names(raw.entities.organizations),
            persons: names(raw.entities.persons),
            body: raw.text,
        })
    }
}
