//! The index catalog: three independent balanced indices and their
//! coordinated persistence.
//!
//! One index per term class — organization names, person names, body words.
//! A term string may coincidentally appear as a key in more than one index
//! with unrelated posting maps.
//!
//! Persistence produces four artifacts in the index directory: a manifest
//! marker (`index.manifest`) and one binary file per index. Loading is
//! all-or-nothing: any missing or corrupt file fails the whole operation and
//! partially loaded state is never exposed.

use newsdex_core::{Error, PostingMap, Result};
use newsdex_index::{read_index, write_index, BalancedIndex, FormatError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Manifest magic bytes: "NDMF"
pub const MANIFEST_MAGIC: [u8; 4] = *b"NDMF";

/// Current manifest format version
pub const MANIFEST_FORMAT_VERSION: u32 = 1;

/// Locations of the persisted index artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPaths {
    /// Manifest marker file
    pub manifest: PathBuf,
    /// Organization index file
    pub orgs: PathBuf,
    /// Person-name index file
    pub names: PathBuf,
    /// Body-word index file
    pub words: PathBuf,
}

impl IndexPaths {
    /// Conventional file names inside an index directory.
    pub fn in_dir(dir: &Path) -> Self {
        IndexPaths {
            manifest: dir.join("index.manifest"),
            orgs: dir.join("orgs.idx"),
            names: dir.join("names.idx"),
            words: dir.join("words.idx"),
        }
    }
}

/// Owns the three inverted indices and coordinates their persistence.
#[derive(Default)]
pub struct IndexCatalog {
    orgs: BalancedIndex<PostingMap>,
    names: BalancedIndex<PostingMap>,
    words: BalancedIndex<PostingMap>,
}

impl IndexCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        IndexCatalog::default()
    }

    // ========================================================================
    // Association
    // ========================================================================

    /// Associate an organization term with a document.
    pub fn associate_org(&mut self, term: &str, doc_id: &str) {
        Self::associate(&mut self.orgs, term, doc_id);
    }

    /// Associate a person-name term with a document.
    pub fn associate_name(&mut self, term: &str, doc_id: &str) {
        Self::associate(&mut self.names, term, doc_id);
    }

    /// Associate a body-word term with a document.
    ///
    /// No-op for an empty term: the normalizer signals "drop this token"
    /// with an empty string.
    pub fn associate_word(&mut self, term: &str, doc_id: &str) {
        if term.is_empty() {
            return;
        }
        Self::associate(&mut self.words, term, doc_id);
    }

    fn associate(index: &mut BalancedIndex<PostingMap>, term: &str, doc_id: &str) {
        if let Some(postings) = index.get_mut(term) {
            *postings.entry(doc_id.to_owned()).or_insert(0) += 1;
        } else {
            let mut postings = PostingMap::new();
            postings.insert(doc_id.to_owned(), 1);
            index.insert(term, postings);
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Posting map for an organization term; empty when absent.
    pub fn files_by_org(&self, term: &str) -> PostingMap {
        self.orgs.get(term).cloned().unwrap_or_default()
    }

    /// Posting map for a person-name term; empty when absent.
    pub fn files_by_name(&self, term: &str) -> PostingMap {
        self.names.get(term).cloned().unwrap_or_default()
    }

    /// Posting map for a body-word term; empty when absent.
    ///
    /// A lookup miss is "zero matches", never an error.
    pub fn files_by_word(&self, term: &str) -> PostingMap {
        self.words.get(term).cloned().unwrap_or_default()
    }

    /// Number of distinct terms per index: (orgs, names, words).
    pub fn term_counts(&self) -> (usize, usize, usize) {
        (self.orgs.len(), self.names.len(), self.words.len())
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Persist all three indices plus the manifest marker.
    ///
    /// Any failure here is fatal to the build operation; no partial-failure
    /// recovery is attempted.
    pub fn save(&self, paths: &IndexPaths) -> Result<()> {
        write_index(&paths.orgs, &self.orgs).map_err(|e| format_error(&paths.orgs, e))?;
        write_index(&paths.names, &self.names).map_err(|e| format_error(&paths.names, e))?;
        write_index(&paths.words, &self.words).map_err(|e| format_error(&paths.words, e))?;
        self.write_manifest(&paths.manifest)?;

        tracing::info!(
            target: "newsdex::catalog",
            orgs = self.orgs.len(),
            names = self.names.len(),
            words = self.words.len(),
            "Index catalog saved"
        );
        Ok(())
    }

    /// Load all three indices; all-or-nothing.
    pub fn load(paths: &IndexPaths) -> Result<Self> {
        let expected = read_manifest(&paths.manifest)?;

        let orgs = read_index(&paths.orgs).map_err(|e| format_error(&paths.orgs, e))?;
        let names = read_index(&paths.names).map_err(|e| format_error(&paths.names, e))?;
        let words = read_index(&paths.words).map_err(|e| format_error(&paths.words, e))?;

        let actual = (orgs.len() as u64, names.len() as u64, words.len() as u64);
        if actual != expected {
            return Err(Error::IndexFormat {
                path: paths.manifest.clone(),
                reason: format!(
                    "manifest declares term counts {expected:?} but files hold {actual:?}"
                ),
            });
        }

        tracing::info!(
            target: "newsdex::catalog",
            orgs = orgs.len(),
            names = names.len(),
            words = words.len(),
            "Index catalog loaded"
        );
        Ok(IndexCatalog { orgs, names, words })
    }

    /// Write the manifest atomically (write then rename).
    fn write_manifest(&self, path: &Path) -> Result<()> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MANIFEST_MAGIC);
        bytes.extend_from_slice(&MANIFEST_FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&(self.orgs.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&(self.names.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&(self.words.len() as u64).to_le_bytes());
        let crc = crc32fast::hash(&bytes);
        bytes.extend_from_slice(&crc.to_le_bytes());

        let temp = path.with_extension("tmp");
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        std::fs::rename(&temp, path)?;
        Ok(())
    }
}

/// Parse the manifest; returns the declared (orgs, names, words) term counts.
fn read_manifest(path: &Path) -> Result<(u64, u64, u64)> {
    let bytes = std::fs::read(path).map_err(|e| Error::IndexFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // magic(4) + version(4) + 3 counts(24) + crc(4)
    if bytes.len() != 36 {
        return Err(manifest_error(path, "wrong manifest size"));
    }
    if bytes[0..4] != MANIFEST_MAGIC {
        return Err(manifest_error(path, "bad manifest magic"));
    }

    let stored = u32::from_le_bytes(bytes[32..36].try_into().unwrap_or([0; 4]));
    if stored != crc32fast::hash(&bytes[..32]) {
        return Err(manifest_error(path, "manifest checksum mismatch"));
    }

    let version = u32::from_le_bytes(bytes[4..8].try_into().unwrap_or([0; 4]));
    if version > MANIFEST_FORMAT_VERSION {
        return Err(manifest_error(path, "unsupported manifest version"));
    }

    let count = |at: usize| u64::from_le_bytes(bytes[at..at + 8].try_into().unwrap_or([0; 8]));
    Ok((count(8), count(16), count(24)))
}

fn manifest_error(path: &Path, reason: &str) -> Error {
    Error::IndexFormat {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn format_error(path: &Path, source: FormatError) -> Error {
    Error::IndexFormat {
        path: path.to_path_buf(),
        reason: source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_catalog() -> IndexCatalog {
        let mut catalog = IndexCatalog::new();
        catalog.associate_org("acme", "news/a.json");
        catalog.associate_name("jane doe", "news/a.json");
        catalog.associate_word("profit", "news/a.json");
        catalog.associate_word("profit", "news/a.json");
        catalog.associate_word("profit", "news/b.json");
        catalog
    }

    #[test]
    fn test_associate_increments_counts() {
        let catalog = populated_catalog();
        let postings = catalog.files_by_word("profit");
        assert_eq!(postings["news/a.json"], 2);
        assert_eq!(postings["news/b.json"], 1);
    }

    #[test]
    fn test_associate_word_ignores_empty_term() {
        let mut catalog = IndexCatalog::new();
        catalog.associate_word("", "news/a.json");
        assert_eq!(catalog.term_counts(), (0, 0, 0));
    }

    #[test]
    fn test_lookup_miss_is_empty_map() {
        let catalog = IndexCatalog::new();
        assert!(catalog.files_by_org("unknown").is_empty());
        assert!(catalog.files_by_name("unknown").is_empty());
        assert!(catalog.files_by_word("unknown").is_empty());
    }

    #[test]
    fn test_indices_are_independent() {
        let mut catalog = IndexCatalog::new();
        catalog.associate_org("apple", "news/a.json");
        catalog.associate_word("apple", "news/b.json");

        assert_eq!(catalog.files_by_org("apple").len(), 1);
        assert!(catalog.files_by_org("apple").contains_key("news/a.json"));
        assert!(catalog.files_by_word("apple").contains_key("news/b.json"));
        assert!(catalog.files_by_name("apple").is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());

        let catalog = populated_catalog();
        catalog.save(&paths).unwrap();

        let loaded = IndexCatalog::load(&paths).unwrap();
        assert_eq!(loaded.term_counts(), catalog.term_counts());
        assert_eq!(loaded.files_by_word("profit")["news/a.json"], 2);
        assert_eq!(loaded.files_by_org("acme")["news/a.json"], 1);
        assert_eq!(loaded.files_by_name("jane doe")["news/a.json"], 1);
    }

    #[test]
    fn test_load_fails_without_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        assert!(IndexCatalog::load(&paths).is_err());
    }

    #[test]
    fn test_load_is_all_or_nothing_when_one_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());

        populated_catalog().save(&paths).unwrap();
        std::fs::remove_file(&paths.names).unwrap();

        assert!(matches!(
            IndexCatalog::load(&paths),
            Err(Error::IndexFormat { .. })
        ));
    }

    #[test]
    fn test_load_rejects_corrupt_index_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());

        populated_catalog().save(&paths).unwrap();
        let mut bytes = std::fs::read(&paths.words).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        std::fs::write(&paths.words, &bytes).unwrap();

        assert!(matches!(
            IndexCatalog::load(&paths),
            Err(Error::IndexFormat { .. })
        ));
    }

    #[test]
    fn test_load_rejects_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());

        populated_catalog().save(&paths).unwrap();
        // Replace the words index with an empty one; the manifest still
        // declares the original counts.
        let empty = BalancedIndex::new();
        write_index(&paths.words, &empty).unwrap();

        assert!(matches!(
            IndexCatalog::load(&paths),
            Err(Error::IndexFormat { .. })
        ));
    }
}
