//! End-to-end pipeline tests: ingest a JSON corpus from disk, persist the
//! catalog, reload it, and check that both copies answer queries identically.

use newsdex_engine::{IndexCatalog, IndexPaths, SearchEngine};
use std::path::Path;

fn write_corpus(dir: &Path) {
    std::fs::create_dir_all(dir.join("2018")).unwrap();
    std::fs::write(
        dir.join("a.json"),
        r#"{
            "title": "Acme triples profit",
            "published": "2018-01-02T00:00:00Z",
            "text": "Profit profit profit. No losses in sight.",
            "entities": {
                "organizations": [{"name": "Acme Corp"}],
                "persons": [{"name": "Jane Doe"}]
            }
        }"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("2018/b.json"),
        r#"{
            "title": "Mixed quarter",
            "text": "A profit here, a loss there.",
            "entities": {
                "organizations": [{"name": "Globex"}],
                "persons": []
            }
        }"#,
    )
    .unwrap();
}

fn doc(dir: &Path, rel: &str) -> String {
    dir.join(rel).to_string_lossy().into_owned()
}

#[test]
fn open_builds_saves_and_answers_queries() {
    let corpus = tempfile::tempdir().unwrap();
    let index_dir = tempfile::tempdir().unwrap();
    write_corpus(corpus.path());

    let engine = SearchEngine::open(corpus.path(), index_dir.path()).unwrap();

    // a.json mentions profit three times, b.json once.
    let a = doc(corpus.path(), "a.json");
    let b = doc(corpus.path(), "2018/b.json");
    assert_eq!(engine.search("profit"), vec![a.clone(), b.clone()]);
    assert_eq!(engine.search("org:globex"), vec![b.clone()]);
    // Entity keys are whole case-folded names, so a partial name misses.
    assert!(engine.search("person:jane").is_empty());

    // The index directory now holds the manifest and three index files.
    let paths = IndexPaths::in_dir(index_dir.path());
    for path in [&paths.manifest, &paths.orgs, &paths.names, &paths.words] {
        assert!(path.exists(), "missing artifact {path:?}");
    }
}

#[test]
fn rebuild_and_load_give_identical_results() {
    let corpus = tempfile::tempdir().unwrap();
    let index_dir = tempfile::tempdir().unwrap();
    write_corpus(corpus.path());

    // First open builds from scratch and saves.
    let built = SearchEngine::open(corpus.path(), index_dir.path()).unwrap();
    // Second open must load the persisted catalog.
    let loaded = SearchEngine::open(corpus.path(), index_dir.path()).unwrap();

    for query in [
        "profit",
        "profit -loss",
        "org:acme",
        "org:globex",
        "person:jane",
        "loss profit",
        "the",
        "",
    ] {
        assert_eq!(built.search(query), loaded.search(query), "query {query:?}");
    }
    assert_eq!(
        built.catalog().term_counts(),
        loaded.catalog().term_counts()
    );
}

#[test]
fn malformed_document_is_skipped_not_fatal() {
    let corpus = tempfile::tempdir().unwrap();
    let index_dir = tempfile::tempdir().unwrap();
    write_corpus(corpus.path());
    std::fs::write(corpus.path().join("broken.json"), "{this is not json").unwrap();

    let engine = SearchEngine::open(corpus.path(), index_dir.path()).unwrap();
    // The two valid documents are still indexed.
    assert_eq!(engine.search("profit").len(), 2);
}

#[test]
fn corrupt_index_file_triggers_rebuild_on_open() {
    let corpus = tempfile::tempdir().unwrap();
    let index_dir = tempfile::tempdir().unwrap();
    write_corpus(corpus.path());

    SearchEngine::open(corpus.path(), index_dir.path()).unwrap();

    // Corrupt the word index; the next open must fall back to a rebuild
    // and leave a healthy catalog behind.
    let paths = IndexPaths::in_dir(index_dir.path());
    let mut bytes = std::fs::read(&paths.words).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xFF;
    std::fs::write(&paths.words, &bytes).unwrap();

    let engine = SearchEngine::open(corpus.path(), index_dir.path()).unwrap();
    assert_eq!(engine.search("profit").len(), 2);
    assert!(IndexCatalog::load(&paths).is_ok());
}

#[test]
fn negation_drops_documents_containing_the_term() {
    let corpus = tempfile::tempdir().unwrap();
    let index_dir = tempfile::tempdir().unwrap();
    write_corpus(corpus.path());

    let engine = SearchEngine::open(corpus.path(), index_dir.path()).unwrap();

    // Both documents mention losses ("losses" / "loss" both stem to "loss"),
    // so the negation empties the result.
    assert!(engine.search("profit -loss").is_empty());
    // Negating a term absent from the corpus changes nothing.
    assert_eq!(engine.search("profit -bankruptcy").len(), 2);
}
