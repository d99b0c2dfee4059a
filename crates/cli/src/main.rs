//! Command-line front end for newsdex.
//!
//! Thin glue only: argument parsing, engine startup, and console rendering.
//! All indexing and retrieval logic lives in `newsdex-engine`.

use clap::{Arg, Command};
use newsdex_engine::{ArticleReader, IndexCatalog, IndexPaths, JsonArticleReader, SearchEngine};
use std::path::Path;
use std::process::ExitCode;

/// Build the CLI command tree.
fn build_cli() -> Command {
    Command::new("newsdex")
        .about("Ranked search over a corpus of structured news articles")
        .subcommand_required(true)
        .arg(
            Arg::new("index-dir")
                .long("index-dir")
                .help("Directory for persisted index files (default: .newsdex)")
                .global(true),
        )
        .subcommand(
            Command::new("index")
                .about("Build the index from a corpus directory and persist it")
                .arg(Arg::new("corpus").required(true).help("Corpus root directory")),
        )
        .subcommand(
            Command::new("query")
                .about("Search a previously built index")
                .arg(Arg::new("text").required(true).help("Free-text query"))
                .arg(
                    Arg::new("corpus-dir")
                        .long("corpus-dir")
                        .help("Corpus root, used to rebuild if the index is missing (default: .)"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .help("Maximum number of results to display (default: 15)"),
                ),
        )
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let matches = build_cli().get_matches();
    let index_dir = matches
        .get_one::<String>("index-dir")
        .map(String::as_str)
        .unwrap_or(".newsdex")
        .to_owned();

    let result = match matches.subcommand() {
        Some(("index", sub)) => {
            let corpus = sub
                .get_one::<String>("corpus")
                .map(String::as_str)
                .unwrap_or(".");
            run_index(Path::new(corpus), Path::new(&index_dir))
        }
        Some(("query", sub)) => {
            let text = sub
                .get_one::<String>("text")
                .map(String::as_str)
                .unwrap_or("");
            let corpus = sub
                .get_one::<String>("corpus-dir")
                .map(String::as_str)
                .unwrap_or(".");
            let limit = sub
                .get_one::<String>("limit")
                .and_then(|s| s.parse().ok())
                .unwrap_or(15usize);
            run_query(Path::new(corpus), Path::new(&index_dir), text, limit)
        }
        _ => unreachable!("subcommand is required"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_index(corpus: &Path, index_dir: &Path) -> newsdex_core::Result<()> {
    std::fs::create_dir_all(index_dir)?;
    // An explicit index command always rebuilds, never loads stale state.
    let mut engine = SearchEngine::with_catalog(IndexCatalog::new(), JsonArticleReader);
    engine.build_from_scratch(corpus)?;
    engine.catalog().save(&IndexPaths::in_dir(index_dir))?;
    println!("Index created successfully");
    Ok(())
}

fn run_query(corpus: &Path, index_dir: &Path, text: &str, limit: usize) -> newsdex_core::Result<()> {
    std::fs::create_dir_all(index_dir)?;
    let engine = SearchEngine::open(corpus, index_dir)?;
    let results = engine.search(text);

    println!("Found {} results:", results.len());
    let reader = JsonArticleReader;
    for (i, doc_id) in results.iter().take(limit).enumerate() {
        println!("{}. {}", i + 1, doc_id);
        if let Ok(record) = reader.read(Path::new(doc_id)) {
            if !record.title.is_empty() {
                println!("   Title: {}", record.title);
            }
        }
    }
    if results.len() > limit {
        println!("(Showing first {} of {} results)", limit, results.len());
    }
    Ok(())
}
