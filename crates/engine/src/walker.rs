//! Corpus traversal: enumerate every regular file under a root directory.
//!
//! Results are sorted lexicographically so ingestion order is deterministic.
//! An unreadable corpus root is a fatal [`Error::CorpusRoot`]; unreadable
//! entries deeper in the tree are logged and skipped.

use newsdex_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Recursively collect the regular files under `root`, sorted.
pub fn walk_corpus(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root).map_err(|e| Error::CorpusRoot {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    collect(entries, &mut files);
    files.sort();
    Ok(files)
}

fn collect(entries: std::fs::ReadDir, files: &mut Vec<PathBuf>) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(target: "newsdex::ingest", error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(target: "newsdex::ingest", path = %path.display(), error = %e, "Skipping entry with unknown type");
                continue;
            }
        };

        if file_type.is_dir() {
            match std::fs::read_dir(&path) {
                Ok(nested) => collect(nested, files),
                Err(e) => {
                    tracing::warn!(target: "newsdex::ingest", path = %path.display(), error = %e, "Skipping unreadable subdirectory");
                }
            }
        } else if file_type.is_file() {
            files.push(path);
        }
        // Symlinks and other special files are ignored.
    }
}
