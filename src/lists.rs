//! Newline-delimited domain lists (disposable providers, popular domains).
//!
//! One domain per line; blank lines and `#` comments are ignored, entries are
//! trimmed, lower-cased and stripped of a trailing dot.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListError {
    #[error("cannot open domain list {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read domain list: {source}")]
    Read {
        #[source]
        source: io::Error,
    },
    #[error("domain list is empty")]
    Empty,
}

pub(crate) fn normalize_entry(raw: &str) -> Option<String> {
    let entry = raw.split('#').next().unwrap_or_default().trim();
    let entry = entry.trim_end_matches('.');
    if entry.is_empty() {
        None
    } else {
        Some(entry.to_ascii_lowercase())
    }
}

/// Reads every entry, preserving file order and dropping duplicates.
pub(crate) fn read_domains<R: BufRead>(reader: R) -> Result<Vec<String>, ListError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| ListError::Read { source })?;
        if let Some(entry) = normalize_entry(&line) {
            if seen.insert(entry.clone()) {
                out.push(entry);
            }
        }
    }
    Ok(out)
}

pub(crate) fn open(path: &Path) -> Result<BufReader<File>, ListError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ListError::Open {
            path: path.to_path_buf(),
            source,
        })
}
