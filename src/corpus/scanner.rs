//! Corpus file discovery
//!
//! The corpus root file (`ParlaMint-RO.xml`) includes every session file
//! that lives next to it. Linguistically annotated variants carry an extra
//! `.ana` suffix and are left out.

use crate::error::{ParlaMintError, Result};
use globset::{Glob, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds the session files of a corpus
pub struct CorpusScanner {
    root_file: PathBuf,
    matcher: GlobMatcher,
}

impl CorpusScanner {
    /// Create a scanner for the corpus rooted at `root_file`
    pub fn new(root_file: impl Into<PathBuf>) -> Result<Self> {
        let matcher = Glob::new("*.xml")
            .map_err(|e| ParlaMintError::config(format!("Invalid glob pattern: {}", e)))?
            .compile_matcher();
        Ok(Self {
            root_file: root_file.into(),
            matcher,
        })
    }

    /// Directory holding the session files
    pub fn corpus_dir(&self) -> PathBuf {
        match self.root_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Session files, sorted by path
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let dir = self.corpus_dir();
        if !dir.is_dir() {
            return Err(ParlaMintError::NotFound(dir));
        }

        let root_name = self.root_file.file_name();
        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                match e.into_io_error() {
                    Some(io) => ParlaMintError::io(path, io),
                    None => ParlaMintError::config(format!("Filesystem loop at {}", path.display())),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name();
            if Some(name) == root_name || !self.matcher.is_match(name) {
                continue;
            }
            if is_annotated(entry.path()) {
                continue;
            }
            tracing::debug!("Found session file {}", entry.path().display());
            files.push(entry.into_path());
        }

        files.sort();
        Ok(files)
    }
}

/// Check if any of the file's suffixes is `.ana`
pub fn is_annotated(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.trim_start_matches('.').split('.').skip(1).any(|s| s == "ana"))
        .unwrap_or(false)
}
