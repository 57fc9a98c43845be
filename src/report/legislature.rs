//! Deputy lists per legislature
//!
//! The legislature directory holds one CSV per term, named after the term
//! (`deputati-2016-2020.csv`), with the deputy name in the first column and
//! the party in the second. Speaker ids in the corpus are matched against
//! these names by comparing their sets of normalized name parts.

use crate::error::{CsvResultExt, ParlaMintError, Result};
use globset::Glob;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{4})").expect("Invalid legislature term regex"));

/// Start and end year of the legislature named in a file name
pub fn legislature_term(file_name: &str) -> Result<(i32, i32)> {
    let caps = TERM
        .captures(file_name)
        .ok_or_else(|| ParlaMintError::MissingTerm(file_name.to_string()))?;
    let year = |i: usize| -> Result<i32> {
        caps[i]
            .parse()
            .map_err(|_| ParlaMintError::MissingTerm(file_name.to_string()))
    };
    Ok((year(1)?, year(2)?))
}

/// Canonical name parts of a name or a speaker id
///
/// `#` is dropped, `ș`/`ț` are folded to `s`/`t` and hyphens separate parts.
pub fn name_parts(name_or_id: &str) -> BTreeSet<String> {
    let folded: String = name_or_id
        .chars()
        .filter(|c| *c != '#')
        .map(|c| match c {
            'Ș' | 'ș' | 'Ş' | 'ş' => 's',
            'Ț' | 'ț' | 'Ţ' | 'ţ' => 't',
            '-' => ' ',
            other => other,
        })
        .collect();
    folded
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// One deputy in one legislature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeputyRecord {
    /// Name as written in the legislature file
    pub name: String,
    /// First year of the term
    pub start: i32,
    /// Last year of the term
    pub end: i32,
    /// Party affiliation
    pub party: String,
}

/// Deputies of all known legislatures
#[derive(Debug, Default)]
pub struct Legislatures {
    records: Vec<DeputyRecord>,
    names: Vec<(String, BTreeSet<String>)>,
}

impl Legislatures {
    /// Load every `*.csv` file of a directory
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ParlaMintError::NotFound(dir.to_path_buf()));
        }
        let matcher = Glob::new("*.csv")
            .map_err(|e| ParlaMintError::config(format!("Invalid glob pattern: {}", e)))?
            .compile_matcher();

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && matcher.is_match(e.file_name()))
            .map(|e| e.into_path())
            .collect();
        files.sort();

        let mut legislatures = Self::default();
        for file in files {
            legislatures.load_file(&file)?;
        }
        tracing::debug!(
            "Loaded {} deputies from {}",
            legislatures.records.len(),
            dir.display()
        );
        Ok(legislatures)
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (start, end) = legislature_term(&stem)?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_path(path)?;
        let mut known: HashSet<String> = self.names.iter().map(|(n, _)| n.clone()).collect();

        for record in reader.records() {
            let record = record.with_path(path)?;
            let Some(name) = record.get(0).filter(|n| !n.trim().is_empty()) else {
                continue;
            };
            let party = record.get(1).unwrap_or("").trim().to_string();
            self.insert(name, start, end, party, &mut known);
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, start: i32, end: i32, party: String, known: &mut HashSet<String>) {
        self.records.push(DeputyRecord {
            name: name.to_string(),
            start,
            end,
            party,
        });
        if known.insert(name.to_string()) {
            self.names.push((name.to_string(), name_parts(name)));
        }
    }

    /// All deputy records
    pub fn records(&self) -> &[DeputyRecord] {
        &self.records
    }

    /// Party of a deputy in the legislature covering `year`
    pub fn party(&self, name: &str, year: i32) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.name == name && r.start <= year && year <= r.end)
            .map(|r| r.party.as_str())
    }

    /// Look a speaker name up by its id
    pub fn find_name(&self, speaker_id: &str) -> Option<&str> {
        let parts = name_parts(speaker_id);
        tracing::debug!("Looking up {} as {:?}", speaker_id, parts);
        self.names
            .iter()
            .find(|(_, p)| *p == parts)
            .map(|(name, _)| name.as_str())
    }
}
