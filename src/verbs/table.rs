//! Verb form tables
//!
//! A table holds one column per conjugation category (`Infinitiv`,
//! `Viitor`, ...) and one row per inflected form. Tables are built by the
//! scraper, one verb at a time, and read back by the corpus analysis.

use crate::error::{CsvResultExt, IoResultExt, ParlaMintError, Result};
use regex::Regex;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Column holding the future tense forms
pub const FUTURE_COLUMN: &str = "Viitor";

/// Column holding the infinitive forms
pub const INFINITIVE_COLUMN: &str = "Infinitiv";

/// Personal pronouns the conjugation site prints in front of each form
pub const PRONOUNS: [&str; 6] = ["eu", "tu", "el/ea", "noi", "voi", "ei/ele"];

static PRONOUN_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(eu|tu|el/ea|noi|voi|ei/ele)\s").expect("Invalid pronoun regex")
});

/// Remove a leading personal pronoun from every line of a conjugated form
pub fn strip_pronoun(form: &str) -> String {
    PRONOUN_PREFIX.replace_all(form, "").trim().to_string()
}

/// Column-oriented table of verb forms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerbFormTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    #[serde(skip)]
    origin: Option<PathBuf>,
}

impl VerbFormTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names in order of first appearance
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Non-empty values of a column, or `None` if the column does not exist
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(idx).and_then(|v| v.as_deref()))
                .collect(),
        )
    }

    fn require_column(&self, name: &str) -> Result<Vec<&str>> {
        self.column(name).ok_or_else(|| {
            ParlaMintError::missing_column(self.origin.clone().unwrap_or_default(), name)
        })
    }

    /// Append the conjugation of one verb
    ///
    /// Shorter columns are padded with empty cells up to the longest one.
    /// A name repeated within `forms` keeps its first position and its last
    /// values. Returns the number of rows added.
    pub fn append(&mut self, forms: &[(String, Vec<String>)]) -> usize {
        let mut merged: Vec<(&str, &[String])> = Vec::with_capacity(forms.len());
        for (name, values) in forms {
            match merged.iter_mut().find(|(n, _)| *n == name.as_str()) {
                Some(slot) => slot.1 = values.as_slice(),
                None => merged.push((name.as_str(), values.as_slice())),
            }
        }

        for (name, _) in &merged {
            if self.column_index(name).is_none() {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(None);
                }
            }
        }

        let height = merged.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let width = self.columns.len();
        let indices: Vec<Option<usize>> = merged
            .iter()
            .map(|(name, _)| self.column_index(name))
            .collect();

        for i in 0..height {
            let mut row = vec![None; width];
            for ((_, values), idx) in merged.iter().zip(&indices) {
                if let (Some(idx), Some(value)) = (idx, values.get(i)) {
                    row[*idx] = Some(value.clone());
                }
            }
            self.rows.push(row);
        }

        height
    }

    /// Future tense forms with their pronouns removed
    pub fn future_forms(&self) -> Result<Vec<String>> {
        Ok(self
            .require_column(FUTURE_COLUMN)?
            .into_iter()
            .map(strip_pronoun)
            .filter(|f| !f.is_empty())
            .collect())
    }

    /// Infinitive forms
    pub fn infinitive_forms(&self) -> Result<Vec<String>> {
        Ok(self
            .require_column(INFINITIVE_COLUMN)?
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect())
    }

    /// Load a table from a CSV file
    pub fn from_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ParlaMintError::NotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path).with_path(path)?;
        let mut table = Self::from_reader(file, path)?;
        table.origin = Some(path.to_path_buf());
        Ok(table)
    }

    /// Read a table from any CSV source
    ///
    /// A leading column with an empty header is treated as a row index
    /// and dropped.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers().with_path(origin)?.clone();
        let skip = usize::from(headers.get(0).is_some_and(|h| h.trim().is_empty()));
        let columns: Vec<String> = headers.iter().skip(skip).map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record.with_path(origin)?;
            let row = (0..columns.len())
                .map(|i| {
                    record
                        .get(i + skip)
                        .filter(|v| !v.is_empty())
                        .map(|v| v.to_string())
                })
                .collect();
            rows.push(row);
        }

        Ok(Self {
            columns,
            rows,
            origin: None,
        })
    }

    /// Write the table to a CSV file, replacing it
    pub fn to_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_path(parent)?;
        }
        let file = std::fs::File::create(path).with_path(path)?;
        self.write_to(file, path)
    }

    /// Write the table as CSV to any sink
    pub fn write_to<W: Write>(&self, writer: W, origin: &Path) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&self.columns).with_path(origin)?;
        for row in &self.rows {
            csv.write_record(row.iter().map(|v| v.as_deref().unwrap_or("")))
                .with_path(origin)?;
        }
        csv.flush().with_path(origin)
    }
}
