//! Rankings over usage statistics
//!
//! Statistics files may come from this tool or from a dataframe export, so
//! records are read by column name, unknown columns are ignored and counts
//! are accepted as floats (`3.0`). The columns a record reads must be
//! present in the header.

use crate::error::{CsvResultExt, ParlaMintError, Result};
use crate::report::Legislatures;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Record of a per-form statistics file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormCountRecord {
    /// Verb form
    #[serde(rename = "Form")]
    pub form: String,
    /// Occurrences
    #[serde(rename = "Count")]
    pub count: Option<f64>,
}

/// Record of a per-session statistics file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpeakerUsageRecord {
    /// Speaker id
    #[serde(rename = "Speaker")]
    pub speaker: String,
    /// Future forms used; empty when the speaker was absent
    #[serde(rename = "UsageCount")]
    pub usage_count: Option<f64>,
}

/// A record type read from a statistics file
pub trait StatisticsRecord: DeserializeOwned {
    /// Header columns the record needs
    const COLUMNS: &'static [&'static str];
}

impl StatisticsRecord for FormCountRecord {
    const COLUMNS: &'static [&'static str] = &["Form", "Count"];
}

impl StatisticsRecord for SpeakerUsageRecord {
    const COLUMNS: &'static [&'static str] = &["Speaker", "UsageCount"];
}

/// One line of a ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// Form or speaker name
    pub label: String,
    /// Summed count
    pub count: u64,
}

/// Read all records of a statistics file
pub fn read_records<T: StatisticsRecord>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(ParlaMintError::NotFound(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path).with_path(path)?;
    let headers = reader.headers().with_path(path)?;
    if let Some(column) = T::COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(ParlaMintError::missing_column(path, *column));
    }
    reader
        .deserialize()
        .map(|r| r.with_path(path))
        .collect()
}

/// Sum counts per label and keep the `n` largest
///
/// Ties are broken by label so the ranking is stable across runs.
pub fn rank<I>(counts: I, n: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut totals: HashMap<String, f64> = HashMap::new();
    for (label, count) in counts {
        *totals.entry(label).or_insert(0.0) += count;
    }

    let mut entries: Vec<RankedEntry> = totals
        .into_iter()
        .map(|(label, count)| RankedEntry {
            label,
            count: count.max(0.0).round() as u64,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries.truncate(n);
    entries
}

/// Most frequent verb forms
pub fn top_forms(records: &[FormCountRecord], n: usize) -> Vec<RankedEntry> {
    rank(
        records
            .iter()
            .map(|r| (r.form.clone(), r.count.unwrap_or(0.0))),
        n,
    )
}

/// Speakers using future forms the most, named when the legislatures know them
pub fn top_speakers(
    records: &[SpeakerUsageRecord],
    n: usize,
    legislatures: Option<&Legislatures>,
) -> Vec<RankedEntry> {
    let mut ranked = rank(
        records
            .iter()
            .map(|r| (r.speaker.clone(), r.usage_count.unwrap_or(0.0))),
        n,
    );

    if let Some(legislatures) = legislatures {
        for entry in &mut ranked {
            if let Some(name) = legislatures.find_name(&entry.label) {
                entry.label = name.to_string();
            }
        }
    }
    ranked
}
