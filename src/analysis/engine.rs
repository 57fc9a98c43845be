//! Corpus analysis engine
//!
//! Parses every session file of the corpus on a rayon pool, counts the
//! future tense forms, aggregates the per-session results and writes the
//! statistics as CSV.

use crate::analysis::{session_form_counts, session_usage, FormCounts, SessionUsage};
use crate::config::AnalysisConfig;
use crate::corpus::{CorpusScanner, Session};
use crate::error::{CsvResultExt, IoResultExt, ParlaMintError, Result};
use crate::progress::ProgressReporter;
use crate::verbs::VerbFormTable;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Row of the per-session statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUsageRow {
    /// Speaker id
    #[serde(rename = "Speaker")]
    pub speaker: String,
    /// Session date
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Future forms used; empty when the speaker did not speak that day
    #[serde(rename = "UsageCount")]
    pub usage_count: Option<u64>,
}

impl SessionUsageRow {
    /// Header of the per-session statistics file
    pub const COLUMNS: [&'static str; 3] = ["Speaker", "Date", "UsageCount"];
}

/// Row of the per-form statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormUsageRow {
    /// Speaker id
    #[serde(rename = "Speaker")]
    pub speaker: String,
    /// Session date
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Verb form
    #[serde(rename = "Form")]
    pub form: String,
    /// Occurrences
    #[serde(rename = "Count")]
    pub count: u64,
}

impl FormUsageRow {
    /// Header of the per-form statistics file
    pub const COLUMNS: [&'static str; 4] = ["Speaker", "Date", "Form", "Count"];
}

/// Build the speaker x date grid from per-session usage
///
/// A later session with an already seen date replaces the earlier one.
/// Rows are ordered by speaker, then date.
pub fn aggregate_sessions(usages: Vec<SessionUsage>) -> Vec<SessionUsageRow> {
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<String, u64>> = BTreeMap::new();
    let mut speakers = BTreeSet::new();

    for usage in usages {
        speakers.extend(usage.counts.keys().cloned());
        by_date.insert(usage.date, usage.counts);
    }

    let mut rows = Vec::with_capacity(speakers.len() * by_date.len());
    for speaker in &speakers {
        for (date, counts) in &by_date {
            rows.push(SessionUsageRow {
                speaker: speaker.clone(),
                date: *date,
                usage_count: counts.get(speaker).copied(),
            });
        }
    }
    rows
}

/// Flatten per-session form counts into rows, keeping session order
pub fn flatten_form_counts(counts: Vec<FormCounts>) -> Vec<FormUsageRow> {
    counts
        .into_iter()
        .flat_map(|session| session.into_iter())
        .map(|(key, count)| FormUsageRow {
            speaker: key.speaker,
            date: key.date,
            form: key.form,
            count,
        })
        .collect()
}

/// Write rows as CSV under `columns`, replacing the file; returns the number of rows
///
/// The header is written even when there are no rows.
pub fn write_rows<S: Serialize>(path: &Path, columns: &[&str], rows: &[S]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_path(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_path(path)?;
    writer.write_record(columns).with_path(path)?;
    for row in rows {
        writer.serialize(row).with_path(path)?;
    }
    writer.flush().with_path(path)?;
    Ok(rows.len())
}

/// Analysis run result
#[derive(Debug)]
pub struct AnalysisSummary {
    /// Session files counted
    pub files_processed: u64,
    /// Files skipped with their error
    pub failures: Vec<(String, String)>,
    /// Rows in the statistics file
    pub rows_written: usize,
    /// Statistics file
    pub statistics_file: PathBuf,
    /// Total duration
    pub duration: Duration,
}

impl AnalysisSummary {
    /// Check if every file was counted
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Analysis Summary ===");
        println!("Session files:   {}", self.files_processed);
        println!("Rows written:    {}", self.rows_written);
        println!("Statistics:      {}", self.statistics_file.display());
        println!(
            "Duration:        {}",
            humantime::format_duration(Duration::from_millis(self.duration.as_millis() as u64))
        );

        if !self.failures.is_empty() {
            println!("\nSkipped files: {}", self.failures.len());
            for (path, error) in &self.failures {
                println!("  {} - {}", path, error);
            }
        }
    }
}

/// Main analysis engine
pub struct AnalysisEngine {
    config: AnalysisConfig,
    progress: Option<ProgressReporter>,
}

impl AnalysisEngine {
    /// Create a new analysis engine
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Set progress reporter
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Load the future tense forms to look for
    pub fn load_forms(&self) -> Result<Vec<String>> {
        tracing::info!("Loading verb forms.");
        let table = VerbFormTable::from_csv(&self.config.verb_forms_file)?;

        tracing::info!("Extracting future forms.");
        let mut forms = table.future_forms()?;
        if self.config.dedup_forms {
            let before = forms.len();
            let mut seen = BTreeSet::new();
            forms.retain(|f| seen.insert(f.clone()));
            tracing::debug!("{} duplicate forms dropped", before - forms.len());
        }
        tracing::debug!("Counting {} future forms", forms.len());
        Ok(forms)
    }

    /// Count future tense usage per speaker and session
    pub fn per_session(&self) -> Result<AnalysisSummary> {
        let start = Instant::now();
        let forms = self.load_forms()?;

        tracing::info!("Computing statistics.");
        let (usages, failures) = self.process_sessions(|session| session_usage(&forms, session))?;
        let files_processed = usages.len() as u64;

        tracing::info!("Aggregating statistics.");
        let rows = aggregate_sessions(usages);

        let rows_written = self.save(&SessionUsageRow::COLUMNS, &rows)?;
        Ok(AnalysisSummary {
            files_processed,
            failures,
            rows_written,
            statistics_file: self.config.statistics_file.clone(),
            duration: start.elapsed(),
        })
    }

    /// Count future tense usage per verb form
    pub fn per_form(&self) -> Result<AnalysisSummary> {
        let start = Instant::now();
        let forms = self.load_forms()?;

        tracing::info!("Computing statistics.");
        let (counts, failures) =
            self.process_sessions(|session| session_form_counts(&forms, session))?;
        let files_processed = counts.len() as u64;

        tracing::info!("Aggregating statistics.");
        let rows = flatten_form_counts(counts);

        let rows_written = self.save(&FormUsageRow::COLUMNS, &rows)?;
        Ok(AnalysisSummary {
            files_processed,
            failures,
            rows_written,
            statistics_file: self.config.statistics_file.clone(),
            duration: start.elapsed(),
        })
    }

    fn save<S: Serialize>(&self, columns: &[&str], rows: &[S]) -> Result<usize> {
        let output = &self.config.statistics_file;
        tracing::info!("Saving statistics to {}.", output.display());
        write_rows(output, columns, rows)
    }

    /// Parse every session file in parallel and apply `count` to it
    ///
    /// Results keep the scan order of the files.
    fn process_sessions<T, F>(&self, count: F) -> Result<(Vec<T>, Vec<(String, String)>)>
    where
        T: Send,
        F: Fn(&Session) -> T + Sync,
    {
        let files = CorpusScanner::new(&self.config.corpus_root_file)?.files()?;
        if files.is_empty() {
            tracing::warn!(
                "No session files found next to {}",
                self.config.corpus_root_file.display()
            );
        }

        if let Some(progress) = &self.progress {
            progress.set_total(files.len() as u64);
            progress.set_status("Counting future forms...");
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.max(1))
            .build()
            .map_err(|e| ParlaMintError::ThreadPoolError(e.to_string()))?;

        let progress = &self.progress;
        let mode = self.config.text_mode;
        let results: Vec<(PathBuf, Result<T>)> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    tracing::info!("Extracting statistics from {}.", path.display());
                    let result = Session::parse_with_mode(path, mode).map(|session| count(&session));

                    if let Some(progress) = progress {
                        progress.increment(1);
                    }
                    (path.clone(), result)
                })
                .collect()
        });

        let mut values = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (path, result) in results {
            match result {
                Ok(value) => values.push(value),
                Err(e) if self.config.continue_on_error => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    failures.push((path.display().to_string(), e.to_string()));
                }
                Err(e) => {
                    if let Some(progress) = &self.progress {
                        progress.finish_error("Analysis failed");
                    }
                    return Err(e);
                }
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish_success(&format!("Counted {} session files", values.len()));
        }

        Ok((values, failures))
    }
}
