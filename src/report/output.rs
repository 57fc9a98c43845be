//! Report commands
//!
//! Reads a statistics file, ranks it and writes the chart, the optional
//! plot data and the stdout rendering.

use crate::config::{OutputFormat, ReportConfig};
use crate::error::{CsvResultExt, IoResultExt, ParlaMintError, Result};
use crate::report::{
    read_records, render_bar_chart, render_svg_bar_chart, top_forms, top_speakers, ChartFormat,
    ChartLabels, FormCountRecord, Legislatures, RankedEntry, SpeakerUsageRecord,
};
use serde::Serialize;
use std::path::Path;

/// A finished ranking
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Chart title
    pub title: String,
    /// Column names of the plot data: label, count
    pub columns: (String, String),
    /// Axis descriptions of the chart image: x, y
    pub axes: (String, String),
    /// Ranked entries
    pub entries: Vec<RankedEntry>,
}

impl Report {
    /// Rank the most frequent verb forms
    pub fn top_forms(config: &ReportConfig) -> Result<Self> {
        let records: Vec<FormCountRecord> = read_records(&config.statistics_file)?;
        tracing::info!("Ranking {} form records.", records.len());
        Ok(Self {
            title: format!("Top {} future verb forms", config.top_n),
            columns: ("Form".to_string(), "Count".to_string()),
            axes: ("Verb form".to_string(), "Count".to_string()),
            entries: top_forms(&records, config.top_n),
        })
    }

    /// Rank the speakers using most future forms
    pub fn top_speakers(config: &ReportConfig) -> Result<Self> {
        let legislatures = match &config.legislatures {
            Some(dir) => match Legislatures::load(dir) {
                Ok(legislatures) => Some(legislatures),
                Err(ParlaMintError::NotFound(path)) => {
                    tracing::warn!(
                        "Legislatures directory {} not found; speakers keep their ids.",
                        path.display()
                    );
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };
        let records: Vec<SpeakerUsageRecord> = read_records(&config.statistics_file)?;
        tracing::info!("Ranking {} speaker records.", records.len());
        Ok(Self {
            title: format!("Top {} speakers using future forms", config.top_n),
            columns: ("Speakers".to_string(), "UsageCount".to_string()),
            axes: (
                "Speaker name".to_string(),
                "Count of future forms used".to_string(),
            ),
            entries: top_speakers(&records, config.top_n, legislatures.as_ref()),
        })
    }

    /// Text chart of the ranking
    pub fn chart(&self) -> String {
        render_bar_chart(&self.title, &self.entries)
    }

    /// SVG chart of the ranking
    pub fn svg_chart(&self) -> Result<String> {
        let labels = ChartLabels {
            title: &self.title,
            x_desc: &self.axes.0,
            y_desc: &self.axes.1,
        };
        render_svg_bar_chart(labels, &self.entries)
    }

    /// Write the plot data as CSV
    pub fn write_plot_data(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let mut writer = csv::Writer::from_path(path).with_path(path)?;
        writer
            .write_record([&self.columns.0, &self.columns.1])
            .with_path(path)?;
        for entry in &self.entries {
            writer
                .write_record([entry.label.as_str(), entry.count.to_string().as_str()])
                .with_path(path)?;
        }
        writer.flush().with_path(path)
    }

    /// Write outputs and print the ranking as configured
    pub fn emit(&self, config: &ReportConfig) -> Result<()> {
        let chart = self.chart();
        let file_contents = match ChartFormat::from_path(&config.output_file)? {
            ChartFormat::Svg => self.svg_chart()?,
            ChartFormat::Text => chart.clone(),
        };

        ensure_parent(&config.output_file)?;
        std::fs::write(&config.output_file, file_contents).with_path(&config.output_file)?;
        tracing::info!("Chart saved to {}.", config.output_file.display());

        if config.save_plot_data {
            self.write_plot_data(&config.plot_data_file)?;
            tracing::info!("Plot data saved to {}.", config.plot_data_file.display());
        }

        match config.format {
            OutputFormat::Text => print!("{}", chart),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(self)?),
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_path(parent)?;
    }
    Ok(())
}
