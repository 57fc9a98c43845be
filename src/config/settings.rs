//! Configuration settings for ParlaMint
//!
//! Defines all configuration options, CLI arguments, and defaults
//! for the scraper, the corpus analysis and the reports.

use crate::corpus::TextMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default conjugation site
pub const DEFAULT_BASE_URL: &str = "https://conjugare.ro";

/// ParlaMint - future tense usage in the Romanian parliament
#[derive(Parser, Debug, Clone)]
#[command(name = "parlamint")]
#[command(author = "ParlaMint-RO Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Future tense usage statistics for the ParlaMint-RO corpus")]
#[command(long_about = r#"
ParlaMint counts how often members of the Romanian parliament use verbs in
the future tense, session by session, in the TEI-encoded ParlaMint-RO corpus.

Workflow:
  1. scrape        - collect conjugation tables for a list of verbs
  2. per-session   - count future forms per speaker and session
     per-form      - count each future form per speaker and session
  3. top-forms     - rank the most frequent future forms
     top-speakers  - rank the speakers using future forms the most

Examples:
  parlamint scrape --verbs-file data/dex-entries.csv
  parlamint --num-jobs 8 per-session --corpus-root-file data/corpus/ParlaMint-RO.xml
  parlamint top-speakers -N 20 --legislatures data/legislatures
"#)]
pub struct CliArgs {
    /// The level of details to print when running
    #[arg(short = 'l', long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Maximum number of concurrently running jobs
    /// (0 = all CPUs, -k = all CPUs but k-1)
    #[arg(
        short = 'j',
        long,
        default_value_t = -2,
        allow_negative_numbers = true,
        global = true,
        value_name = "NUM"
    )]
    pub num_jobs: i32,

    /// Quiet mode (no progress bars)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Skip session files that fail to parse and verbs whose request fails,
    /// instead of aborting
    #[arg(long, global = true)]
    pub continue_on_error: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Crawl verb forms from the conjugation site
    #[command(name = "scrape")]
    Scrape {
        /// Path to the CSV file containing verbs
        #[arg(long, default_value = "./data/dex-entries.csv", value_name = "PATH")]
        verbs_file: PathBuf,
        /// Field delimiter of the verbs file
        #[arg(long, default_value_t = ';')]
        delimiter: char,
        /// Path to the output file
        #[arg(long, default_value = "./data/verb-forms.csv", value_name = "PATH")]
        output_file: PathBuf,
        /// Base URL of the conjugation site
        #[arg(long, default_value = DEFAULT_BASE_URL, value_name = "URL")]
        base_url: String,
        /// Upper bound of the random pause between requests, in seconds
        #[arg(long, default_value_t = 1, value_name = "SECS")]
        max_delay: u64,
    },

    /// Count future tense usage per session
    #[command(name = "per-session")]
    PerSession {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// The path of the output CSV file containing statistics
        #[arg(
            long,
            default_value = "../data/future-usage-per-speaker.csv",
            value_name = "PATH"
        )]
        statistics_file: PathBuf,
    },

    /// Count future tense usage per verb form
    #[command(name = "per-form")]
    PerForm {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// The path of the output CSV file containing statistics
        #[arg(
            long,
            default_value = "../data/future-usage-per-form.csv",
            value_name = "PATH"
        )]
        statistics_file: PathBuf,
    },

    /// Plot most frequent N verb forms
    #[command(name = "top-forms")]
    TopForms {
        /// Number of forms to plot
        #[arg(short = 'N', default_value_t = 100)]
        n: usize,
        /// Path of the file containing usage statistics
        #[arg(
            long,
            default_value = "../data/future-usage-per-form.csv",
            value_name = "PATH"
        )]
        statistics_file: PathBuf,
        /// Path of the chart file (.svg or .txt)
        #[arg(long, default_value = "../plots/top-verb-forms.svg", value_name = "PATH")]
        output_file: PathBuf,
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Plot most frequent N users of verb forms
    #[command(name = "top-speakers")]
    TopSpeakers {
        /// Number of speakers to plot
        #[arg(short = 'N', default_value_t = 10)]
        n: usize,
        /// Path of the file containing usage statistics
        #[arg(
            long,
            default_value = "../data/future-usage-per-speaker.csv",
            value_name = "PATH"
        )]
        statistics_file: PathBuf,
        /// Path of the chart file (.svg or .txt)
        #[arg(long, default_value = "../plots/top-speakers.svg", value_name = "PATH")]
        output_file: PathBuf,
        /// Directory path containing deputy info per legislature
        #[arg(long, default_value = "../data/legislatures", value_name = "DIR")]
        legislatures: PathBuf,
        #[command(flatten)]
        report: ReportArgs,
    },
}

/// Corpus inputs shared by the counting commands
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// The path of the ParlaMint corpus root file
    #[arg(long, default_value = "../data/corpus/ParlaMint-RO.xml", value_name = "PATH")]
    pub corpus_root_file: PathBuf,
    /// The path of the CSV file containing verb forms
    #[arg(long, default_value = "../data/verb-forms.csv", value_name = "PATH")]
    pub verb_forms_file: PathBuf,
    /// Also count text that follows nested elements inside an utterance
    #[arg(long)]
    pub keep_tail_text: bool,
    /// Count each distinct verb form once, even when the table lists it twice
    #[arg(long)]
    pub dedup_forms: bool,
}

/// Options shared by the report commands
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Store the data shown in the plot
    #[arg(long)]
    pub save_plot_data: bool,
    /// Path of the file where to store plot data
    #[arg(long, default_value = "../data/plot-data.csv", value_name = "PATH")]
    pub plot_data_file: PathBuf,
    /// Output format for the ranking printed to stdout
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Log verbosity accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything, including per-file details
    Debug,
    /// Progress messages
    #[default]
    Info,
    /// Only problems
    Warning,
    /// Only errors
    Error,
    /// Same as error
    Critical,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table and bar chart
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Translate a joblib-style job count into a worker count
pub fn resolve_jobs(num_jobs: i32, cpus: usize) -> usize {
    let cpus = cpus.max(1) as i64;
    let jobs = match num_jobs {
        0 => cpus,
        n if n > 0 => n as i64,
        n => cpus + 1 + n as i64,
    };
    jobs.max(1) as usize
}

/// Runtime configuration for the counting commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Corpus root file; session files live next to it
    pub corpus_root_file: PathBuf,
    /// Verb forms table produced by the scraper
    pub verb_forms_file: PathBuf,
    /// Output CSV path
    pub statistics_file: PathBuf,
    /// Worker count
    pub threads: usize,
    /// Continue on error
    pub continue_on_error: bool,
    /// How utterance text is collected
    pub text_mode: TextMode,
    /// Drop repeated verb forms before counting
    pub dedup_forms: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            corpus_root_file: PathBuf::from("../data/corpus/ParlaMint-RO.xml"),
            verb_forms_file: PathBuf::from("../data/verb-forms.csv"),
            statistics_file: PathBuf::from("../data/future-usage-per-speaker.csv"),
            threads: resolve_jobs(-2, num_cpus::get()),
            continue_on_error: false,
            text_mode: TextMode::Inner,
            dedup_forms: false,
        }
    }
}

impl AnalysisConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let (corpus, statistics_file) = match &args.command {
            Commands::PerSession {
                corpus,
                statistics_file,
            }
            | Commands::PerForm {
                corpus,
                statistics_file,
            } => (corpus, statistics_file),
            _ => return Err("Not a counting command".to_string()),
        };

        Ok(Self {
            corpus_root_file: corpus.corpus_root_file.clone(),
            verb_forms_file: corpus.verb_forms_file.clone(),
            statistics_file: statistics_file.clone(),
            threads: resolve_jobs(args.num_jobs, num_cpus::get()),
            continue_on_error: args.continue_on_error,
            text_mode: if corpus.keep_tail_text {
                TextMode::Full
            } else {
                TextMode::Inner
            },
            dedup_forms: corpus.dedup_forms,
        })
    }
}

/// Runtime configuration for the scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Verbs to look up, one per row in the first column
    pub verbs_file: PathBuf,
    /// Field delimiter of the verbs file
    pub delimiter: u8,
    /// Output CSV path
    pub output_file: PathBuf,
    /// Base URL of the conjugation site
    pub base_url: String,
    /// Upper bound of the pause between requests, in seconds
    pub max_delay_secs: u64,
    /// Skip verbs whose request fails instead of aborting
    pub continue_on_error: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            verbs_file: PathBuf::from("./data/dex-entries.csv"),
            delimiter: b';',
            output_file: PathBuf::from("./data/verb-forms.csv"),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_delay_secs: 1,
            continue_on_error: false,
        }
    }
}

impl ScrapeConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        match &args.command {
            Commands::Scrape {
                verbs_file,
                delimiter,
                output_file,
                base_url,
                max_delay,
            } => {
                if !delimiter.is_ascii() {
                    return Err(format!("Delimiter must be a single ASCII character: {:?}", delimiter));
                }
                Ok(Self {
                    verbs_file: verbs_file.clone(),
                    delimiter: *delimiter as u8,
                    output_file: output_file.clone(),
                    base_url: base_url.trim_end_matches('/').to_string(),
                    max_delay_secs: *max_delay,
                    continue_on_error: args.continue_on_error,
                })
            }
            _ => Err("Not the scrape command".to_string()),
        }
    }
}

/// Runtime configuration for the report commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Statistics CSV produced by a counting command
    pub statistics_file: PathBuf,
    /// Where the rendered chart is written
    pub output_file: PathBuf,
    /// Number of entries to keep
    pub top_n: usize,
    /// Legislature directory (speaker rankings only)
    pub legislatures: Option<PathBuf>,
    /// Also write the ranked data as CSV
    pub save_plot_data: bool,
    /// Ranked data CSV path
    pub plot_data_file: PathBuf,
    /// Stdout format
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            statistics_file: PathBuf::from("../data/future-usage-per-form.csv"),
            output_file: PathBuf::from("../plots/top-verb-forms.svg"),
            top_n: 100,
            legislatures: None,
            save_plot_data: false,
            plot_data_file: PathBuf::from("../data/plot-data.csv"),
            format: OutputFormat::Text,
        }
    }
}

impl ReportConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let (n, statistics_file, output_file, legislatures, report) = match &args.command {
            Commands::TopForms {
                n,
                statistics_file,
                output_file,
                report,
            } => (n, statistics_file, output_file, None, report),
            Commands::TopSpeakers {
                n,
                statistics_file,
                output_file,
                legislatures,
                report,
            } => (n, statistics_file, output_file, Some(legislatures.clone()), report),
            _ => return Err("Not a report command".to_string()),
        };

        if *n == 0 {
            return Err("-N must be at least 1".to_string());
        }

        Ok(Self {
            statistics_file: statistics_file.clone(),
            output_file: output_file.clone(),
            top_n: *n,
            legislatures,
            save_plot_data: report.save_plot_data,
            plot_data_file: report.plot_data_file.clone(),
            format: report.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_jobs() {
        assert_eq!(resolve_jobs(4, 8), 4);
        assert_eq!(resolve_jobs(0, 8), 8);
        assert_eq!(resolve_jobs(-1, 8), 8);
        assert_eq!(resolve_jobs(-2, 8), 7);
        assert_eq!(resolve_jobs(-20, 8), 1);
        assert_eq!(resolve_jobs(-2, 1), 1);
    }

    #[test]
    fn test_log_level_directive() {
        assert_eq!(LogLevel::Warning.filter_directive(), "warn");
        assert_eq!(LogLevel::Critical.filter_directive(), "error");
    }

    #[test]
    fn test_parse_per_session() {
        let args = CliArgs::try_parse_from([
            "parlamint",
            "--num-jobs",
            "-1",
            "per-session",
            "--corpus-root-file",
            "corpus/ParlaMint-RO.xml",
        ])
        .unwrap();
        let config = AnalysisConfig::from_cli(&args).unwrap();
        assert_eq!(config.corpus_root_file, PathBuf::from("corpus/ParlaMint-RO.xml"));
        assert_eq!(
            config.statistics_file,
            PathBuf::from("../data/future-usage-per-speaker.csv")
        );
        assert_eq!(config.threads, num_cpus::get().max(1));
        assert_eq!(config.text_mode, TextMode::Inner);
        assert!(!config.dedup_forms);
        assert!(ScrapeConfig::from_cli(&args).is_err());
    }

    #[test]
    fn test_parse_counting_flags() {
        let args = CliArgs::try_parse_from([
            "parlamint",
            "per-form",
            "--keep-tail-text",
            "--dedup-forms",
            "--continue-on-error",
        ])
        .unwrap();
        let config = AnalysisConfig::from_cli(&args).unwrap();
        assert_eq!(config.text_mode, TextMode::Full);
        assert!(config.dedup_forms);
        assert!(config.continue_on_error);
    }

    #[test]
    fn test_parse_global_flag_after_subcommand() {
        let args =
            CliArgs::try_parse_from(["parlamint", "per-form", "--log-level", "debug", "-q"]).unwrap();
        assert_eq!(args.log_level, LogLevel::Debug);
        assert!(args.quiet);
    }

    #[test]
    fn test_parse_scrape() {
        let args = CliArgs::try_parse_from([
            "parlamint",
            "scrape",
            "--delimiter",
            ",",
            "--base-url",
            "http://localhost:8080/",
        ])
        .unwrap();
        let config = ScrapeConfig::from_cli(&args).unwrap();
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_delay_secs, 1);
        assert!(!config.continue_on_error);

        let args =
            CliArgs::try_parse_from(["parlamint", "--continue-on-error", "scrape"]).unwrap();
        assert!(ScrapeConfig::from_cli(&args).unwrap().continue_on_error);
    }

    #[test]
    fn test_parse_top_speakers() {
        let args = CliArgs::try_parse_from([
            "parlamint",
            "top-speakers",
            "-N",
            "5",
            "--save-plot-data",
            "--format",
            "json",
        ])
        .unwrap();
        let config = ReportConfig::from_cli(&args).unwrap();
        assert_eq!(config.top_n, 5);
        assert!(config.save_plot_data);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.legislatures, Some(PathBuf::from("../data/legislatures")));
        assert_eq!(config.output_file, PathBuf::from("../plots/top-speakers.svg"));
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let args = CliArgs::try_parse_from(["parlamint", "top-forms", "-N", "0"]).unwrap();
        assert!(ReportConfig::from_cli(&args).is_err());
    }
}
