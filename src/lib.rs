//! # ParlaMint - Future Tense Usage in the Romanian Parliament
//!
//! Tools behind "ParlaMint-RO: Chamber of the Eternal Future": they measure
//! how often members of the Romanian parliament speak in the future tense,
//! using the TEI-encoded ParlaMint-RO corpus of plenary transcripts
//! (2000-2020).
//!
//! ## Pipeline
//!
//! - **Scrape**: collect conjugation tables for a verb list
//! - **Count**: count future forms per speaker and session, in parallel
//! - **Rank**: top verb forms and top speakers, with deputy names resolved
//!   from per-legislature lists
//!
//! ## Quick Start
//!
//! ```no_run
//! use parlamint::analysis::AnalysisEngine;
//! use parlamint::config::AnalysisConfig;
//! use std::path::PathBuf;
//!
//! let config = AnalysisConfig {
//!     corpus_root_file: PathBuf::from("data/corpus/ParlaMint-RO.xml"),
//!     verb_forms_file: PathBuf::from("data/verb-forms.csv"),
//!     statistics_file: PathBuf::from("data/future-usage-per-speaker.csv"),
//!     ..Default::default()
//! };
//!
//! let summary = AnalysisEngine::new(config).per_session().unwrap();
//! summary.print_summary();
//! ```
//!
//! ## Reading a Session
//!
//! ```no_run
//! use parlamint::corpus::Session;
//! use parlamint::analysis::session_usage;
//! use std::path::Path;
//!
//! let session = Session::parse(Path::new("ParlaMint-RO_2019-03-12.xml")).unwrap();
//! let usage = session_usage(&["vom vota".to_string()], &session);
//! for (speaker, count) in &usage.counts {
//!     println!("{} {} {}", session.date, speaker, count);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod corpus;
pub mod error;
pub mod progress;
pub mod report;
pub mod scrape;
pub mod verbs;

// Re-export commonly used types
pub use analysis::{AnalysisEngine, AnalysisSummary};
pub use config::{AnalysisConfig, ReportConfig, ScrapeConfig};
pub use error::{ParlaMintError, Result};
pub use progress::ProgressReporter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use parlamint::prelude::*;
    //! ```

    pub use crate::analysis::{
        count_occurrences, session_form_counts, session_usage, AnalysisEngine, AnalysisSummary,
    };
    pub use crate::config::{AnalysisConfig, ReportConfig, ScrapeConfig};
    pub use crate::corpus::{CorpusScanner, Session, TextMode, Utterance};
    pub use crate::error::{ParlaMintError, Result};
    pub use crate::progress::ProgressReporter;
    pub use crate::report::{Legislatures, RankedEntry, Report};
    pub use crate::scrape::{parse_conjugation_page, Scraper};
    pub use crate::verbs::{load_verbs, VerbFormTable};
}
