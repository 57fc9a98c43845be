//! Future tense usage analysis
//!
//! Counts verb forms in the utterances of each session and aggregates
//! the counts per speaker, date and form.

mod counter;
mod engine;

pub use counter::*;
pub use engine::*;
