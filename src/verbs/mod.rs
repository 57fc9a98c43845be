//! Verb lists and verb form tables
//!
//! Inputs of the scraper and of the corpus analysis.

mod list;
mod table;

pub use list::*;
pub use table::*;
