//! Verb form scraper
//!
//! Builds the verb form table from the conjugation site.

mod client;
mod page;

pub use client::*;
pub use page::*;
