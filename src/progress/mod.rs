//! Progress reporting module
//!
//! Provides progress visualization for corpus analysis and scraping
//! with ETA calculation and rate display.

mod reporter;

pub use reporter::*;
