//! ParlaMint corpus access
//!
//! Locating session files next to the corpus root and reading the
//! session date and speeches out of each TEI document.

mod scanner;
mod tei;

pub use scanner::*;
pub use tei::*;
