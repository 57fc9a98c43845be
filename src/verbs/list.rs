//! Verb lists
//!
//! The scraper input is a dictionary export where the first column holds
//! the headword. Only distinct headwords are kept, in the order they appear.

use crate::error::{CsvResultExt, IoResultExt, ParlaMintError, Result};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Read the verbs from the specified file and remove duplicates
pub fn load_verbs(path: &Path, delimiter: u8) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(ParlaMintError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).with_path(path)?;
    read_verbs(file, delimiter, path)
}

/// Read distinct first-column values from a delimited source with a header row
pub fn read_verbs<R: Read>(reader: R, delimiter: u8, origin: &Path) -> Result<Vec<String>> {
    let mut csv = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut verbs = Vec::new();
    for record in csv.records() {
        let record = record.with_path(origin)?;
        let Some(verb) = record.get(0).map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        if seen.insert(verb.to_string()) {
            verbs.push(verb.to_string());
        }
    }
    Ok(verbs)
}
