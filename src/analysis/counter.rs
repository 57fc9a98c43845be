//! Verb form counting
//!
//! Counts are plain substring counts over the utterance text, so a form
//! such as `va fi` is also counted inside `va fi fost`.

use crate::corpus::Session;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of non-overlapping occurrences of `form` in `text`
pub fn count_occurrences(text: &str, form: &str) -> u64 {
    if form.is_empty() {
        return 0;
    }
    text.matches(form).count() as u64
}

/// Key of a per-form count
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FormKey {
    /// Speaker id
    pub speaker: String,
    /// Session date
    pub date: NaiveDate,
    /// Verb form
    pub form: String,
}

/// Per-form counts of one session
pub type FormCounts = BTreeMap<FormKey, u64>;

/// Count every form for every speaker of a session, dropping zero counts
pub fn session_form_counts(forms: &[String], session: &Session) -> FormCounts {
    let mut counts = FormCounts::new();
    for utterance in &session.utterances {
        for form in forms {
            let n = count_occurrences(&utterance.text, form);
            if n == 0 {
                continue;
            }
            let key = FormKey {
                speaker: utterance.speaker_id().to_string(),
                date: session.date,
                form: form.clone(),
            };
            *counts.entry(key).or_insert(0) += n;
        }
    }
    counts
}

/// Total future form usage per speaker in one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUsage {
    /// Session date
    pub date: NaiveDate,
    /// Speaker id to usage count; speakers who used no form map to zero
    pub counts: BTreeMap<String, u64>,
}

/// Sum the usage of all forms per speaker of a session
pub fn session_usage(forms: &[String], session: &Session) -> SessionUsage {
    let mut counts = BTreeMap::new();
    for utterance in &session.utterances {
        let used: u64 = forms
            .iter()
            .map(|form| count_occurrences(&utterance.text, form))
            .sum();
        *counts.entry(utterance.speaker_id().to_string()).or_insert(0) += used;
    }
    SessionUsage {
        date: session.date,
        counts,
    }
}
