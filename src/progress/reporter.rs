//! Progress reporter implementation
//!
//! Uses indicatif for progress bars with:
//! - Item count progress (corpus files, verbs)
//! - Rate and ETA display
//! - A status line above the bar

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Longest item name shown in the status line
const MAX_ITEM_WIDTH: usize = 60;

/// Progress reporter for long-running jobs
pub struct ProgressReporter {
    /// Multi-progress container
    multi: MultiProgress,
    /// Item progress bar
    items_bar: ProgressBar,
    /// Current status message
    status: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter; `unit` names what is counted
    pub fn new(unit: &str) -> Self {
        let multi = MultiProgress::new();

        let status = multi.add(ProgressBar::new_spinner());
        status.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let items_bar = multi.add(ProgressBar::new(0));
        let template = format!(
            "{{prefix:.bold.dim}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{per_sec}}, ETA {{eta}})",
            unit
        );
        items_bar.set_style(
            ProgressStyle::default_bar()
                .template(&template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        items_bar.set_prefix("Progress");

        Self {
            multi,
            items_bar,
            status,
        }
    }

    /// Create a disabled progress reporter (for quiet mode)
    pub fn disabled() -> Self {
        let reporter = Self::new("items");
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    /// Set total items to process
    pub fn set_total(&self, total: u64) {
        self.items_bar.set_length(total);
    }

    /// Increment items processed
    pub fn increment(&self, count: u64) {
        self.items_bar.inc(count);
    }

    /// Set current status message
    pub fn set_status(&self, msg: &str) {
        self.status.set_message(msg.to_string());
    }

    /// Show the item being worked on
    pub fn set_current(&self, item: &str) {
        let display = if item.chars().count() > MAX_ITEM_WIDTH {
            let tail: String = item
                .chars()
                .rev()
                .take(MAX_ITEM_WIDTH - 3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{}", tail)
        } else {
            item.to_string()
        };
        self.status.set_message(display);
    }

    /// Finish progress with success message
    pub fn finish_success(&self, message: &str) {
        self.status.finish_with_message(format!("✓ {}", message));
        self.items_bar.finish();
    }

    /// Finish progress with error message
    pub fn finish_error(&self, message: &str) {
        self.status.finish_with_message(format!("✗ {}", message));
        self.items_bar.abandon();
    }
}
