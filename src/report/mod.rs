//! Rankings of forms and speakers
//!
//! Turns the statistics written by the analysis into top-N rankings,
//! resolving speaker ids to deputy names through the legislature lists.

mod chart;
mod legislature;
mod output;
mod ranking;

pub use chart::*;
pub use legislature::*;
pub use output::*;
pub use ranking::*;
