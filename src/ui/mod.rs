//! Terminal front end.
//!
//! - [`display`]: banner, tables, run results and the audit log
//! - [`progress`]: progress bar fed from orchestrator state
//! - [`prompt`]: interactive wizard dialogs

pub mod display;
pub mod progress;
pub mod prompt;
