//! medqueue Library
//!
//! Patient intake and hospital queue terminal UI, with a headless NDJSON mode
//! for scripted runs.

pub mod headless;

// Re-export main entry points
pub use headless::runner::run_headless;
pub use medqueue_tui::run;
