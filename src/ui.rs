//! Progress reporting for the snapshot tools
//!
//! The CLI reports to the console; tests and library callers that want no
//! output use [`SilentUi`].

/// Phases of a snapshot run
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Exporting,
    Verifying,
    Importing,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Exporting => write!(f, "Exporting tables to CSV"),
            Phase::Verifying => write!(f, "Verifying snapshot files"),
            Phase::Importing => write!(f, "Importing CSV into database"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for progress sinks - allows both console and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn log(&mut self, message: impl Into<String>);
}

/// Console implementation used by the CLI
#[derive(Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        println!("\n{}...", phase);
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        log::debug!("{} [{}/{}]", label.into(), current, total);
    }

    fn log(&mut self, message: impl Into<String>) {
        println!("  {}", message.into());
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn log(&mut self, _message: impl Into<String>) {}
}
