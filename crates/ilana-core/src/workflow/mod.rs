//! Suggestion workflow
//!
//! One controller orchestrates the whole request/response cycle: change
//! detection and debouncing, the analysis calls, atomic installation of
//! results, and the accept/ignore/learn-more actions on individual
//! findings.

pub mod controller;
pub mod debounce;
pub mod session;
pub mod triage;

pub use controller::{ScanOutcome, SuggestionWorkflow};
pub use debounce::DebouncedTrigger;
pub use session::SessionState;
pub use triage::{SkipReason, TriageOutcome};

/// What text a scan analyzes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanScope {
    /// The full document body
    Document,
    /// The current selection
    Selection,
}
