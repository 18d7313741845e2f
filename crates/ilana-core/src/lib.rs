//! Ilana Protocol Intelligence Core Library
//!
//! Core of the protocol-intelligence suggestion workflow: a controller
//! that debounces document changes, sends protocol text to the remote
//! analysis service, normalizes the heterogeneous endpoint responses into
//! canonical findings, and applies accepted suggestions back to the host
//! document.
//!
//! The host document sits behind the [`document::DocumentHost`] trait and
//! the analysis service behind [`api::AnalysisBackend`], so the workflow
//! runs unchanged against a live task-pane shim or test doubles.

pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod feedback;
pub mod render;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use api::{AnalysisBackend, HttpAnalysisClient};
pub use config::ServiceConfig;
pub use document::{DocumentHost, HighlightStyle, MemoryDocument, RangeHandle};
pub use error::{IlanaError, IlanaResult};
pub use events::{EventBus, WorkflowEvent};
pub use render::{FilterChoice, FindingListView};
pub use types::{
    AmendmentRisk, AnalysisResult, CategoryScores, ContextHints, FeedbackAction, Finding,
    FindingCategory, IntelligenceStatus, Severity, TextLocation,
};
pub use workflow::{ScanOutcome, ScanScope, SkipReason, SuggestionWorkflow};
