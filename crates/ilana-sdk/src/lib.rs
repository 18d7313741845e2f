//! Ilana Protocol Intelligence SDK
//!
//! High-level facade for embedding the suggestion workflow. A host shim
//! implements [`DocumentHost`] over its document API, constructs a
//! [`ProtocolIntelligence`] instance, and drives it from its UI events:
//!
//! ```no_run
//! use ilana_sdk::{MemoryDocument, ProtocolIntelligence};
//! use std::sync::Arc;
//!
//! # async fn run() -> ilana_sdk::IlanaResult<()> {
//! let host = Arc::new(MemoryDocument::new("protocol text..."));
//! let sdk = ProtocolIntelligence::new(host)?;
//!
//! let status = sdk.connect().await;
//! let outcome = sdk.scan_document().await?;
//! println!("{status}: {} findings", outcome.finding_count);
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::ProtocolIntelligence;

// Re-export commonly used types from core
pub use ilana_core::{
    AnalysisBackend, ContextHints, DocumentHost, FilterChoice, Finding, FindingCategory,
    FindingListView, IlanaError, IlanaResult, MemoryDocument, ScanOutcome, ScanScope,
    ServiceConfig, Severity, SuggestionWorkflow, WorkflowEvent,
};
