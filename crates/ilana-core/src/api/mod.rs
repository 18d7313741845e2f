//! Remote analysis service integration
//!
//! [`AnalysisBackend`] is the seam between the workflow and the service;
//! [`HttpAnalysisClient`] is the production implementation over reqwest, and
//! tests substitute stub backends.

pub mod client;
pub mod decode;

pub use client::HttpAnalysisClient;

use crate::error::IlanaResult;
use crate::types::{AnalysisResult, ContextHints, FeedbackRecord, Finding, IntelligenceStatus};
use async_trait::async_trait;

/// Unified interface over the four analysis-service endpoints.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// `POST /api/analyze-protocol` — primary compliance analysis
    async fn analyze(&self, text: &str) -> IlanaResult<AnalysisResult>;

    /// `POST /api/sophisticated-authoring` — secondary writing guidance,
    /// already converted to canonical findings
    async fn authoring_guidance(
        &self,
        text: &str,
        hints: &ContextHints,
    ) -> IlanaResult<Vec<Finding>>;

    /// `GET /api/intelligence-status` — which guidance tier is active
    async fn intelligence_status(&self) -> IlanaResult<IntelligenceStatus>;

    /// `POST /api/feedback` — report an accept/ignore decision
    async fn submit_feedback(&self, record: &FeedbackRecord) -> IlanaResult<()>;
}
