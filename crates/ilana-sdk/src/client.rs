//! SDK client implementation

use ilana_core::{
    AnalysisBackend, ContextHints, DocumentHost, FindingListView, HttpAnalysisClient, IlanaResult,
    ScanOutcome, ScanScope, ServiceConfig, SuggestionWorkflow,
};
use std::sync::Arc;

/// High-level entry point for embedding the protocol-intelligence workflow
/// in a task-pane shim or any other host.
///
/// Wraps a [`SuggestionWorkflow`] with the common construction paths; the
/// full controller stays reachable through [`ProtocolIntelligence::workflow`].
pub struct ProtocolIntelligence {
    workflow: Arc<SuggestionWorkflow>,
}

impl ProtocolIntelligence {
    /// Create an instance talking to the default deployed service
    pub fn new(host: Arc<dyn DocumentHost>) -> IlanaResult<Self> {
        Self::with_config(host, ServiceConfig::default())
    }

    /// Create an instance from environment-derived configuration
    /// (`ILANA_API_BASE_URL` and friends)
    pub fn from_env(host: Arc<dyn DocumentHost>) -> IlanaResult<Self> {
        Self::with_config(host, ServiceConfig::from_env()?)
    }

    /// Create an instance with custom configuration
    pub fn with_config(host: Arc<dyn DocumentHost>, config: ServiceConfig) -> IlanaResult<Self> {
        let backend = Arc::new(HttpAnalysisClient::new(config.clone())?);
        Ok(Self::with_backend(host, backend, config))
    }

    /// Create an instance over an explicit backend (test doubles, proxies)
    pub fn with_backend(
        host: Arc<dyn DocumentHost>,
        backend: Arc<dyn AnalysisBackend>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            workflow: SuggestionWorkflow::new(host, backend, config),
        }
    }

    /// Pin context hints forwarded to the authoring endpoint
    pub fn with_hints(self, hints: ContextHints) -> Self {
        self.workflow.set_hints(hints);
        self
    }

    /// Probe the service and return the guidance-tier status label.
    /// Degrades to an offline label when the service is unreachable.
    pub async fn connect(&self) -> String {
        self.workflow.refresh_status().await
    }

    /// Analyze the full document body
    pub async fn scan_document(&self) -> IlanaResult<ScanOutcome> {
        self.workflow.scan(ScanScope::Document).await
    }

    /// Analyze the current selection
    pub async fn scan_selection(&self) -> IlanaResult<ScanOutcome> {
        self.workflow.scan(ScanScope::Selection).await
    }

    /// Current rendered view of the finding list
    pub fn view(&self) -> FindingListView {
        self.workflow.view()
    }

    /// Full controller for accept/ignore/filter/real-time control
    pub fn workflow(&self) -> Arc<SuggestionWorkflow> {
        Arc::clone(&self.workflow)
    }
}
