//! Service configuration
//!
//! Defaults match the deployed backend; environment variables override the
//! values an embedder most commonly needs to change.

use crate::error::{IlanaError, IlanaResult};
use std::time::Duration;

/// Default origin of the deployed analysis service
pub const DEFAULT_BASE_URL: &str = "https://ilana-protocol-intelligence.onrender.com";

/// Configuration for the analysis client and the suggestion workflow.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Origin of the analysis service, without a trailing slash
    pub base_url: String,
    /// Per-request timeout for all endpoints
    pub request_timeout: Duration,
    /// Analysis request bodies are truncated to this many characters
    pub analysis_char_budget: usize,
    /// Quiet interval a change burst must hold before a real-time scan fires
    pub debounce_quiet: Duration,
    /// Text shorter than this is never submitted for analysis
    pub min_scan_len: usize,
    /// Maximum number of highlights applied per scan
    pub highlight_cap: usize,
    /// Length of the document snippet attached to feedback records
    pub snippet_len: usize,
    /// Boilerplate keyword density above which a scan is skipped
    pub boilerplate_density: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            analysis_char_budget: 10_000,
            debounce_quiet: Duration::from_millis(1_800),
            min_scan_len: 50,
            highlight_cap: 50,
            snippet_len: 500,
            boilerplate_density: 0.12,
        }
    }
}

impl ServiceConfig {
    /// Create a config pointing at a specific service origin
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Defaults overridden by `ILANA_*` environment variables.
    ///
    /// Recognized: `ILANA_API_BASE_URL`, `ILANA_REQUEST_TIMEOUT_SECS`,
    /// `ILANA_DEBOUNCE_MS`.
    pub fn from_env() -> IlanaResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("ILANA_API_BASE_URL") {
            if url.trim().is_empty() {
                return Err(IlanaError::config("ILANA_API_BASE_URL is empty"));
            }
            config = config.with_base_url(url);
        }
        if let Ok(secs) = std::env::var("ILANA_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                IlanaError::config(format!(
                    "ILANA_REQUEST_TIMEOUT_SECS is not a number: {secs}"
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Ok(ms) = std::env::var("ILANA_DEBOUNCE_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|_| IlanaError::config(format!("ILANA_DEBOUNCE_MS is not a number: {ms}")))?;
            config.debounce_quiet = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_debounce_quiet(mut self, quiet: Duration) -> Self {
        self.debounce_quiet = quiet;
        self
    }

    pub fn with_char_budget(mut self, budget: usize) -> Self {
        self.analysis_char_budget = budget;
        self
    }

    pub fn with_highlight_cap(mut self, cap: usize) -> Self {
        self.highlight_cap = cap;
        self
    }

    pub fn with_min_scan_len(mut self, len: usize) -> Self {
        self.min_scan_len = len;
        self
    }

    /// Endpoint URL builder
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = ServiceConfig::new("https://example.test/");
        assert_eq!(config.base_url, "https://example.test");
        assert_eq!(
            config.endpoint("/api/analyze-protocol"),
            "https://example.test/api/analyze-protocol"
        );
    }

    #[test]
    fn defaults_match_spec_recommendations() {
        let config = ServiceConfig::default();
        assert_eq!(config.min_scan_len, 50);
        assert_eq!(config.highlight_cap, 50);
        assert_eq!(config.debounce_quiet, Duration::from_millis(1_800));
    }
}
