//! HTTP client for the analysis service

use crate::api::{decode, AnalysisBackend};
use crate::config::ServiceConfig;
use crate::error::{IlanaError, IlanaResult};
use crate::types::{AnalysisResult, ContextHints, FeedbackRecord, Finding, IntelligenceStatus};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::instrument;

/// Production [`AnalysisBackend`] over reqwest.
///
/// One shared connection pool; per-request timeout from the config. No
/// retries anywhere: a failed request surfaces immediately and re-trigger
/// is left to explicit user action.
pub struct HttpAnalysisClient {
    config: ServiceConfig,
    http_client: Client,
}

impl HttpAnalysisClient {
    /// Create a client from the given config
    pub fn new(config: ServiceConfig) -> IlanaResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| IlanaError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Truncate request text to the configured character budget, on a char
    /// boundary.
    fn capped<'a>(&self, text: &'a str) -> &'a str {
        match text
            .char_indices()
            .nth(self.config.analysis_char_budget)
        {
            Some((byte_idx, _)) => &text[..byte_idx],
            None => text,
        }
    }

    async fn post_json(&self, path: &str, body: &Value) -> IlanaResult<Value> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "analysis service request");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| IlanaError::connectivity(format!("request to {path} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(IlanaError::connectivity(format!(
                "{path} returned status {status}: {error_text}"
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| IlanaError::decode(format!("{path} body is not valid JSON: {e}")))?;
        tracing::debug!(%url, "analysis service response received");
        Ok(value)
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    #[instrument(skip(self, text), level = "debug")]
    async fn analyze(&self, text: &str) -> IlanaResult<AnalysisResult> {
        let body = json!({ "text": self.capped(text) });
        let response = self.post_json("/api/analyze-protocol", &body).await?;
        decode::decode_analysis(&response)
    }

    #[instrument(skip(self, text, hints), level = "debug")]
    async fn authoring_guidance(
        &self,
        text: &str,
        hints: &ContextHints,
    ) -> IlanaResult<Vec<Finding>> {
        let mut body = json!({
            "text": self.capped(text),
            "context": hints.section.as_deref().unwrap_or("general"),
        });
        if let Some(area) = &hints.therapeutic_area {
            body["therapeutic_area"] = json!(area);
        }
        if let Some(phase) = &hints.phase {
            body["phase"] = json!(phase);
        }

        let response = self.post_json("/api/sophisticated-authoring", &body).await?;
        decode::decode_guidance(&response)
    }

    #[instrument(skip(self), level = "debug")]
    async fn intelligence_status(&self) -> IlanaResult<IntelligenceStatus> {
        let url = self.config.endpoint("/api/intelligence-status");
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| IlanaError::connectivity(format!("status request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(IlanaError::connectivity(format!(
                "intelligence-status returned status {}",
                response.status()
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| IlanaError::decode(format!("status body is not valid JSON: {e}")))?;
        decode::decode_status(&value)
    }

    #[instrument(skip(self, record), fields(finding_id = %record.finding_id), level = "debug")]
    async fn submit_feedback(&self, record: &FeedbackRecord) -> IlanaResult<()> {
        let body = json!({
            "finding_id": record.finding_id,
            "action": record.action.as_str(),
            "user_feedback": record.user_feedback,
            "protocol_text": record.protocol_text,
        });
        self.post_json("/api/feedback", &body).await?;
        Ok(())
    }
}
