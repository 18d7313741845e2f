//! Fire-and-forget feedback submission
//!
//! Accept/ignore decisions are reported for offline model improvement.
//! Submission never blocks or reverts the UI change that triggered it;
//! failures are logged and published on the event bus so they stay
//! observable.

use crate::api::AnalysisBackend;
use crate::events::{EventBus, WorkflowEvent};
use crate::types::{FeedbackAction, FeedbackRecord, Finding};
use chrono::Utc;
use std::sync::Arc;

/// Builds feedback records and submits them in the background.
pub struct FeedbackEmitter {
    backend: Arc<dyn AnalysisBackend>,
    events: EventBus,
    snippet_len: usize,
}

impl FeedbackEmitter {
    pub fn new(backend: Arc<dyn AnalysisBackend>, events: EventBus, snippet_len: usize) -> Self {
        Self {
            backend,
            events,
            snippet_len,
        }
    }

    /// Submit a decision without awaiting the result.
    ///
    /// `document_text` is reduced to a snippet around the finding's quoted
    /// text before it leaves the process.
    pub fn emit(
        &self,
        action: FeedbackAction,
        finding: &Finding,
        note: Option<String>,
        document_text: &str,
    ) {
        let record = FeedbackRecord {
            finding_id: finding.id.clone(),
            action,
            user_feedback: note.unwrap_or_default(),
            protocol_text: context_snippet(
                document_text,
                finding.quoted_text.as_deref(),
                self.snippet_len,
            ),
            submitted_at: Utc::now(),
        };

        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            if let Err(error) = backend.submit_feedback(&record).await {
                tracing::warn!(
                    finding_id = %record.finding_id,
                    action = record.action.as_str(),
                    %error,
                    "feedback submission failed"
                );
                events.publish(WorkflowEvent::FeedbackFailed {
                    finding_id: record.finding_id,
                    error: error.to_string(),
                });
            }
        });
    }
}

/// A window of up to `max_len` characters centered on the first occurrence
/// of `quote`, or the head of the document when the quote is absent.
pub fn context_snippet(text: &str, quote: Option<&str>, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }

    let center = quote
        .filter(|q| !q.is_empty())
        .and_then(|q| find_ascii_ci(&chars, q))
        .map(|start| start + q_len(quote))
        .unwrap_or(0);

    let half = max_len / 2;
    let start = center.saturating_sub(half).min(chars.len() - max_len);
    chars[start..start + max_len].iter().collect()
}

fn q_len(quote: Option<&str>) -> usize {
    quote.map(|q| q.chars().count() / 2).unwrap_or(0)
}

fn find_ascii_ci(haystack: &[char], needle: &str) -> Option<usize> {
    let pattern: Vec<char> = needle.chars().collect();
    if pattern.is_empty() || pattern.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - pattern.len()).find(|&i| {
        haystack[i..i + pattern.len()]
            .iter()
            .zip(pattern.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}
