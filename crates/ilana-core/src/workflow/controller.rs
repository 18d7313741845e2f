//! The suggestion workflow controller

use crate::api::AnalysisBackend;
use crate::config::ServiceConfig;
use crate::document::{DocumentHost, Highlighter};
use crate::error::{IlanaError, IlanaResult};
use crate::events::{EventBus, WorkflowEvent};
use crate::feedback::FeedbackEmitter;
use crate::render::{self, FilterChoice, FindingListView};
use crate::types::{
    AmendmentRisk, AnalysisResult, CategoryScores, ContextHints, FeedbackAction, Finding,
};
use crate::workflow::debounce::DebouncedTrigger;
use crate::workflow::session::SessionState;
use crate::workflow::triage::{self, SkipReason, TriageOutcome};
use crate::workflow::ScanScope;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Summary of one scan attempt.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub generation: u64,
    /// Set when triage decided not to analyze at all
    pub skipped: Option<SkipReason>,
    /// True when a newer scan superseded this one before it completed
    pub discarded: bool,
    /// Findings installed by this scan (0 when skipped or discarded)
    pub finding_count: usize,
    pub scores: Option<CategoryScores>,
    pub amendment_risk: Option<AmendmentRisk>,
}

impl ScanOutcome {
    fn skipped(generation: u64, reason: SkipReason) -> Self {
        Self {
            generation,
            skipped: Some(reason),
            discarded: false,
            finding_count: 0,
            scores: None,
            amendment_risk: None,
        }
    }

    fn discarded(generation: u64) -> Self {
        Self {
            generation,
            skipped: None,
            discarded: true,
            finding_count: 0,
            scores: None,
            amendment_risk: None,
        }
    }

    /// True when this scan's results became the current session state
    pub fn installed(&self) -> bool {
        self.skipped.is_none() && !self.discarded
    }
}

/// Controller owning the whole suggestion workflow for one task-pane
/// session.
///
/// All methods take `&self`; session state lives behind an internal lock
/// and scan completions replace it in one critical section, so the
/// rendered list never mixes two generations.
pub struct SuggestionWorkflow {
    host: Arc<dyn DocumentHost>,
    backend: Arc<dyn AnalysisBackend>,
    config: ServiceConfig,
    events: EventBus,
    state: Mutex<SessionState>,
    /// Generation of the most recently started scan
    scan_seq: AtomicU64,
    debounce: DebouncedTrigger,
    highlighter: Highlighter,
    feedback: FeedbackEmitter,
    /// Embedder-pinned context hints; triage fills the gaps
    hints: Mutex<ContextHints>,
    /// Serializes the stale-check, highlight application, and state install
    /// of overlapping scan completions; the generation check is only valid
    /// while this is held
    install_gate: tokio::sync::Mutex<()>,
    /// Handle to ourselves for the debounce task
    self_ref: Weak<SuggestionWorkflow>,
}

impl SuggestionWorkflow {
    pub fn new(
        host: Arc<dyn DocumentHost>,
        backend: Arc<dyn AnalysisBackend>,
        config: ServiceConfig,
    ) -> Arc<Self> {
        let events = EventBus::default();
        let feedback = FeedbackEmitter::new(Arc::clone(&backend), events.clone(), config.snippet_len);
        Arc::new_cyclic(|self_ref| Self {
            host,
            backend,
            events: events.clone(),
            state: Mutex::new(SessionState::new()),
            scan_seq: AtomicU64::new(0),
            debounce: DebouncedTrigger::new(config.debounce_quiet),
            highlighter: Highlighter::new(config.highlight_cap),
            feedback,
            hints: Mutex::new(ContextHints::default()),
            install_gate: tokio::sync::Mutex::new(()),
            config,
            self_ref: self_ref.clone(),
        })
    }

    /// Event bus handle for UI shims and tests
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Pin context hints; unset fields keep being auto-detected
    pub fn set_hints(&self, hints: ContextHints) {
        *self.hints.lock() = hints;
    }

    /// Snapshot of the active finding list, for embedders and tests
    pub fn findings(&self) -> Vec<Finding> {
        self.state.lock().findings.clone()
    }

    pub fn realtime_enabled(&self) -> bool {
        self.state.lock().realtime_enabled
    }

    /// Enable or disable real-time analysis. Disabling clears any pending
    /// debounce timer; an already-dispatched request runs to completion and
    /// is dropped by the generation check if superseded.
    pub fn set_realtime(&self, enabled: bool) {
        self.state.lock().realtime_enabled = enabled;
        if !enabled {
            self.debounce.cancel();
        }
        self.events
            .publish(WorkflowEvent::RealtimeToggled { enabled });
    }

    /// Change the active category filter; operates on the last-received
    /// findings, never re-fetches.
    pub fn set_filter(&self, filter: FilterChoice) {
        self.state.lock().filter = filter;
    }

    /// Project the current session state for rendering
    pub fn view(&self) -> FindingListView {
        render::build_view(&self.state.lock())
    }

    /// Document-change notification from the host. Arms (or re-arms) the
    /// debounce timer; at most one timer is outstanding.
    pub fn notify_change(&self) {
        if !self.realtime_enabled() {
            return;
        }
        let Some(workflow) = self.self_ref.upgrade() else {
            return;
        };
        self.debounce.notify(move || async move {
            // re-check: real-time may have been disabled while armed
            if !workflow.realtime_enabled() {
                return;
            }
            if let Err(error) = workflow.scan(ScanScope::Document).await {
                tracing::warn!(%error, "real-time scan failed");
            }
        });
    }

    /// Run one analysis cycle and, unless superseded, install its results.
    ///
    /// Request failures never propagate: a failed primary analysis becomes
    /// a single synthetic connectivity finding, and a failed secondary
    /// enrichment degrades to primary-only results. `Err` is reserved for
    /// host I/O failures.
    pub async fn scan(&self, scope: ScanScope) -> IlanaResult<ScanOutcome> {
        let generation = self.scan_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.events
            .publish(WorkflowEvent::ScanStarted { generation, scope });
        tracing::debug!(generation, ?scope, "scan started");

        let text = match scope {
            ScanScope::Document => self.host.full_text().await?,
            ScanScope::Selection => self.host.selection_text().await?,
        };

        let detected = match triage::triage(&text, &self.config) {
            TriageOutcome::Proceed(hints) => hints,
            TriageOutcome::Skip(reason) => {
                tracing::debug!(generation, %reason, "scan skipped");
                self.events
                    .publish(WorkflowEvent::ScanSkipped { generation, reason });
                return Ok(ScanOutcome::skipped(generation, reason));
            }
        };
        let hints = self.hints.lock().merged_with(&detected);

        let (mut result, primary_failed) = match self.backend.analyze(&text).await {
            Ok(result) => (result, false),
            Err(error) => {
                tracing::warn!(generation, %error, "primary analysis failed");
                (AnalysisResult::unavailable(error.to_string()), true)
            }
        };

        // secondary enrichment only makes sense on top of a real analysis
        if !primary_failed {
            match self.backend.authoring_guidance(&text, &hints).await {
                Ok(guidance) => result.findings.extend(guidance),
                Err(error) => {
                    tracing::warn!(generation, %error, "authoring enrichment failed, degrading to primary-only results");
                }
            }
        }

        // installs are serialized; a completion may not touch highlights or
        // session state after a newer scan's install has begun
        let _install = self.install_gate.lock().await;

        // a newer scan has started: this response is stale
        if self.scan_seq.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "scan superseded, discarding results");
            self.events
                .publish(WorkflowEvent::ScanDiscarded { generation });
            return Ok(ScanOutcome::discarded(generation));
        }

        let applied = self.highlighter.apply(self.host.as_ref(), &result.findings).await?;
        self.events
            .publish(WorkflowEvent::HighlightsApplied { count: applied });

        let finding_count = result.findings.len();
        let outcome = ScanOutcome {
            generation,
            skipped: None,
            discarded: false,
            finding_count,
            scores: Some(result.scores),
            amendment_risk: Some(result.amendment_risk),
        };

        self.state.lock().install_scan(
            generation,
            result.findings,
            result.scores,
            result.amendment_risk,
            applied,
        );
        self.events.publish(WorkflowEvent::ScanCompleted {
            generation,
            finding_count,
        });
        tracing::debug!(generation, finding_count, "scan completed");
        Ok(outcome)
    }

    /// Accept a finding: apply its first suggestion to the document, remove
    /// it from the active list, and report the decision.
    ///
    /// The finding is removed even when the document mutation or the
    /// feedback submission fails; UI consistency is mandatory, mutation is
    /// best-effort.
    pub async fn accept(&self, finding_id: &str, note: Option<String>) -> IlanaResult<()> {
        let finding = self
            .state
            .lock()
            .take_finding(finding_id)
            .ok_or_else(|| IlanaError::invalid_input(format!("unknown finding id: {finding_id}")))?;

        if let Some(suggestion) = finding.primary_suggestion() {
            match crate::document::locator::locate(self.host.as_ref(), &finding).await {
                Ok(Some(range)) => {
                    if let Err(error) = self.host.replace_range(&range, suggestion).await {
                        tracing::warn!(finding_id, %error, "suggestion could not be applied");
                    }
                }
                Ok(None) => {
                    tracing::warn!(finding_id, "finding not found in document, nothing replaced");
                }
                Err(error) => {
                    tracing::warn!(finding_id, %error, "locate failed, nothing replaced");
                }
            }
        } else {
            tracing::debug!(finding_id, "finding has no suggestions, removal only");
        }

        self.refresh_highlights().await;
        self.emit_feedback(FeedbackAction::Accept, &finding, note).await;
        self.events.publish(WorkflowEvent::FindingAccepted {
            finding_id: finding.id.clone(),
        });
        Ok(())
    }

    /// Ignore a finding: remove it from the active list and report the
    /// decision. No document mutation.
    pub async fn ignore(&self, finding_id: &str, note: Option<String>) -> IlanaResult<()> {
        let finding = self
            .state
            .lock()
            .take_finding(finding_id)
            .ok_or_else(|| IlanaError::invalid_input(format!("unknown finding id: {finding_id}")))?;

        self.refresh_highlights().await;
        self.emit_feedback(FeedbackAction::Ignore, &finding, note).await;
        self.events.publish(WorkflowEvent::FindingIgnored {
            finding_id: finding.id.clone(),
        });
        Ok(())
    }

    /// Navigate the document view to a finding and flash it.
    pub async fn learn_more(&self, finding_id: &str) -> IlanaResult<()> {
        let finding = self
            .state
            .lock()
            .findings
            .iter()
            .find(|f| f.id == finding_id)
            .cloned()
            .ok_or_else(|| IlanaError::invalid_input(format!("unknown finding id: {finding_id}")))?;

        self.highlighter.flash(self.host.as_ref(), &finding).await?;
        Ok(())
    }

    /// Refresh the intelligence-status label. Failure degrades to an
    /// offline label, never an error.
    pub async fn refresh_status(&self) -> String {
        let label = match self.backend.intelligence_status().await {
            Ok(status) => status.label(),
            Err(error) => {
                tracing::warn!(%error, "intelligence status unavailable");
                "Intelligence service offline".to_string()
            }
        };
        self.state.lock().status_label = Some(label.clone());
        self.events.publish(WorkflowEvent::StatusUpdated {
            label: label.clone(),
        });
        label
    }

    /// Re-apply markers for the findings that remain after an accept or
    /// ignore; a mutation may have shifted every offset.
    async fn refresh_highlights(&self) {
        let _install = self.install_gate.lock().await;
        let findings = self.findings();
        match self.highlighter.apply(self.host.as_ref(), &findings).await {
            Ok(applied) => {
                self.state.lock().highlight_count = applied;
                self.events
                    .publish(WorkflowEvent::HighlightsApplied { count: applied });
            }
            Err(error) => {
                tracing::warn!(%error, "highlight refresh failed");
            }
        }
    }

    async fn emit_feedback(&self, action: FeedbackAction, finding: &Finding, note: Option<String>) {
        let document_text = match self.host.full_text().await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "could not read document for feedback snippet");
                String::new()
            }
        };
        self.feedback.emit(action, finding, note, &document_text);
    }
}
