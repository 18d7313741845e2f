//! Session state owned by the controller
//!
//! One instance per task-pane session, created on activation and torn down
//! with the controller. Everything the renderer shows lives here, so a scan
//! completion can replace it atomically under a single lock.

use crate::render::FilterChoice;
use crate::types::{AmendmentRisk, CategoryScores, Finding};

/// Mutable session state behind the controller's lock.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Findings from the authoritative (most recent installed) scan
    pub findings: Vec<Finding>,
    /// Grades from the last installed analysis, if any
    pub scores: Option<CategoryScores>,
    pub amendment_risk: Option<AmendmentRisk>,
    /// Whether change notifications arm the debounce timer
    pub realtime_enabled: bool,
    /// Generation of the scan whose results are installed
    pub installed_generation: u64,
    /// Active category filter for the rendered list
    pub filter: FilterChoice,
    /// Markers applied by the current scan
    pub highlight_count: usize,
    /// Cached intelligence-status label
    pub status_label: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            findings: Vec::new(),
            scores: None,
            amendment_risk: None,
            realtime_enabled: false,
            installed_generation: 0,
            filter: FilterChoice::All,
            highlight_count: 0,
            status_label: None,
        }
    }

    /// Remove and return the finding with the given id
    pub fn take_finding(&mut self, finding_id: &str) -> Option<Finding> {
        let idx = self.findings.iter().position(|f| f.id == finding_id)?;
        Some(self.findings.remove(idx))
    }

    /// Install a scan's results, replacing the previous generation wholesale
    pub fn install_scan(
        &mut self,
        generation: u64,
        findings: Vec<Finding>,
        scores: CategoryScores,
        amendment_risk: AmendmentRisk,
        highlight_count: usize,
    ) {
        self.findings = findings;
        self.scores = Some(scores);
        self.amendment_risk = Some(amendment_risk);
        self.installed_generation = generation;
        self.highlight_count = highlight_count;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Finding;

    #[test]
    fn take_finding_removes_by_id() {
        let mut state = SessionState::new();
        state.findings = vec![
            Finding::connectivity_error("a"),
            Finding::connectivity_error("b"),
        ];
        let target = state.findings[1].id.clone();

        let taken = state.take_finding(&target).unwrap();
        assert_eq!(taken.id, target);
        assert_eq!(state.findings.len(), 1);
        assert!(state.take_finding("missing").is_none());
    }

    #[test]
    fn install_scan_replaces_everything() {
        let mut state = SessionState::new();
        state.findings = vec![Finding::connectivity_error("old")];
        state.highlight_count = 7;

        state.install_scan(
            3,
            Vec::new(),
            CategoryScores::default(),
            AmendmentRisk::Low,
            0,
        );
        assert!(state.findings.is_empty());
        assert_eq!(state.installed_generation, 3);
        assert_eq!(state.highlight_count, 0);
        assert_eq!(state.amendment_risk, Some(AmendmentRisk::Low));
    }
}
