//! Renderer view-model
//!
//! Pure projection of session state into what the task pane shows. No host
//! or network dependency; filtering operates on the last-received findings
//! and never re-fetches.

use crate::types::{AmendmentRisk, CategoryScores, Finding, FindingCategory, Severity};
use crate::workflow::session::SessionState;
use serde::{Deserialize, Serialize};

/// Category filter for the rendered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterChoice {
    All,
    Category(FindingCategory),
}

impl FilterChoice {
    pub fn matches(&self, category: FindingCategory) -> bool {
        match self {
            Self::All => true,
            Self::Category(wanted) => *wanted == category,
        }
    }
}

/// One actionable row in the findings list
#[derive(Debug, Clone, Serialize)]
pub struct FindingItem {
    pub id: String,
    pub category: FindingCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub citation: Option<String>,
    pub quoted_text: Option<String>,
    /// Accept is only offered when a replacement candidate exists
    pub can_accept: bool,
}

impl FindingItem {
    fn from_finding(finding: &Finding) -> Self {
        Self {
            id: finding.id.clone(),
            category: finding.category,
            severity: finding.severity,
            title: finding.title.clone(),
            description: finding.description.clone(),
            citation: finding.citation.clone(),
            quoted_text: finding.quoted_text.clone(),
            can_accept: !finding.suggestions.is_empty(),
        }
    }
}

/// Everything the task pane needs to render one frame
#[derive(Debug, Clone, Serialize)]
pub struct FindingListView {
    pub items: Vec<FindingItem>,
    /// Count of the filtered list, shown next to the filter tabs
    pub issue_count: usize,
    /// Present exactly when the filtered list is empty
    pub empty_state: Option<String>,
    pub scores: Option<CategoryScores>,
    pub amendment_risk: Option<AmendmentRisk>,
    pub status_label: Option<String>,
    pub realtime_enabled: bool,
}

/// Message shown when a scan produced no visible findings
pub const EMPTY_STATE_MESSAGE: &str = "No issues found in the current scan.";

/// Filter a finding sequence by category, preserving relative order.
pub fn filter_findings<'a>(findings: &'a [Finding], choice: FilterChoice) -> Vec<&'a Finding> {
    findings
        .iter()
        .filter(|f| choice.matches(f.category))
        .collect()
}

/// Project session state into the rendered list.
///
/// Items are sorted severity-high-first; the sort is stable so document
/// order is preserved within a severity band.
pub fn build_view(state: &SessionState) -> FindingListView {
    let filtered = filter_findings(&state.findings, state.filter);

    let mut items: Vec<FindingItem> = filtered
        .iter()
        .map(|f| FindingItem::from_finding(f))
        .collect();
    items.sort_by(|a, b| b.severity.cmp(&a.severity));

    let issue_count = items.len();
    FindingListView {
        items,
        issue_count,
        empty_state: (issue_count == 0).then(|| EMPTY_STATE_MESSAGE.to_string()),
        scores: state.scores,
        amendment_risk: state.amendment_risk,
        status_label: state.status_label.clone(),
        realtime_enabled: state.realtime_enabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(id: &str, category: FindingCategory, severity: Severity) -> Finding {
        Finding {
            id: id.into(),
            category,
            severity,
            title: id.into(),
            description: String::new(),
            quoted_text: None,
            location: None,
            citation: None,
            evidence: None,
            suggestions: Vec::new(),
            confidence: None,
        }
    }

    fn sample() -> Vec<Finding> {
        vec![
            finding("c1", FindingCategory::Compliance, Severity::Low),
            finding("f1", FindingCategory::Feasibility, Severity::High),
            finding("c2", FindingCategory::Compliance, Severity::Medium),
            finding("k1", FindingCategory::Clarity, Severity::Low),
            finding("c3", FindingCategory::Compliance, Severity::High),
        ]
    }

    #[test]
    fn category_filter_is_exact_and_order_preserving() {
        let findings = sample();
        let compliance = filter_findings(&findings, FilterChoice::Category(FindingCategory::Compliance));
        let ids: Vec<&str> = compliance.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["c1", "c2", "c3"]);
        assert!(compliance
            .iter()
            .all(|f| f.category == FindingCategory::Compliance));
    }

    #[test]
    fn all_filter_is_identity() {
        let findings = sample();
        let all = filter_findings(&findings, FilterChoice::All);
        let ids: Vec<&str> = all.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["c1", "f1", "c2", "k1", "c3"]);
    }

    #[test]
    fn view_sorts_high_severity_first_stably() {
        let mut state = SessionState::new();
        state.findings = sample();
        let view = build_view(&state);
        let ids: Vec<&str> = view.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["f1", "c3", "c2", "c1", "k1"]);
        assert_eq!(view.issue_count, 5);
        assert!(view.empty_state.is_none());
    }

    #[test]
    fn empty_filtered_list_shows_empty_state_and_zero_count() {
        let mut state = SessionState::new();
        let view = build_view(&state);
        assert_eq!(view.issue_count, 0);
        assert_eq!(view.empty_state.as_deref(), Some(EMPTY_STATE_MESSAGE));

        state.findings = vec![finding("k1", FindingCategory::Clarity, Severity::Low)];
        state.filter = FilterChoice::Category(FindingCategory::Feasibility);
        let view = build_view(&state);
        assert_eq!(view.issue_count, 0);
        assert!(view.empty_state.is_some());
    }

    #[test]
    fn accept_is_offered_only_with_suggestions() {
        let mut state = SessionState::new();
        let mut with_suggestion = finding("s1", FindingCategory::Clarity, Severity::Low);
        with_suggestion.suggestions = vec!["rewrite".into()];
        state.findings = vec![
            with_suggestion,
            finding("s2", FindingCategory::Clarity, Severity::Low),
        ];
        let view = build_view(&state);
        assert!(view.items.iter().find(|i| i.id == "s1").unwrap().can_accept);
        assert!(!view.items.iter().find(|i| i.id == "s2").unwrap().can_accept);
    }
}
