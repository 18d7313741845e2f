//! Canonical types shared across the Ilana workflow
//!
//! Every endpoint decoder converts its wire shape into the types defined
//! here before anything reaches the renderer or the document mutator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Closed category set for findings.
///
/// The analysis endpoint emits these directly (plus `regulatory`, folded
/// into `Compliance`). The authoring endpoint uses its own compound
/// `suggestion_type` vocabulary, mapped onto this set by the guidance
/// decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingCategory {
    Compliance,
    Feasibility,
    Clarity,
}

impl FindingCategory {
    /// Lenient parse covering the aliases the backend is known to emit.
    /// Returns `None` for genuinely unknown categories so callers can
    /// reject the record explicitly.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compliance" | "regulatory" => Some(Self::Compliance),
            "feasibility" => Some(Self::Feasibility),
            "clarity" | "style" => Some(Self::Clarity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliance => "compliance",
            Self::Feasibility => "feasibility",
            Self::Clarity => "clarity",
        }
    }

    /// All category values in display order
    pub fn all() -> [Self; 3] {
        [Self::Compliance, Self::Feasibility, Self::Clarity]
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finding severity, ordered low to high so lists can sort high-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Lenient parse; the authoring endpoint emits `critical` above `high`.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" | "high" => Some(Self::High),
            "medium" | "moderate" => Some(Self::Medium),
            "low" | "minor" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory character window into the analyzed text.
///
/// Used only as a fallback when the quoted text cannot be found in the
/// live document; offsets may be stale by the time a finding is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TextLocation {
    pub start: usize,
    pub length: usize,
}

impl TextLocation {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Clamp the window to a document of `doc_len` characters.
    /// Returns `None` when nothing of the window survives.
    pub fn clamp_to(&self, doc_len: usize) -> Option<Self> {
        if self.start >= doc_len || self.length == 0 {
            return None;
        }
        let length = self.length.min(doc_len - self.start);
        Some(Self {
            start: self.start,
            length,
        })
    }
}

/// A unit of feedback about a span of document text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Opaque identifier, unique within a single analysis run
    pub id: String,
    pub category: FindingCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Exact source substring the finding refers to; `None` means
    /// whole-document scope
    pub quoted_text: Option<String>,
    /// Advisory fallback when `quoted_text` search fails
    pub location: Option<TextLocation>,
    /// Regulatory citation or rationale, advisory only
    pub citation: Option<String>,
    /// Supporting quote from retrieved guidance, advisory only
    pub evidence: Option<String>,
    /// Ordered replacement-text candidates, possibly empty
    pub suggestions: Vec<String>,
    /// Model confidence reported by the authoring endpoint, when present
    pub confidence: Option<f64>,
}

impl Finding {
    /// Synthetic finding surfaced when the analysis service cannot be
    /// reached. Mirrors the backend's own degraded-service record.
    pub fn connectivity_error(message: impl Into<String>) -> Self {
        Self {
            id: format!("connectivity-{}", Uuid::new_v4()),
            category: FindingCategory::Compliance,
            severity: Severity::High,
            title: "Analysis Service Unavailable".to_string(),
            description: format!(
                "Protocol analysis service is currently unavailable: {}. \
                 Please retry or consult regulatory counsel.",
                message.into()
            ),
            quoted_text: None,
            location: None,
            citation: Some(
                "Manual review recommended when automated analysis fails".to_string(),
            ),
            evidence: None,
            suggestions: vec![
                "Retry analysis".to_string(),
                "Consult regulatory expert".to_string(),
            ],
            confidence: None,
        }
    }

    /// First replacement candidate, if the backend provided any
    pub fn primary_suggestion(&self) -> Option<&str> {
        self.suggestions.first().map(String::as_str)
    }

    /// True when the finding carries a usable quoted span (the locator
    /// requires at least 3 characters to search)
    pub fn has_searchable_quote(&self) -> bool {
        self.quoted_text
            .as_deref()
            .map(|q| q.trim().chars().count() >= 3)
            .unwrap_or(false)
    }
}

/// Letter grade reported per category by the analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Grade {
    A,
    B,
    #[default]
    C,
    D,
    F,
}

impl Grade {
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category letter grades from one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryScores {
    pub clarity: Grade,
    pub regulatory: Grade,
    pub feasibility: Grade,
}

/// Overall amendment risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AmendmentRisk {
    Low,
    #[default]
    Medium,
    High,
}

impl AmendmentRisk {
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Response to one analysis request.
///
/// Created fresh per request and superseded wholesale by the next; the
/// client may union primary and authoring findings into one result before
/// it reaches the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scores: CategoryScores,
    pub amendment_risk: AmendmentRisk,
    pub findings: Vec<Finding>,
}

impl AnalysisResult {
    /// Result standing in for a failed primary request: default grades and
    /// exactly one high-severity connectivity finding.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            scores: CategoryScores::default(),
            amendment_risk: AmendmentRisk::Medium,
            findings: vec![Finding::connectivity_error(message)],
        }
    }
}

/// Status payload from `GET /api/intelligence-status`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntelligenceStatus {
    pub system_type: String,
    pub intelligence_level: Option<f64>,
    pub features_active: BTreeMap<String, bool>,
}

impl IntelligenceStatus {
    /// Short label for the task-pane status line
    pub fn label(&self) -> String {
        match self.intelligence_level {
            Some(level) => format!("{} (level {:.1})", self.system_type, level),
            None => self.system_type.clone(),
        }
    }
}

/// User decision reported back to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackAction {
    Accept,
    Ignore,
}

impl FeedbackAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Ignore => "ignore",
        }
    }
}

/// One accept/ignore decision with its surrounding document context.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRecord {
    pub finding_id: String,
    pub action: FeedbackAction,
    pub user_feedback: String,
    /// Short snippet of the document around the finding, not the full text
    pub protocol_text: String,
    #[serde(skip_serializing)]
    pub submitted_at: DateTime<Utc>,
}

/// Free-form context hints forwarded to the authoring endpoint.
///
/// Embedders may pin these; triage fills in whatever is missing from its
/// own keyword detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextHints {
    pub therapeutic_area: Option<String>,
    pub phase: Option<String>,
    pub section: Option<String>,
}

impl ContextHints {
    /// Fill empty fields from `detected`, keeping any pinned values.
    pub fn merged_with(&self, detected: &ContextHints) -> ContextHints {
        ContextHints {
            therapeutic_area: self
                .therapeutic_area
                .clone()
                .or_else(|| detected.therapeutic_area.clone()),
            phase: self.phase.clone().or_else(|| detected.phase.clone()),
            section: self.section.clone().or_else(|| detected.section.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_lenient_parse_covers_backend_aliases() {
        assert_eq!(
            FindingCategory::parse_lenient("regulatory"),
            Some(FindingCategory::Compliance)
        );
        assert_eq!(
            FindingCategory::parse_lenient("Style"),
            Some(FindingCategory::Clarity)
        );
        assert_eq!(
            FindingCategory::parse_lenient("feasibility"),
            Some(FindingCategory::Feasibility)
        );
        assert_eq!(FindingCategory::parse_lenient("unknown"), None);
    }

    #[test]
    fn severity_orders_low_to_high() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert_eq!(Severity::parse_lenient("critical"), Some(Severity::High));
    }

    #[test]
    fn location_clamps_to_document() {
        let loc = TextLocation::new(10, 20);
        assert_eq!(loc.clamp_to(15), Some(TextLocation::new(10, 5)));
        assert_eq!(loc.clamp_to(10), None);
        assert_eq!(TextLocation::new(0, 0).clamp_to(100), None);
    }

    #[test]
    fn connectivity_finding_is_high_compliance() {
        let finding = Finding::connectivity_error("connection refused");
        assert_eq!(finding.category, FindingCategory::Compliance);
        assert_eq!(finding.severity, Severity::High);
        assert!(finding.title.contains("Unavailable"));
        assert!(finding.description.contains("connection refused"));
    }

    #[test]
    fn hints_merge_keeps_pinned_values() {
        let pinned = ContextHints {
            therapeutic_area: Some("oncology".into()),
            phase: None,
            section: None,
        };
        let detected = ContextHints {
            therapeutic_area: Some("cardiology".into()),
            phase: None,
            section: Some("safety".into()),
        };
        let merged = pinned.merged_with(&detected);
        assert_eq!(merged.therapeutic_area.as_deref(), Some("oncology"));
        assert_eq!(merged.section.as_deref(), Some("safety"));
    }

    #[test]
    fn searchable_quote_requires_three_chars() {
        let mut finding = Finding::connectivity_error("x");
        assert!(!finding.has_searchable_quote());
        finding.quoted_text = Some("ab".into());
        assert!(!finding.has_searchable_quote());
        finding.quoted_text = Some("abc".into());
        assert!(finding.has_searchable_quote());
    }
}
