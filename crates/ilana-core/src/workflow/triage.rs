//! Pre-scan triage
//!
//! Decides whether a piece of text is worth sending for analysis, and
//! detects section/therapeutic-area context hints for the authoring
//! endpoint. Detection is keyword scoring, not NLP; it only needs to be
//! right often enough to improve the guidance the backend returns.

use crate::config::ServiceConfig;
use crate::types::ContextHints;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// Why a scan was skipped before any request was made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Trimmed text was shorter than the configured minimum
    TooShort { len: usize },
    /// Administrative boilerplate (title page, TOC, signature block)
    Boilerplate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => write!(f, "text too short ({len} chars)"),
            Self::Boilerplate => write!(f, "administrative boilerplate"),
        }
    }
}

/// Outcome of triaging a candidate scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    Proceed(ContextHints),
    Skip(SkipReason),
}

/// Multi-word phrases that only appear on administrative pages
const BOILERPLATE_PHRASES: &[&str] = &[
    "table of contents",
    "list of abbreviations",
    "list of tables",
    "list of figures",
    "signature page",
    "sponsor signature",
    "investigator signature",
    "confidentiality statement",
    "version history",
    "amendment history",
    "protocol number",
    "document approval",
];

/// Section indicators mirrored from the authoring service
const SECTION_INDICATORS: &[(&str, &[&str])] = &[
    (
        "objectives",
        &["objective", "primary endpoint", "secondary endpoint", "aim", "purpose"],
    ),
    (
        "background",
        &["background", "rationale", "introduction", "literature"],
    ),
    (
        "methods",
        &["methodology", "study design", "procedures", "intervention"],
    ),
    (
        "inclusion_criteria",
        &["inclusion criteria", "eligibility", "patient selection"],
    ),
    (
        "exclusion_criteria",
        &["exclusion criteria", "contraindication"],
    ),
    (
        "endpoints",
        &["primary endpoint", "secondary endpoint", "outcome measure"],
    ),
    (
        "statistical_analysis",
        &["statistical", "analysis", "sample size", "power"],
    ),
    ("safety", &["safety", "adverse event", "toxicity", "risk"]),
    (
        "administration",
        &["dosing", "administration", "schedule", "dose"],
    ),
];

/// Therapeutic area indicators mirrored from the authoring service
const THERAPEUTIC_INDICATORS: &[(&str, &[&str])] = &[
    (
        "oncology",
        &["cancer", "tumor", "oncology", "carcinoma", "lymphoma", "melanoma", "chemotherapy", "radiation"],
    ),
    (
        "cardiology",
        &["cardiac", "cardiovascular", "heart", "myocardial", "coronary", "hypertension"],
    ),
    (
        "neurology",
        &["neurological", "brain", "alzheimer", "parkinson", "stroke", "dementia", "cognitive"],
    ),
    (
        "diabetes",
        &["diabetes", "diabetic", "glucose", "insulin", "glycemic", "hba1c"],
    ),
    (
        "immunology",
        &["autoimmune", "rheumatoid", "lupus", "inflammatory", "immune"],
    ),
    (
        "infectious_disease",
        &["infection", "antimicrobial", "antibiotic", "antiviral", "hepatitis"],
    ),
    (
        "respiratory",
        &["asthma", "copd", "pulmonary", "lung", "respiratory"],
    ),
];

lazy_static! {
    /// TOC dot leaders followed by a page number ("Introduction ...... 3")
    static ref DOT_LEADER: Regex = Regex::new(r"\.{4,}\s*\d+").unwrap();
    /// Trial phase mentions ("Phase II", "phase 3")
    static ref PHASE: Regex = Regex::new(r"(?i)\bphase\s+(iv|iii|ii|i\b|[1-4])").unwrap();
}

/// Gate a candidate scan and detect context hints.
pub fn triage(text: &str, config: &ServiceConfig) -> TriageOutcome {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < config.min_scan_len {
        return TriageOutcome::Skip(SkipReason::TooShort { len });
    }
    if boilerplate_density(trimmed) > config.boilerplate_density {
        return TriageOutcome::Skip(SkipReason::Boilerplate);
    }
    TriageOutcome::Proceed(detect_hints(trimmed))
}

/// Fraction of words accounted for by administrative phrases and TOC
/// dot-leader lines.
pub fn boilerplate_density(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let total_words = lower.split_whitespace().count().max(1);

    let mut hit_words = 0usize;
    for phrase in BOILERPLATE_PHRASES {
        let phrase_words = phrase.split_whitespace().count();
        hit_words += lower.matches(phrase).count() * phrase_words;
    }
    // each dot-leader entry stands for a TOC line
    hit_words += DOT_LEADER.find_iter(&lower).count() * 2;

    hit_words as f64 / total_words as f64
}

/// Detect section, therapeutic area, and trial phase from keyword scoring.
pub fn detect_hints(text: &str) -> ContextHints {
    let lower = text.to_lowercase();

    // first section whose indicators match, in table order
    let section = SECTION_INDICATORS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(name, _)| name.to_string());

    // highest-scoring therapeutic area, ties broken by table order
    let therapeutic_area = THERAPEUTIC_INDICATORS
        .iter()
        .map(|(name, keywords)| {
            let score = keywords.iter().filter(|kw| lower.contains(*kw)).count();
            (*name, score)
        })
        .filter(|(_, score)| *score > 0)
        .max_by_key(|(_, score)| *score)
        .map(|(name, _)| name.to_string());

    let phase = PHASE
        .captures(text)
        .map(|caps| format!("Phase {}", caps[1].to_uppercase()));

    ContextHints {
        therapeutic_area,
        phase,
        section,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServiceConfig {
        ServiceConfig::default()
    }

    #[test]
    fn short_text_is_skipped() {
        let outcome = triage("ICF missing", &config());
        assert_eq!(outcome, TriageOutcome::Skip(SkipReason::TooShort { len: 11 }));
    }

    #[test]
    fn toc_page_is_skipped_as_boilerplate() {
        let toc = "Table of Contents\n\
                   1. Introduction .......... 3\n\
                   2. Objectives ............ 5\n\
                   3. Study Design .......... 8\n\
                   Signature Page ........... 2\n";
        let outcome = triage(toc, &config());
        assert_eq!(outcome, TriageOutcome::Skip(SkipReason::Boilerplate));
    }

    #[test]
    fn protocol_prose_proceeds_with_hints() {
        let text = "This phase 2 study will enroll patients with metastatic carcinoma. \
                    Inclusion criteria require measurable tumor burden and prior chemotherapy. \
                    Eligibility will be confirmed at screening.";
        match triage(text, &config()) {
            TriageOutcome::Proceed(hints) => {
                assert_eq!(hints.therapeutic_area.as_deref(), Some("oncology"));
                assert_eq!(hints.section.as_deref(), Some("inclusion_criteria"));
                assert_eq!(hints.phase.as_deref(), Some("Phase 2"));
            }
            other => panic!("expected proceed, got {other:?}"),
        }
    }

    #[test]
    fn detects_roman_numeral_phase() {
        let hints = detect_hints("A Phase III randomized trial of cardiac outcomes in heart failure");
        assert_eq!(hints.phase.as_deref(), Some("Phase III"));
        assert_eq!(hints.therapeutic_area.as_deref(), Some("cardiology"));
    }

    #[test]
    fn general_text_yields_no_hints() {
        let hints = detect_hints("the quick brown fox jumps over the lazy dog");
        assert_eq!(hints, ContextHints::default());
    }

    #[test]
    fn density_is_zero_for_plain_prose() {
        assert_eq!(
            boilerplate_density("subjects will receive the study drug daily"),
            0.0
        );
    }
}
