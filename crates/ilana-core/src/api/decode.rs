//! Per-endpoint response decoders
//!
//! Each remote endpoint has its own wire shape; each decoder here validates
//! and converts one shape into the canonical types in [`crate::types`].
//! Malformed records are logged and dropped rather than silently defaulted.

use crate::error::{IlanaError, IlanaResult};
use crate::types::{
    AmendmentRisk, AnalysisResult, CategoryScores, Finding, FindingCategory, Grade,
    IntelligenceStatus, Severity, TextLocation,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Decode a `POST /api/analyze-protocol` response.
///
/// Expected shape:
/// `{ scores: {clarity, regulatory, feasibility}, amendmentRisk, findings: [...] }`
pub fn decode_analysis(response: &Value) -> IlanaResult<AnalysisResult> {
    let obj = response
        .as_object()
        .ok_or_else(|| IlanaError::decode("analysis response is not a JSON object"))?;

    let scores = decode_scores(obj.get("scores"));
    let amendment_risk = obj
        .get("amendmentRisk")
        .and_then(Value::as_str)
        .and_then(AmendmentRisk::parse_lenient)
        .unwrap_or_default();

    let mut findings = Vec::new();
    if let Some(raw_findings) = obj.get("findings").and_then(Value::as_array) {
        for raw in raw_findings {
            match decode_analysis_finding(raw) {
                Some(finding) => findings.push(finding),
                None => {
                    tracing::warn!(record = %raw, "dropping malformed analysis finding");
                }
            }
        }
    }

    Ok(AnalysisResult {
        scores,
        amendment_risk,
        findings,
    })
}

fn decode_scores(value: Option<&Value>) -> CategoryScores {
    let grade = |key: &str| -> Grade {
        value
            .and_then(|scores| scores.get(key))
            .and_then(Value::as_str)
            .and_then(Grade::parse_lenient)
            .unwrap_or_default()
    };
    CategoryScores {
        clarity: grade("clarity"),
        regulatory: grade("regulatory"),
        feasibility: grade("feasibility"),
    }
}

/// Wire finding fields per the analysis endpoint: `id`, `type`, `severity`,
/// `title`, `description`, `citation`, `location {start, length}`,
/// `suggestions`, `quoted_text`, `evidence`.
fn decode_analysis_finding(raw: &Value) -> Option<Finding> {
    let id = raw.get("id")?.as_str()?.to_string();
    let title = raw.get("title")?.as_str()?.to_string();
    let category = FindingCategory::parse_lenient(raw.get("type")?.as_str()?)?;
    let severity = decode_severity(raw.get("severity"), &id);

    Some(Finding {
        id,
        category,
        severity,
        title,
        description: string_field(raw, "description").unwrap_or_default(),
        quoted_text: non_empty(string_field(raw, "quoted_text")),
        location: decode_location(raw.get("location")),
        citation: non_empty(string_field(raw, "citation")),
        evidence: non_empty(string_field(raw, "evidence")),
        suggestions: string_array(raw.get("suggestions")),
        confidence: raw.get("confidence").and_then(Value::as_f64),
    })
}

/// Decode a `POST /api/sophisticated-authoring` response.
///
/// The endpoint returns guidance objects (`suggestion_id`, `text_span`
/// pair, `original_text`, `suggestion_type`, `severity`, `title`,
/// `description`, `suggestions`, `rationale`, `evidence`, `confidence`),
/// either as a bare array or wrapped under a `guidance` key.
pub fn decode_guidance(response: &Value) -> IlanaResult<Vec<Finding>> {
    let items = response
        .as_array()
        .or_else(|| response.get("guidance").and_then(Value::as_array))
        .ok_or_else(|| IlanaError::decode("authoring response has no guidance array"))?;

    let mut findings = Vec::new();
    for raw in items {
        match decode_guidance_item(raw) {
            Some(finding) => findings.push(finding),
            None => {
                tracing::warn!(record = %raw, "dropping malformed guidance record");
            }
        }
    }
    Ok(findings)
}

fn decode_guidance_item(raw: &Value) -> Option<Finding> {
    let id = raw.get("suggestion_id")?.as_str()?.to_string();
    let title = raw.get("title")?.as_str()?.to_string();
    let category = raw
        .get("suggestion_type")
        .and_then(Value::as_str)
        .map(guidance_category)
        .unwrap_or(FindingCategory::Clarity);
    let severity = decode_severity(raw.get("severity"), &id);

    // text_span is an inclusive-start, exclusive-end pair
    let location = raw
        .get("text_span")
        .and_then(Value::as_array)
        .and_then(|span| {
            let start = span.first()?.as_u64()? as usize;
            let end = span.get(1)?.as_u64()? as usize;
            (end > start).then(|| TextLocation::new(start, end - start))
        });

    Some(Finding {
        id,
        category,
        severity,
        title,
        description: string_field(raw, "description").unwrap_or_default(),
        quoted_text: non_empty(string_field(raw, "original_text")),
        location,
        citation: non_empty(string_field(raw, "rationale")),
        evidence: non_empty(string_field(raw, "evidence")),
        suggestions: string_array(raw.get("suggestions")),
        confidence: raw.get("confidence").and_then(Value::as_f64),
    })
}

/// Decode a `GET /api/intelligence-status` response.
pub fn decode_status(response: &Value) -> IlanaResult<IntelligenceStatus> {
    let obj = response
        .as_object()
        .ok_or_else(|| IlanaError::decode("status response is not a JSON object"))?;

    let mut features_active = BTreeMap::new();
    if let Some(features) = obj.get("features_active").and_then(Value::as_object) {
        for (name, enabled) in features {
            features_active.insert(name.clone(), enabled.as_bool().unwrap_or(false));
        }
    }

    Ok(IntelligenceStatus {
        system_type: obj
            .get("system_type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        intelligence_level: obj.get("intelligence_level").and_then(Value::as_f64),
        features_active,
    })
}

/// Map an authoring `suggestion_type` onto the closed category set.
///
/// The service emits compound type names (`feasibility_assessment`,
/// `clarity_enhancement`, `verbiage_intelligence`, `clinical_ai`,
/// `protocol_pattern`, `therapeutic_specific`, ...); the concern is
/// recovered by substring, and everything without a recognizable concern
/// is editorial guidance, so it lands in `Clarity`. Only structurally
/// broken records (missing id or title) are dropped.
fn guidance_category(value: &str) -> FindingCategory {
    let value = value.trim().to_ascii_lowercase();
    if value.contains("regulatory") || value.contains("compliance") {
        FindingCategory::Compliance
    } else if value.contains("feasibility") {
        FindingCategory::Feasibility
    } else {
        FindingCategory::Clarity
    }
}

fn decode_severity(value: Option<&Value>, finding_id: &str) -> Severity {
    match value.and_then(Value::as_str) {
        Some(raw) => Severity::parse_lenient(raw).unwrap_or_else(|| {
            tracing::warn!(finding_id, severity = raw, "unknown severity, defaulting to medium");
            Severity::Medium
        }),
        None => Severity::Medium,
    }
}

fn decode_location(value: Option<&Value>) -> Option<TextLocation> {
    let obj = value?.as_object()?;
    let start = obj.get("start")?.as_u64()? as usize;
    let length = obj.get("length")?.as_u64()? as usize;
    Some(TextLocation::new(start, length))
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_analysis_response() {
        let response = json!({
            "scores": {"clarity": "B", "regulatory": "D", "feasibility": "A"},
            "amendmentRisk": "high",
            "findings": [{
                "id": "icf-missing",
                "type": "compliance",
                "severity": "high",
                "title": "Informed consent section incomplete",
                "description": "The protocol does not describe the consent process.",
                "citation": "ICH-GCP 4.8.10",
                "location": {"start": 120, "length": 45},
                "suggestions": ["Describe the informed consent procedure in full."],
                "quoted_text": "Consent will be obtained.",
                "evidence": "ICH-GCP requires a description of the consent process."
            }]
        });

        let result = decode_analysis(&response).unwrap();
        assert_eq!(result.scores.clarity, Grade::B);
        assert_eq!(result.scores.regulatory, Grade::D);
        assert_eq!(result.amendment_risk, AmendmentRisk::High);
        assert_eq!(result.findings.len(), 1);

        let finding = &result.findings[0];
        assert_eq!(finding.id, "icf-missing");
        assert_eq!(finding.category, FindingCategory::Compliance);
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.location, Some(TextLocation::new(120, 45)));
        assert_eq!(finding.quoted_text.as_deref(), Some("Consent will be obtained."));
        assert_eq!(finding.suggestions.len(), 1);
    }

    #[test]
    fn drops_findings_missing_required_fields() {
        let response = json!({
            "scores": {"clarity": "C", "regulatory": "C", "feasibility": "C"},
            "amendmentRisk": "medium",
            "findings": [
                {"id": "ok", "type": "clarity", "severity": "low", "title": "Fine"},
                {"type": "clarity", "severity": "low", "title": "No id"},
                {"id": "bad-category", "type": "mystery", "severity": "low", "title": "X"}
            ]
        });

        let result = decode_analysis(&response).unwrap();
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].id, "ok");
    }

    #[test]
    fn empty_strings_become_none() {
        let response = json!({
            "findings": [{
                "id": "f1",
                "type": "compliance",
                "severity": "medium",
                "title": "T",
                "quoted_text": "",
                "citation": "  "
            }]
        });
        let result = decode_analysis(&response).unwrap();
        assert_eq!(result.findings[0].quoted_text, None);
        assert_eq!(result.findings[0].citation, None);
    }

    #[test]
    fn missing_scores_default_to_c() {
        let result = decode_analysis(&json!({"findings": []})).unwrap();
        assert_eq!(result.scores.clarity, Grade::C);
        assert_eq!(result.amendment_risk, AmendmentRisk::Medium);
    }

    #[test]
    fn decodes_guidance_array_with_aliases() {
        let response = json!([{
            "suggestion_id": "g-1",
            "text_span": [10, 35],
            "original_text": "patients will be enrolled",
            "suggestion_type": "regulatory",
            "severity": "critical",
            "title": "Specify enrollment criteria",
            "description": "Enrollment lacks objective criteria.",
            "suggestions": ["Enroll participants meeting all inclusion criteria."],
            "rationale": "Objective criteria reduce amendment risk.",
            "evidence": "Similar protocols specify criteria explicitly.",
            "confidence": 0.82
        }]);

        let findings = decode_guidance(&response).unwrap();
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.category, FindingCategory::Compliance);
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.location, Some(TextLocation::new(10, 25)));
        assert_eq!(finding.citation.as_deref(), Some("Objective criteria reduce amendment risk."));
        assert_eq!(finding.confidence, Some(0.82));
    }

    #[test]
    fn decodes_wrapped_guidance_and_drops_malformed() {
        let response = json!({"guidance": [
            {"suggestion_id": "g-1", "suggestion_type": "style", "severity": "low", "title": "Tighten wording"},
            {"suggestion_type": "style", "title": "No id"}
        ]});
        let findings = decode_guidance(&response).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, FindingCategory::Clarity);
    }

    #[test]
    fn decodes_service_suggestion_type_vocabulary() {
        let record = |id: &str, kind: &str| {
            json!({
                "suggestion_id": id,
                "suggestion_type": kind,
                "severity": "medium",
                "title": "Guidance",
                "description": "Generated guidance."
            })
        };
        let response = json!([
            record("g-1", "clinical_ai"),
            record("g-2", "protocol_pattern"),
            record("g-3", "feasibility_assessment"),
            record("g-4", "verbiage_intelligence"),
            record("g-5", "therapeutic_specific"),
            record("g-6", "real_data_intelligence"),
        ]);

        let findings = decode_guidance(&response).unwrap();
        assert_eq!(findings.len(), 6);
        assert_eq!(findings[0].category, FindingCategory::Clarity);
        assert_eq!(findings[2].category, FindingCategory::Feasibility);
        assert_eq!(findings[3].category, FindingCategory::Clarity);
    }

    #[test]
    fn guidance_requires_an_array_shape() {
        assert!(decode_guidance(&json!({"nope": true})).is_err());
    }

    #[test]
    fn decodes_status_payload() {
        let response = json!({
            "system_type": "lightweight_advanced",
            "intelligence_level": 8.5,
            "features_active": {"pattern_recognition": true, "user_learning": false}
        });
        let status = decode_status(&response).unwrap();
        assert_eq!(status.system_type, "lightweight_advanced");
        assert_eq!(status.intelligence_level, Some(8.5));
        assert_eq!(status.features_active.get("pattern_recognition"), Some(&true));
        assert_eq!(status.label(), "lightweight_advanced (level 8.5)");
    }
}
