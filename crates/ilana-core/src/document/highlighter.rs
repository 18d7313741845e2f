//! Scan-scoped highlight application

use crate::document::{locator, DocumentHost, HighlightStyle, RangeHandle};
use crate::error::IlanaResult;
use crate::types::Finding;

/// Applies category-colored markers for a scan's findings.
///
/// Every application clears the previous scan's markers first, so the
/// document never shows a mix of two generations. The number of markers is
/// capped to bound host-API cost.
pub struct Highlighter {
    cap: usize,
}

impl Highlighter {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    /// Clear old markers and highlight `findings` up to the cap.
    ///
    /// Findings that cannot be located are logged and skipped; the batch
    /// always proceeds. Returns the number of markers applied.
    pub async fn apply(
        &self,
        host: &dyn DocumentHost,
        findings: &[Finding],
    ) -> IlanaResult<usize> {
        host.clear_highlights().await?;

        let mut applied = 0;
        for finding in findings {
            if applied >= self.cap {
                tracing::debug!(cap = self.cap, "highlight cap reached, skipping remainder");
                break;
            }
            match locator::locate(host, finding).await? {
                Some(range) => {
                    let style = HighlightStyle::for_category(finding.category);
                    host.highlight_range(&range, style).await?;
                    applied += 1;
                }
                None => {
                    tracing::debug!(finding_id = %finding.id, "finding not found in document, skipping highlight");
                }
            }
        }
        Ok(applied)
    }

    /// Navigate to a single finding and flash it (Learn More).
    /// Returns the flashed range, or `None` if the finding could not be
    /// located.
    pub async fn flash(
        &self,
        host: &dyn DocumentHost,
        finding: &Finding,
    ) -> IlanaResult<Option<RangeHandle>> {
        match locator::locate(host, finding).await? {
            Some(range) => {
                host.select_range(&range).await?;
                Ok(Some(range))
            }
            None => {
                tracing::debug!(finding_id = %finding.id, "finding not found in document, nothing to flash");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HighlightColor, MemoryDocument};
    use crate::types::{FindingCategory, Severity};

    fn quoted_finding(id: &str, quote: &str, category: FindingCategory) -> Finding {
        Finding {
            id: id.into(),
            category,
            severity: Severity::Medium,
            title: id.into(),
            description: String::new(),
            quoted_text: Some(quote.into()),
            location: None,
            citation: None,
            evidence: None,
            suggestions: Vec::new(),
            confidence: None,
        }
    }

    #[tokio::test]
    async fn applies_category_colors_and_clears_previous_scan() {
        let doc = MemoryDocument::new("eligibility criteria and adverse events");
        let highlighter = Highlighter::new(50);

        let first_scan = vec![quoted_finding(
            "f-1",
            "eligibility",
            FindingCategory::Compliance,
        )];
        assert_eq!(highlighter.apply(&doc, &first_scan).await.unwrap(), 1);
        assert_eq!(doc.highlights()[0].1.color, HighlightColor::Red);

        let second_scan = vec![quoted_finding("f-2", "adverse", FindingCategory::Clarity)];
        assert_eq!(highlighter.apply(&doc, &second_scan).await.unwrap(), 1);

        let highlights = doc.highlights();
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].1.color, HighlightColor::Blue);
    }

    #[tokio::test]
    async fn cap_bounds_marker_count() {
        let doc = MemoryDocument::new("aaa bbb ccc ddd");
        let highlighter = Highlighter::new(2);
        let findings = vec![
            quoted_finding("f-1", "aaa", FindingCategory::Clarity),
            quoted_finding("f-2", "bbb", FindingCategory::Clarity),
            quoted_finding("f-3", "ccc", FindingCategory::Clarity),
        ];
        assert_eq!(highlighter.apply(&doc, &findings).await.unwrap(), 2);
        assert_eq!(doc.highlight_count(), 2);
    }

    #[tokio::test]
    async fn unlocatable_findings_do_not_abort_the_batch() {
        let doc = MemoryDocument::new("aaa bbb");
        let highlighter = Highlighter::new(50);
        let findings = vec![
            quoted_finding("f-1", "zzz", FindingCategory::Clarity),
            quoted_finding("f-2", "bbb", FindingCategory::Clarity),
        ];
        assert_eq!(highlighter.apply(&doc, &findings).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn flash_navigates_to_the_finding() {
        let doc = MemoryDocument::new("primary endpoint definition");
        let highlighter = Highlighter::new(50);
        let finding = quoted_finding("f-1", "endpoint", FindingCategory::Feasibility);
        let range = highlighter.flash(&doc, &finding).await.unwrap();
        assert!(range.is_some());
        assert_eq!(doc.last_navigated(), range);
        assert_eq!(doc.highlight_count(), 0);
    }
}
