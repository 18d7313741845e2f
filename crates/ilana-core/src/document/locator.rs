//! Resolving findings to live document ranges
//!
//! Search policy: when the finding carries a quoted span of at least 3
//! characters, a case-insensitive substring search runs against the live
//! document and the first occurrence in document order wins. Otherwise the
//! advisory `location` window is used, clamped to the current document
//! length.
//!
//! First-occurrence matching is a known simplification: two findings that
//! legitimately quote the same text will both resolve to the earliest
//! occurrence.

use crate::document::{DocumentHost, RangeHandle};
use crate::error::IlanaResult;
use crate::types::Finding;

/// Minimum quoted-text length before substring search is attempted
pub const MIN_QUOTE_CHARS: usize = 3;

/// Locate the span a finding refers to in the live document.
///
/// Returns `Ok(None)` when the finding cannot be resolved; callers log and
/// skip that finding's visual treatment without aborting the batch.
pub async fn locate(host: &dyn DocumentHost, finding: &Finding) -> IlanaResult<Option<RangeHandle>> {
    if let Some(quote) = finding.quoted_text.as_deref() {
        let quote = quote.trim();
        if quote.chars().count() >= MIN_QUOTE_CHARS {
            let matches = host.search(quote, false).await?;
            if let Some(first) = matches.first() {
                if matches.len() > 1 {
                    tracing::debug!(
                        finding_id = %finding.id,
                        occurrences = matches.len(),
                        "quoted text is ambiguous, using first occurrence"
                    );
                }
                return Ok(Some(*first));
            }
            tracing::debug!(finding_id = %finding.id, "quoted text not found, trying offset fallback");
        }
    }

    let doc_len = host.full_text().await?.chars().count();
    let fallback = finding
        .location
        .and_then(|loc| loc.clamp_to(doc_len))
        .map(|loc| RangeHandle::new(loc.start, loc.length));
    Ok(fallback)
}
