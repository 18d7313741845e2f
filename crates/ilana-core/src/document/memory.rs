//! In-memory reference implementation of [`DocumentHost`]
//!
//! Reference host for embedders without a live document, and the host used
//! throughout the test suite. Case-insensitive search is ASCII-only, which
//! matches how the add-in searched protocol text.

use crate::document::{DocumentHost, HighlightStyle, RangeHandle};
use crate::error::{IlanaError, IlanaResult};
use async_trait::async_trait;
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct DocState {
    text: String,
    selection: Option<RangeHandle>,
    highlights: Vec<(RangeHandle, HighlightStyle)>,
    last_navigated: Option<RangeHandle>,
}

/// A [`DocumentHost`] backed by an in-memory string.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    state: RwLock<DocState>,
}

impl MemoryDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(DocState {
                text: text.into(),
                ..DocState::default()
            }),
        }
    }

    /// Replace the whole document body
    pub fn set_text(&self, text: impl Into<String>) {
        let mut state = self.state.write();
        state.text = text.into();
        state.selection = None;
    }

    /// Set the current selection window (character offsets)
    pub fn set_selection(&self, range: RangeHandle) {
        self.state.write().selection = Some(range);
    }

    pub fn text(&self) -> String {
        self.state.read().text.clone()
    }

    pub fn highlight_count(&self) -> usize {
        self.state.read().highlights.len()
    }

    pub fn highlights(&self) -> Vec<(RangeHandle, HighlightStyle)> {
        self.state.read().highlights.clone()
    }

    /// Range last flashed through `select_range`, for assertions
    pub fn last_navigated(&self) -> Option<RangeHandle> {
        self.state.read().last_navigated
    }

    fn char_slice(text: &str, range: &RangeHandle) -> Option<(usize, usize)> {
        let char_count = text.chars().count();
        if range.end() > char_count {
            return None;
        }
        let mut indices = text.char_indices().map(|(i, _)| i);
        let start_byte = indices.nth(range.start).unwrap_or(text.len());
        let end_byte = if range.length == 0 {
            start_byte
        } else {
            text.char_indices()
                .map(|(i, _)| i)
                .nth(range.end())
                .unwrap_or(text.len())
        };
        Some((start_byte, end_byte))
    }
}

#[async_trait]
impl DocumentHost for MemoryDocument {
    async fn full_text(&self) -> IlanaResult<String> {
        Ok(self.state.read().text.clone())
    }

    async fn selection_text(&self) -> IlanaResult<String> {
        let state = self.state.read();
        match state.selection {
            Some(range) => {
                let (start, end) = Self::char_slice(&state.text, &range)
                    .ok_or_else(|| IlanaError::host("selection is out of bounds"))?;
                Ok(state.text[start..end].to_string())
            }
            None => Ok(String::new()),
        }
    }

    async fn search(&self, needle: &str, case_sensitive: bool) -> IlanaResult<Vec<RangeHandle>> {
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let state = self.state.read();
        let haystack: Vec<char> = state.text.chars().collect();
        let pattern: Vec<char> = needle.chars().collect();
        let mut matches = Vec::new();

        let mut i = 0;
        while i + pattern.len() <= haystack.len() {
            let hit = haystack[i..i + pattern.len()]
                .iter()
                .zip(pattern.iter())
                .all(|(a, b)| {
                    if case_sensitive {
                        a == b
                    } else {
                        a.eq_ignore_ascii_case(b)
                    }
                });
            if hit {
                matches.push(RangeHandle::new(i, pattern.len()));
                i += pattern.len();
            } else {
                i += 1;
            }
        }
        Ok(matches)
    }

    async fn replace_range(&self, range: &RangeHandle, replacement: &str) -> IlanaResult<()> {
        let mut state = self.state.write();
        let (start, end) = Self::char_slice(&state.text, range)
            .ok_or_else(|| IlanaError::host("replace range is out of bounds"))?;
        state.text.replace_range(start..end, replacement);
        Ok(())
    }

    async fn highlight_range(&self, range: &RangeHandle, style: HighlightStyle) -> IlanaResult<()> {
        let mut state = self.state.write();
        let char_count = state.text.chars().count();
        if range.end() > char_count {
            return Err(IlanaError::host("highlight range is out of bounds"));
        }
        state.highlights.push((*range, style));
        Ok(())
    }

    async fn clear_highlights(&self) -> IlanaResult<()> {
        self.state.write().highlights.clear();
        Ok(())
    }

    async fn select_range(&self, range: &RangeHandle) -> IlanaResult<()> {
        let mut state = self.state.write();
        state.selection = Some(*range);
        state.last_navigated = Some(*range);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FindingCategory;

    #[tokio::test]
    async fn search_is_case_insensitive_and_in_document_order() {
        let doc = MemoryDocument::new("The Subject consents. The subject withdraws.");
        let hits = doc.search("subject", false).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].start < hits[1].start);

        let exact = doc.search("subject", true).await.unwrap();
        assert_eq!(exact.len(), 1);
    }

    #[tokio::test]
    async fn replace_range_swaps_exact_span() {
        let doc = MemoryDocument::new("dose of 10 mg daily");
        let hits = doc.search("10 mg", true).await.unwrap();
        doc.replace_range(&hits[0], "20 mg").await.unwrap();
        assert_eq!(doc.text(), "dose of 20 mg daily");
    }

    #[tokio::test]
    async fn selection_text_reads_the_window() {
        let doc = MemoryDocument::new("abcdef");
        doc.set_selection(RangeHandle::new(2, 3));
        assert_eq!(doc.selection_text().await.unwrap(), "cde");
    }

    #[tokio::test]
    async fn highlights_accumulate_and_clear() {
        let doc = MemoryDocument::new("some protocol text");
        let style = HighlightStyle::for_category(FindingCategory::Clarity);
        doc.highlight_range(&RangeHandle::new(0, 4), style)
            .await
            .unwrap();
        doc.highlight_range(&RangeHandle::new(5, 8), style)
            .await
            .unwrap();
        assert_eq!(doc.highlight_count(), 2);

        doc.clear_highlights().await.unwrap();
        assert_eq!(doc.highlight_count(), 0);
    }

    #[tokio::test]
    async fn out_of_bounds_ranges_are_rejected() {
        let doc = MemoryDocument::new("short");
        let err = doc
            .replace_range(&RangeHandle::new(3, 10), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, IlanaError::Host(_)));
    }
}
