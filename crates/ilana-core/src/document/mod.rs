//! Host document abstraction
//!
//! The live Word document sits behind [`DocumentHost`]; everything in this
//! crate works against the trait so the workflow can run against an Office
//! task-pane shim, a test double, or the bundled [`MemoryDocument`].
//!
//! All offsets and lengths are in characters of the host's current text.

pub mod highlighter;
pub mod locator;
pub mod memory;

pub use highlighter::Highlighter;
pub use memory::MemoryDocument;

use crate::error::IlanaResult;
use crate::types::FindingCategory;
use async_trait::async_trait;

/// A contiguous span of document text, addressed by character offsets.
///
/// Hosts with opaque range objects adapt internally; handles are only
/// valid until the next mutation of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeHandle {
    pub start: usize,
    pub length: usize,
}

impl RangeHandle {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Category-derived highlight palette from the task-pane UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightColor {
    Red,
    Orange,
    Blue,
}

/// Visual treatment for a marked range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyle {
    pub color: HighlightColor,
    pub underline: bool,
}

impl HighlightStyle {
    /// Persistent marker style for a finding of the given category
    pub fn for_category(category: FindingCategory) -> Self {
        let color = match category {
            FindingCategory::Compliance => HighlightColor::Red,
            FindingCategory::Feasibility => HighlightColor::Orange,
            FindingCategory::Clarity => HighlightColor::Blue,
        };
        Self {
            color,
            underline: true,
        }
    }
}

/// Host API surface the workflow consumes.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Full body text of the document
    async fn full_text(&self) -> IlanaResult<String>;

    /// Text of the current selection; empty when nothing is selected
    async fn selection_text(&self) -> IlanaResult<String>;

    /// Find all occurrences of `needle`, in document order
    async fn search(&self, needle: &str, case_sensitive: bool) -> IlanaResult<Vec<RangeHandle>>;

    /// Replace exactly the text covered by `range`
    async fn replace_range(&self, range: &RangeHandle, replacement: &str) -> IlanaResult<()>;

    /// Apply a persistent visual marker to `range`
    async fn highlight_range(&self, range: &RangeHandle, style: HighlightStyle) -> IlanaResult<()>;

    /// Remove every marker previously applied through this host
    async fn clear_highlights(&self) -> IlanaResult<()>;

    /// Navigate the view to `range` and flash it (one-shot, no marker)
    async fn select_range(&self, range: &RangeHandle) -> IlanaResult<()>;
}
