//! Windows over subword index space.

use serde::{Deserialize, Serialize};

/// A half-open range `[start, end)` of subword indices submitted to the
/// embedding model in one inference call.
///
/// The planner guarantees `start < end` for every emitted window and that
/// consecutive windows overlap or touch, covering `[0, S)` with no gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// First subword index in the window
    pub start: usize,
    /// One past the last subword index in the window
    pub end: usize,
}

impl Window {
    /// Create a new window.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of subwords in the window.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the window contains no subwords.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether the given subword index falls inside this window.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}
