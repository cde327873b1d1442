//! Decorations: classification batches applied to the widget.
//!
//! Application is replace-all. A batch that passes the version check
//! becomes the entire decoration set; there is no merging with what was
//! there before.

use serde::{Deserialize, Serialize};

use crate::syntax::Classification;

/// Half-open, 1-indexed range over lines and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub start_line: usize,
    pub start: usize,
    pub end_line: usize,
    pub end: usize,
}

/// One styled range on the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub range: Span,
    /// Style class; classification kinds map through verbatim
    pub class: String,
}

impl Decoration {
    pub fn from_classification(classification: &Classification) -> Self {
        Self {
            range: Span {
                start_line: classification.start_line,
                start: classification.start,
                end_line: classification.end_line,
                end: classification.end,
            },
            class: classification.kind.clone(),
        }
    }
}

/// Convert one batch into the decoration set that replaces the current one.
pub fn decorations_for_batch(classifications: &[Classification]) -> Vec<Decoration> {
    classifications
        .iter()
        .map(Decoration::from_classification)
        .collect()
}
