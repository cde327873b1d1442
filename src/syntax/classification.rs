//! Classification spans and document versioning.
//!
//! Spans are 1-indexed in both lines and columns and half-open on the
//! column end, so `let` at the start of line 1 covers columns 1..4.
//! Columns count chars, not bytes.

use serde::{Deserialize, Serialize};

/// Monotonic per-document version token.
///
/// Bumped on every content mutation, snapshotted into each classification
/// request, and echoed back in the response. Compared only for equality:
/// a response whose version is not the current one is stale and gets
/// discarded. Serialized as a string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DocumentVersion(pub u64);

impl DocumentVersion {
    pub fn next(self) -> Self {
        DocumentVersion(self.0 + 1)
    }
}

impl std::fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for DocumentVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u64>()
            .map(DocumentVersion)
            .map_err(serde::de::Error::custom)
    }
}

/// One classified span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// First line of the span (1-indexed)
    pub start_line: usize,
    /// First column of the span (1-indexed, inclusive)
    pub start: usize,
    /// Line the span ends on (1-indexed)
    pub end_line: usize,
    /// Column the span ends before (1-indexed, exclusive)
    pub end: usize,
    /// Style tag applied verbatim as the decoration class
    pub kind: String,
}

/// Tree-sitter capture names mapped to classification kinds.
const CAPTURE_KINDS: &[(&str, &str)] = &[
    ("attribute", "Attribute"),
    ("boolean", "Keyword"),
    ("comment", "Comment"),
    ("constant", "Constant"),
    ("constructor", "Constructor"),
    ("embedded", "Text"),
    ("escape", "String"),
    ("function", "Function"),
    ("keyword", "Keyword"),
    ("label", "Identifier"),
    ("number", "Number"),
    ("operator", "Operator"),
    ("property", "Property"),
    ("punctuation", "Punctuation"),
    ("string", "String"),
    ("tag", "Tag"),
    ("type", "Type"),
    ("variable", "Identifier"),
];

/// Map a capture name to a classification kind.
///
/// Hierarchical capture names fall back to their parent: "keyword.control.import"
/// tries "keyword.control" and then "keyword". Captures with no entry at any
/// level classify as nothing.
pub fn kind_for_capture(name: &str) -> Option<&'static str> {
    let mut current = name;

    loop {
        if let Some(&(_, kind)) = CAPTURE_KINDS.iter().find(|(capture, _)| *capture == current) {
            return Some(kind);
        }

        // Try parent: "punctuation.bracket" -> "punctuation"
        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}
