//! Tree-sitter classification
//!
//! Turns request text into classification spans. Grammars and compiled
//! queries come from the shared runtime; parser instances live here
//! because tree-sitter parsers are not Sync and each worker thread needs
//! its own.
//!
//! Every request is a full reparse of the request's text snapshot. The
//! snapshot model keeps the worker stateless across requests, which is
//! what makes stale responses safe to throw away.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor, Tree};

use crate::runtime::Runtime;

use super::classification::{kind_for_capture, Classification};
use super::languages::LanguageId;
use super::protocol::{ClassifyRequest, ClassifyResponse};

/// Per-thread classification state.
pub struct Classifier {
    runtime: Arc<Runtime>,
    /// Parsers are created on first use per language
    parsers: HashMap<LanguageId, Parser>,
}

impl Classifier {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            runtime,
            parsers: HashMap::new(),
        }
    }

    /// Classify one request. The grammar is routed from the request title;
    /// titles with no classifiable extension produce an empty batch.
    pub fn classify(&mut self, request: &ClassifyRequest) -> ClassifyResponse {
        let language = LanguageId::from_title(&request.title);
        let classifications = self.classify_source(&request.code, language);
        ClassifyResponse {
            classifications,
            version: request.version,
        }
    }

    fn classify_source(&mut self, source: &str, language: LanguageId) -> Vec<Classification> {
        if !language.has_classifier() {
            return Vec::new();
        }

        let Some(support) = self.runtime.language(language) else {
            tracing::warn!("No grammar registered for {:?}", language);
            return Vec::new();
        };

        let parser = match self.parsers.entry(language) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut parser = Parser::new();
                if let Err(e) = parser.set_language(&support.language) {
                    tracing::error!("Failed to set parser language for {:?}: {}", language, e);
                    return Vec::new();
                }
                entry.insert(parser)
            }
        };

        let Some(tree) = parser.parse(source, None) else {
            tracing::error!("Parse returned no tree for {:?}", language);
            return Vec::new();
        };

        extract_classifications(source, &tree, &support.query)
    }
}

/// Walk query captures over the parse tree and convert them to spans.
fn extract_classifications(source: &str, tree: &Tree, query: &Query) -> Vec<Classification> {
    let mut spans = Vec::new();
    let source_bytes = source.as_bytes();
    let lines: Vec<&str> = source.lines().collect();

    let mut cursor = QueryCursor::new();
    let mut captures = cursor.captures(query, tree.root_node(), source_bytes);

    while let Some((query_match, capture_idx)) = captures.next() {
        let capture = &query_match.captures[*capture_idx];
        let capture_name = query.capture_names()[capture.index as usize];

        let Some(kind) = kind_for_capture(capture_name) else {
            // Captures outside the kind vocabulary classify as nothing
            continue;
        };

        let start = capture.node.start_position();
        let end = capture.node.end_position();

        let start_col = byte_to_char_col(lines.get(start.row).copied().unwrap_or(""), start.column);
        let end_col = byte_to_char_col(lines.get(end.row).copied().unwrap_or(""), end.column);

        if start.row == end.row && start_col >= end_col {
            continue;
        }

        // 1-indexed, half-open on the end column
        spans.push(Classification {
            start_line: start.row + 1,
            start: start_col + 1,
            end_line: end.row + 1,
            end: end_col + 1,
            kind: kind.to_string(),
        });
    }

    spans.sort_by_key(|span| (span.start_line, span.start, span.end_line, span.end));
    spans
}

/// Convert a tree-sitter byte column to a char column on one line.
fn byte_to_char_col(line: &str, byte_col: usize) -> usize {
    let byte_col = byte_col.min(line.len());

    // Snap to a char boundary so slicing cannot panic mid-codepoint
    let mut valid_byte = byte_col;
    while valid_byte > 0 && !line.is_char_boundary(valid_byte) {
        valid_byte -= 1;
    }

    line[..valid_byte].chars().count()
}
