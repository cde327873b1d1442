//! Language identification and grammar registry keys
//!
//! Maps document titles and file extensions to language IDs. The worker
//! routes every request through `from_title`, so the title's extension is
//! what decides which grammar classifies the text.

use std::path::Path;

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    JavaScript,
    TypeScript,
    Tsx,
    Rust,
    Json,
}

impl LanguageId {
    /// Languages with a compiled grammar in the runtime registry
    pub const CLASSIFIABLE: &'static [LanguageId] = &[
        LanguageId::JavaScript,
        LanguageId::TypeScript,
        LanguageId::Tsx,
        LanguageId::Rust,
        LanguageId::Json,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "jsx" => LanguageId::JavaScript,
            "ts" | "mts" | "cts" => LanguageId::TypeScript,
            "tsx" => LanguageId::Tsx,
            "rs" => LanguageId::Rust,
            "json" => LanguageId::Json,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Detect language from a document title (the worker's routing key)
    pub fn from_title(title: &str) -> Self {
        Self::from_path(Path::new(title))
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::TypeScript => "TypeScript",
            LanguageId::Tsx => "TSX",
            LanguageId::Rust => "Rust",
            LanguageId::Json => "JSON",
        }
    }

    /// Check if this language classifies at all
    pub fn has_classifier(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }

    /// Grammar and highlight query for classifiable languages
    pub(crate) fn grammar(&self) -> Option<(tree_sitter::Language, &'static str)> {
        match self {
            LanguageId::PlainText => None,
            LanguageId::JavaScript => Some((
                tree_sitter_javascript::LANGUAGE.into(),
                tree_sitter_javascript::HIGHLIGHT_QUERY,
            )),
            LanguageId::TypeScript => Some((
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
                tree_sitter_typescript::HIGHLIGHTS_QUERY,
            )),
            LanguageId::Tsx => Some((
                tree_sitter_typescript::LANGUAGE_TSX.into(),
                tree_sitter_typescript::HIGHLIGHTS_QUERY,
            )),
            LanguageId::Rust => Some((
                tree_sitter_rust::LANGUAGE.into(),
                tree_sitter_rust::HIGHLIGHTS_QUERY,
            )),
            LanguageId::Json => Some((
                tree_sitter_json::LANGUAGE.into(),
                tree_sitter_json::HIGHLIGHTS_QUERY,
            )),
        }
    }
}
