//! The loaded editor runtime: compiled grammars and the theme registry.
//!
//! One runtime is produced by the bootstrap and shared by every host
//! through an `Arc`. Grammars are immutable after the load; themes sit
//! behind a lock so mount hooks can register shell-specific themes before
//! the widget first paints.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tree_sitter::Query;

use crate::errors::BootstrapError;
use crate::syntax::LanguageId;
use crate::theme::{self, Theme};

/// Grammar plus its compiled highlight query for one language.
pub struct LanguageSupport {
    pub language: tree_sitter::Language,
    pub query: Query,
}

impl LanguageSupport {
    fn compile(id: LanguageId) -> Result<Self, String> {
        let Some((language, query_source)) = id.grammar() else {
            return Err(format!("no grammar for {:?}", id));
        };

        let query = Query::new(&language, query_source)
            .map_err(|e| format!("highlight query for {:?} failed to compile: {}", id, e))?;

        Ok(Self { language, query })
    }
}

/// Shared, immutable-after-load classification and theming support.
pub struct Runtime {
    languages: HashMap<LanguageId, LanguageSupport>,
    themes: RwLock<HashMap<String, Theme>>,
}

impl Runtime {
    /// Compile every built-in grammar and parse the built-in themes, then
    /// overlay user themes from the config directory. This is the
    /// expensive load the bootstrap state machine runs exactly once.
    pub fn load_builtin() -> Result<Self, BootstrapError> {
        let mut languages = HashMap::new();
        for language in LanguageId::CLASSIFIABLE {
            let support = LanguageSupport::compile(*language)
                .map_err(|reason| BootstrapError::LoaderFailed { reason })?;
            languages.insert(*language, support);
        }

        let mut themes = HashMap::new();
        for builtin in theme::BUILTIN_THEMES {
            let theme = Theme::from_yaml(builtin.yaml)
                .map_err(|reason| BootstrapError::LoaderFailed { reason })?;
            themes.insert(builtin.id.to_string(), theme);
        }
        // User themes shadow builtins with the same id
        for (id, theme) in theme::load_user_themes() {
            themes.insert(id, theme);
        }

        tracing::info!(
            "Runtime loaded: {} grammars, {} themes",
            languages.len(),
            themes.len()
        );

        Ok(Self {
            languages,
            themes: RwLock::new(themes),
        })
    }

    /// Runtime with no grammars and no themes. Classification through it
    /// produces empty batches; useful for headless shells and tests.
    pub fn empty() -> Self {
        Self {
            languages: HashMap::new(),
            themes: RwLock::new(HashMap::new()),
        }
    }

    /// Grammar support for one language, if registered.
    pub fn language(&self, id: LanguageId) -> Option<&LanguageSupport> {
        self.languages.get(&id)
    }

    /// Register or replace a theme. Mount hooks use this to install
    /// shell themes before first paint.
    pub fn define_theme(&self, id: &str, theme: Theme) {
        self.themes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), theme);
    }

    /// Theme by id.
    pub fn theme(&self, id: &str) -> Option<Theme> {
        self.themes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// All registered theme ids, sorted.
    pub fn theme_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .themes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
