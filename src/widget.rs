//! The embedded editor widget seam.
//!
//! The host drives whatever sits behind `EditorWidget`; it never assumes a
//! concrete editor. `TextWidget` is the built-in implementation: a rope
//! document model with a version counter, a language tag, and a decoration
//! store, and deliberately nothing else. Shells with a real editor wrap it
//! in this trait and hand a factory to the shared slot.

use ropey::Rope;

use crate::decorations::Decoration;
use crate::events::TextEdit;
use crate::syntax::{DocumentVersion, LanguageId};

/// Identity of a widget's re-parentable root surface. Containers hold one
/// of these, not the widget itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Opaque creation options, merged over widget defaults on first creation
/// and never touched again.
pub type WidgetOptions = serde_json::Map<String, serde_json::Value>;

/// Creation parameters the slot hands to its factory.
#[derive(Debug, Clone)]
pub struct CreateParams {
    pub surface: SurfaceId,
    pub value: String,
    pub language: LanguageId,
    pub theme: String,
    pub options: WidgetOptions,
}

/// What the host needs from an embedded editor widget.
pub trait EditorWidget {
    /// The widget's root surface, which containers attach and detach
    fn surface(&self) -> SurfaceId;

    /// Full document text
    fn text(&self) -> String;

    /// Current document version; bumps on every content mutation
    fn version(&self) -> DocumentVersion;

    /// Replace the entire content. Bumps the version.
    fn set_text(&mut self, text: &str) -> TextEdit;

    /// Splice `inserted` over `removed` chars at char offset `at`.
    /// Bumps the version.
    fn splice(&mut self, at: usize, removed: usize, inserted: &str) -> TextEdit;

    /// Retag the document language. Content and version stay untouched.
    fn set_language(&mut self, language: LanguageId);
    fn language(&self) -> LanguageId;

    /// Apply a theme by id.
    fn set_theme(&mut self, theme: &str);
    fn theme(&self) -> &str;

    /// Replace the whole decoration set. No diffing: the new set is the
    /// set.
    fn set_decorations(&mut self, decorations: Vec<Decoration>);
    fn decorations(&self) -> &[Decoration];

    /// Viewport layout in device pixels.
    fn layout(&mut self, width: u32, height: u32);
}

/// Built-in headless widget: a document model with no rendering and no
/// input handling.
pub struct TextWidget {
    surface: SurfaceId,
    buffer: Rope,
    version: DocumentVersion,
    language: LanguageId,
    theme: String,
    options: WidgetOptions,
    decorations: Vec<Decoration>,
    size: (u32, u32),
}

impl TextWidget {
    pub fn new(params: CreateParams) -> Self {
        let mut options = Self::default_options();
        // Caller options win over defaults, once, at creation
        for (key, value) in params.options {
            options.insert(key, value);
        }

        Self {
            surface: params.surface,
            buffer: Rope::from_str(&params.value),
            version: DocumentVersion::default(),
            language: params.language,
            theme: params.theme,
            options,
            decorations: Vec::new(),
            size: (0, 0),
        }
    }

    fn default_options() -> WidgetOptions {
        let mut options = WidgetOptions::new();
        options.insert("lineNumbers".to_string(), serde_json::Value::Bool(true));
        options.insert("readOnly".to_string(), serde_json::Value::Bool(false));
        options.insert("tabSize".to_string(), serde_json::Value::from(4));
        options
    }

    /// Effective options after the creation-time merge.
    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    /// Last applied viewport size.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl EditorWidget for TextWidget {
    fn surface(&self) -> SurfaceId {
        self.surface
    }

    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn version(&self) -> DocumentVersion {
        self.version
    }

    fn set_text(&mut self, text: &str) -> TextEdit {
        let removed = self.buffer.len_chars();
        self.buffer = Rope::from_str(text);
        self.version = self.version.next();
        TextEdit {
            start: 0,
            removed,
            inserted: self.buffer.len_chars(),
        }
    }

    fn splice(&mut self, at: usize, removed: usize, inserted: &str) -> TextEdit {
        let len = self.buffer.len_chars();
        let at = at.min(len);
        let removed = removed.min(len - at);

        self.buffer.remove(at..at + removed);
        self.buffer.insert(at, inserted);
        self.version = self.version.next();

        TextEdit {
            start: at,
            removed,
            inserted: inserted.chars().count(),
        }
    }

    fn set_language(&mut self, language: LanguageId) {
        self.language = language;
    }

    fn language(&self) -> LanguageId {
        self.language
    }

    fn set_theme(&mut self, theme: &str) {
        self.theme = theme.to_string();
    }

    fn theme(&self) -> &str {
        &self.theme
    }

    fn set_decorations(&mut self, decorations: Vec<Decoration>) {
        self.decorations = decorations;
    }

    fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    fn layout(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(value: &str) -> TextWidget {
        TextWidget::new(CreateParams {
            surface: SurfaceId(1),
            value: value.to_string(),
            language: LanguageId::JavaScript,
            theme: "dark".to_string(),
            options: WidgetOptions::new(),
        })
    }

    #[test]
    fn test_splice_edits_and_bumps_version() {
        let mut w = widget("let x=1;");
        assert_eq!(w.version(), DocumentVersion(0));

        let edit = w.splice(6, 1, "2");
        assert_eq!(w.text(), "let x=2;");
        assert_eq!(w.version(), DocumentVersion(1));
        assert_eq!(
            edit,
            TextEdit {
                start: 6,
                removed: 1,
                inserted: 1
            }
        );
    }

    #[test]
    fn test_splice_clamps_out_of_range() {
        let mut w = widget("abc");
        let edit = w.splice(100, 100, "!");
        assert_eq!(w.text(), "abc!");
        assert_eq!(
            edit,
            TextEdit {
                start: 3,
                removed: 0,
                inserted: 1
            }
        );
    }

    #[test]
    fn test_set_text_replaces_everything() {
        let mut w = widget("old");
        let edit = w.set_text("brand new");
        assert_eq!(w.text(), "brand new");
        assert_eq!(w.version(), DocumentVersion(1));
        assert_eq!(
            edit,
            TextEdit {
                start: 0,
                removed: 3,
                inserted: 9
            }
        );
    }

    #[test]
    fn test_language_retag_leaves_version_alone() {
        let mut w = widget("let x=1;");
        w.set_language(LanguageId::Rust);
        assert_eq!(w.language(), LanguageId::Rust);
        assert_eq!(w.version(), DocumentVersion(0));
        assert_eq!(w.text(), "let x=1;");
    }

    #[test]
    fn test_options_merge_over_defaults() {
        let mut options = WidgetOptions::new();
        options.insert("tabSize".to_string(), serde_json::Value::from(2));
        options.insert("minimap".to_string(), serde_json::Value::Bool(false));

        let w = TextWidget::new(CreateParams {
            surface: SurfaceId(1),
            value: String::new(),
            language: LanguageId::default(),
            theme: "dark".to_string(),
            options,
        });

        // Caller override, caller addition, untouched default
        assert_eq!(w.options()["tabSize"], 2);
        assert_eq!(w.options()["minimap"], false);
        assert_eq!(w.options()["lineNumbers"], true);
    }

    #[test]
    fn test_decorations_replace_wholesale() {
        use crate::decorations::Span;

        let mut w = widget("let x=1;");
        w.set_decorations(vec![Decoration {
            range: Span {
                start_line: 1,
                start: 1,
                end_line: 1,
                end: 4,
            },
            class: "Keyword".to_string(),
        }]);
        assert_eq!(w.decorations().len(), 1);

        w.set_decorations(Vec::new());
        assert!(w.decorations().is_empty());
    }
}
