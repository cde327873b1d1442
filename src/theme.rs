//! Theme system for the host
//!
//! Provides YAML-based theming with compile-time embedded themes and
//! user-defined themes from the config directory. Themes map
//! classification kinds to styles, so a decoration's class resolves to a
//! concrete color in whichever shell renders it.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/berth/themes/{id}.yaml`
//! 2. Embedded: built-in themes compiled into the binary

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

// Embed theme YAML files at compile time
pub const DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const LIGHT_YAML: &str = include_str!("../themes/light.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "dark", "light")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "dark",
        yaml: DARK_YAML,
    },
    BuiltinTheme {
        id: "light",
        yaml: LIGHT_YAML,
    },
];

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        match s.len() {
            6 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: 255,
            }),
            8 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: u8::from_str_radix(&s[6..8], 16).map_err(|e| e.to_string())?,
            }),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

/// Resolved style for one classification kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
struct ThemeData {
    #[allow(dead_code)]
    version: u32,
    name: String,
    #[serde(default)]
    #[allow(dead_code)]
    author: Option<String>,
    colors: ColorsData,
    #[serde(default)]
    classifications: HashMap<String, StyleData>,
}

#[derive(Debug, Clone, Deserialize)]
struct ColorsData {
    background: String,
    foreground: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StyleData {
    color: String,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
}

/// A resolved theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub foreground: Color,
    classifications: HashMap<String, Style>,
}

impl Theme {
    /// Parse and resolve a theme from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse theme: {}", e))?;

        let background = Color::from_hex(&data.colors.background)?;
        let foreground = Color::from_hex(&data.colors.foreground)?;

        let mut classifications = HashMap::new();
        for (kind, style) in data.classifications {
            classifications.insert(
                kind,
                Style {
                    color: Color::from_hex(&style.color)?,
                    bold: style.bold,
                    italic: style.italic,
                },
            );
        }

        Ok(Self {
            name: data.name,
            background,
            foreground,
            classifications,
        })
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        BUILTIN_THEMES
            .iter()
            .find(|builtin| builtin.id == id)
            .map(|builtin| Self::from_yaml(builtin.yaml))
            .unwrap_or_else(|| Err(format!("Unknown builtin theme: {}", id)))
    }

    /// Style for a classification kind. Kinds the theme does not mention
    /// render in the plain foreground.
    pub fn style_for(&self, kind: &str) -> Style {
        self.classifications
            .get(kind)
            .copied()
            .unwrap_or(Style {
                color: self.foreground,
                bold: false,
                italic: false,
            })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_yaml(DARK_YAML).unwrap_or_else(|_| Self {
            name: "Fallback".to_string(),
            background: Color::rgb(30, 30, 30),
            foreground: Color::rgb(212, 212, 212),
            classifications: HashMap::new(),
        })
    }
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load all user themes from the config themes directory.
///
/// Files that fail to parse are skipped with a warning so one bad theme
/// cannot block the runtime load.
pub fn load_user_themes() -> Vec<(String, Theme)> {
    let Some(dir) = crate::config_paths::themes_dir() else {
        return Vec::new();
    };
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut themes = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml")
        {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        match from_file(&path) {
            Ok(theme) => {
                tracing::info!("Loaded user theme '{}' from {}", id, path.display());
                themes.push((id.to_string(), theme));
            }
            Err(e) => {
                tracing::warn!("Skipping user theme {}: {}", path.display(), e);
            }
        }
    }
    themes
}
