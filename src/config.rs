//! Host configuration
//!
//! `HostConfig` is the per-activation configuration a shell hands to
//! `EditorHost::activate`. `ShellConfig` is the small preference file that
//! persists across sessions in `~/.config/berth/config.yaml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::syntax::LanguageId;
use crate::widget::WidgetOptions;

/// Delay between mount and the one initial classification request.
pub const INITIAL_HIGHLIGHT_DELAY: Duration = Duration::from_millis(500);

/// Per-activation host configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Theme id resolved against the runtime registry
    pub theme: String,
    /// Language tag applied to the document model
    pub language: LanguageId,
    /// Worker routing key. The classification grammar follows this
    /// title's extension, not the `language` tag.
    pub title: String,
    /// Content pushed at mount. External origin: no change notification.
    pub value: Option<String>,
    /// Widget creation options, merged over defaults on first creation
    /// only. Later activations never re-apply them.
    pub options: WidgetOptions,
    /// Delay before the initial classification request after mount
    pub initial_highlight_delay: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            language: LanguageId::JavaScript,
            title: "untitled.js".to_string(),
            value: None,
            options: WidgetOptions::new(),
            initial_highlight_delay: INITIAL_HIGHLIGHT_DELAY,
        }
    }
}

/// Shell preferences that persist across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Selected theme id (e.g., "dark", "light")
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

impl ShellConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the preferences to disk, creating the config directory on
    /// the way if this is the first write.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        crate::config_paths::ensure_config_dir()?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Point the saved preference at `theme_id` and write it out.
    pub fn set_theme(&mut self, theme_id: &str) -> Result<(), String> {
        self.theme = theme_id.to_string();
        self.save()
    }
}
