/// View configuration: load, save, merge, and sanitize.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::options::EditorOptions;
use crate::theme::{builtin_dark, builtin_light, ColorStyle};

/// Top-level configuration file for a text view host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub current_style: String,
    pub options: EditorOptions,
    pub styles: Vec<ColorStyle>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            current_style: "Dark".to_string(),
            options: EditorOptions::default(),
            styles: vec![builtin_dark(), builtin_light()],
        }
    }
}

impl ViewConfig {
    /// Returns the default config file path: `<config dir>/textview/textview.json`.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("textview").join("textview.json"))
            .unwrap_or_else(|| PathBuf::from("textview.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (unreadable file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<ViewConfig>(&contents) {
                    Ok(mut config) => {
                        config.with_builtins_merged();
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Broken file is left untouched
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e:#}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }

    /// Ensures built-in Dark and Light styles are always present.
    /// User styles with matching names take priority over built-ins.
    pub fn with_builtins_merged(&mut self) {
        if !self.styles.iter().any(|s| s.name == "Dark") {
            self.styles.insert(0, builtin_dark());
        }
        if !self.styles.iter().any(|s| s.name == "Light") {
            let at = 1.min(self.styles.len());
            self.styles.insert(at, builtin_light());
        }
    }

    pub fn find_style(&self, name: &str) -> Option<&ColorStyle> {
        self.styles.iter().find(|s| s.name == name)
    }

    /// The style named by `current_style`, falling back to the built-in dark style.
    pub fn active_style(&self) -> ColorStyle {
        self.find_style(&self.current_style)
            .cloned()
            .unwrap_or_else(builtin_dark)
    }

    pub fn style_names(&self) -> Vec<&str> {
        self.styles.iter().map(|s| s.name.as_str()).collect()
    }

    /// Clamps option values and resets an unknown current style.
    pub fn sanitize(&mut self) {
        self.options.sanitize();
        if self.find_style(&self.current_style).is_none() {
            tracing::debug!("Unknown style {:?}, using Dark", self.current_style);
            self.current_style = "Dark".to_string();
        }
    }
}
