//! Application settings

use std::path::PathBuf;

use cap_protocol::{DecodeMode, DEFAULT_ARG_COLUMNS};
use serde::{Deserialize, Serialize};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// How strictly frames are checked
    #[serde(default)]
    pub decode_mode: DecodeMode,
    /// Place the table on the clipboard after decoding
    #[serde(default = "default_true")]
    pub copy_to_clipboard: bool,
    /// Print the table to stdout
    #[serde(default = "default_true")]
    pub print_table: bool,
    /// Minimum number of argument columns in the header
    #[serde(default = "default_arg_columns")]
    pub min_arg_columns: usize,
}

fn default_true() -> bool {
    true
}

fn default_arg_columns() -> usize {
    DEFAULT_ARG_COLUMNS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decode_mode: DecodeMode::Strict,
            copy_to_clipboard: true,
            print_table: true,
            min_arg_columns: DEFAULT_ARG_COLUMNS,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for capextract
    /// Uses $XDG_CONFIG_HOME/capextract on Linux/macOS, falls back to ~/.config/capextract
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("capextract"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("capextract"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable settings in {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<PathBuf, String> {
        let path =
            Self::settings_path().ok_or_else(|| "Could not determine settings path".to_string())?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, json).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }
}
