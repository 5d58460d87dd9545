//! Engine settings
//!
//! Serde-backed configuration, loadable from a JSON file and registered as
//! a plain resource so plugins can consult it at build time.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub window: WindowSettings,
    pub graphics: GraphicsSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    /// RGBA clear color used when no render node overrides it.
    pub clear_color: [f32; 4],
    /// Frames to run in demo mode before exiting. Zero means run until the
    /// window asks to close.
    pub frame_cap: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Ember".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            clear_color: [0.05, 0.05, 0.08, 1.0],
            frame_cap: 0,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.window.width, 1280);
        assert!(settings.window.vsync);
        assert_eq!(settings.graphics.frame_cap, 0);
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let mut settings = Settings::default();
        settings.window.title = "Round Trip".to_string();
        settings.graphics.frame_cap = 120;

        let raw = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.window.title, "Round Trip");
        assert_eq!(parsed.graphics.frame_cap, 120);
    }
}
