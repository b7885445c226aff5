//! Application configuration, loaded from `sprig.toml`.
//!
//! Every section is optional; missing keys fall back to their defaults.
//! Environment variables override file values at load time.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::view::{OverflowPolicy, WindowOptions};

pub const DEFAULT_CONFIG_FILE: &str = "sprig.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    pub app: AppConfig,
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub text: TextConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tear the application down once its last window closes.
    pub quit_on_last_window_closed: bool,
}

/// Defaults for windows opened without explicit options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LayoutConfig {
    pub overflow: OverflowPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Root font size in pixels, inherited by every text node.
    pub font_size: f32,
    /// Root line height as a multiple of the font size.
    pub line_height: f32,
    /// Measure text with real font shaping instead of the fixed-advance estimate.
    pub shaped: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quit_on_last_window_closed: true,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "sprig".to_string(),
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            line_height: 1.2,
            shaped: false,
        }
    }
}

impl WindowConfig {
    pub fn window_options(&self) -> WindowOptions {
        WindowOptions::new(self.title.clone()).with_size(self.width, self.height)
    }
}

impl UiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads `sprig.toml` from the working directory, or the defaults if it
    /// is missing or unreadable.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(err) => {
                debug!(%err, "using default configuration");
                Self::default()
            }
        }
    }

    /// Applies `SPRIG_*` environment overrides.
    pub fn merge_with_env(&mut self) {
        self.merge_with_vars(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary variable lookup. Unparseable values
    /// are ignored.
    pub fn merge_with_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SPRIG_OVERFLOW") {
            match val.to_ascii_lowercase().as_str() {
                "shrink" => self.layout.overflow = OverflowPolicy::Shrink,
                "clip" => self.layout.overflow = OverflowPolicy::Clip,
                other => debug!(value = other, "ignoring unknown SPRIG_OVERFLOW"),
            }
        }
        if let Some(val) = var("SPRIG_SHAPED_TEXT") {
            self.text.shaped = parse_flag(&val);
        }
        if let Some(val) = var("SPRIG_QUIT_ON_LAST_WINDOW") {
            self.app.quit_on_last_window_closed = parse_flag(&val);
        }
    }

    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::UiConfig;
    use crate::error::ConfigError;
    use crate::view::OverflowPolicy;

    #[test]
    fn default_config() {
        let config = UiConfig::default();
        assert!(config.app.quit_on_last_window_closed);
        assert_eq!(config.layout.overflow, OverflowPolicy::Shrink);
        assert_eq!(config.text.font_size, 16.0);
        assert!(!config.text.shaped);
    }

    #[test]
    fn toml_round_trip_keeps_values() {
        let mut config = UiConfig::default();
        config.layout.overflow = OverflowPolicy::Clip;
        config.window.title = "notes".to_string();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: UiConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\noverflow = \"clip\"\n\n[window]\nwidth = 320.0").unwrap();

        let config = UiConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.layout.overflow, OverflowPolicy::Clip);
        assert_eq!(config.window.width, 320.0);
        assert_eq!(config.window.height, 600.0);
        assert!(config.app.quit_on_last_window_closed);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = UiConfig::load_from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[text]\nfont_size = \"large\"").unwrap();
        let err = UiConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = UiConfig::default();
        config.merge_with_vars(|key| match key {
            "SPRIG_OVERFLOW" => Some("CLIP".to_string()),
            "SPRIG_SHAPED_TEXT" => Some("1".to_string()),
            "SPRIG_QUIT_ON_LAST_WINDOW" => Some("false".to_string()),
            _ => None,
        });
        assert_eq!(config.layout.overflow, OverflowPolicy::Clip);
        assert!(config.text.shaped);
        assert!(!config.app.quit_on_last_window_closed);
    }

    #[test]
    fn unknown_overflow_value_is_ignored() {
        let mut config = UiConfig::default();
        config.merge_with_vars(|key| (key == "SPRIG_OVERFLOW").then(|| "wrap".to_string()));
        assert_eq!(config.layout.overflow, OverflowPolicy::Shrink);
    }
}
