//! Configuration management for the scoring and chart tools
//!
//! Loads settings from TOML files; every field has a default so an absent or
//! partial file is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::records::Condition;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub charts: ChartConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Interactive scoring settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Save after this many records are fully judged in one session
    #[serde(default = "default_checkpoint_interval")]
    pub checkpoint_interval: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: default_checkpoint_interval(),
        }
    }
}

impl ScoringConfig {
    pub fn interval(&self) -> usize {
        self.checkpoint_interval.max(1)
    }
}

/// Chart dimensions and palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Width of the per-prompt trend charts
    #[serde(default = "default_trend_width")]
    pub trend_width: u32,
    #[serde(default = "default_bar_opacity")]
    pub bar_opacity: f64,
    #[serde(default = "default_with_tools_color")]
    pub with_tools_color: String,
    #[serde(default = "default_without_tools_color")]
    pub without_tools_color: String,
    /// With/correct, with/wrong, without/correct, without/wrong
    #[serde(default = "default_correctness_palette")]
    pub correctness_palette: [String; 4],
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            trend_width: default_trend_width(),
            bar_opacity: default_bar_opacity(),
            with_tools_color: default_with_tools_color(),
            without_tools_color: default_without_tools_color(),
            correctness_palette: default_correctness_palette(),
        }
    }
}

impl ChartConfig {
    pub fn color(&self, condition: Condition) -> &str {
        match condition {
            Condition::WithTools => &self.with_tools_color,
            Condition::WithoutTools => &self.without_tools_color,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub default_dir: String,
    #[serde(default = "default_true")]
    pub write_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_dir: default_output_dir(),
            write_summary: true,
        }
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_checkpoint_interval() -> usize { 5 }
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 500 }
fn default_trend_width() -> u32 { 1200 }
fn default_bar_opacity() -> f64 { 0.8 }
fn default_with_tools_color() -> String { "#3498db".to_string() }
fn default_without_tools_color() -> String { "#e74c3c".to_string() }
fn default_output_dir() -> String { "output".to_string() }
fn default_correctness_palette() -> [String; 4] {
    [
        "#27ae60".to_string(),
        "#3498db".to_string(),
        "#f39c12".to_string(),
        "#e74c3c".to_string(),
    ]
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = ["toolbench.toml", "config/toolbench.toml"];

        for path in &config_paths {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path);
                    return config;
                }
                Err(e) => tracing::warn!("Ignoring {}: {}", path, e),
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Load an explicit file when given, otherwise fall back to the defaults lookup
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                let config = Self::from_file(path)?;
                tracing::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::load_or_default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scoring.checkpoint_interval, 5);
        assert_eq!(config.output.default_dir, "output");
        assert_eq!(config.charts.color(Condition::WithTools), "#3498db");
        assert_eq!(config.charts.color(Condition::WithoutTools), "#e74c3c");
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r##"
[scoring]
checkpoint_interval = 3

[charts]
with_tools_color = "#000000"
"##;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.scoring.checkpoint_interval, 3);
        assert_eq!(config.charts.with_tools_color, "#000000");
        assert_eq!(config.charts.without_tools_color, "#e74c3c");
        assert_eq!(config.charts.width, 800);
        assert!(config.output.write_summary);
    }

    #[test]
    fn test_zero_interval_clamped() {
        let config = Config::from_toml("[scoring]\ncheckpoint_interval = 0\n").unwrap();
        assert_eq!(config.scoring.interval(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("[scoring]\ncheckpoint_interval = \"many\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toolbench.toml");
        fs::write(&path, "[charts]\nheight = 640\n\n[output]\nwrite_summary = false\n").unwrap();

        let config = Config::resolve(Some(&path)).unwrap();
        assert_eq!(config.charts.height, 640);
        assert!(!config.output.write_summary);

        let missing = dir.path().join("absent.toml");
        assert!(matches!(Config::resolve(Some(&missing)), Err(ConfigError::Io(_))));
    }
}
