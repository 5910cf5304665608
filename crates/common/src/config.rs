//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HuddleError, HuddleResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Renderer selection and frame validation settings.
    pub render: RenderConfig,

    /// Event bridge settings.
    pub events: EventConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Which renderer family to use when the client is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderPreference {
    /// Probe for an accelerated context and fall back to software.
    #[default]
    Auto,
    /// Prefer the accelerated backend; still falls back if the probe fails.
    Accelerated,
    /// Always use the software backend.
    Software,
}

impl std::str::FromStr for RenderPreference {
    type Err = HuddleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "accelerated" | "webgl" | "gpu" => Ok(Self::Accelerated),
            "software" | "cpu" => Ok(Self::Software),
            other => Err(HuddleError::config(format!(
                "Unknown render preference '{other}' (expected auto|accelerated|software)"
            ))),
        }
    }
}

/// Renderer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Renderer family selection at construction time.
    pub mode: RenderPreference,

    /// Reject frames whose y/u/v plane is exactly one header long (20 bytes).
    pub reject_sentinel_planes: bool,
}

/// Event bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Maximum number of queued tasks handled by one `drain()` call.
    /// Zero drains until the queue is empty.
    pub drain_budget: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "huddle_session=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderPreference::Auto,
            reject_sentinel_planes: true,
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { drain_budget: 0 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], errors are returned.
    pub fn load_from(path: &Path) -> HuddleResult<Self> {
        if !path.exists() {
            return Err(HuddleError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("huddle").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "render": { "mode": "software" } }"#).unwrap();
        assert_eq!(config.render.mode, RenderPreference::Software);
        assert!(config.render.reject_sentinel_planes);
        assert_eq!(config.events.drain_budget, 0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn render_preference_parses_aliases() {
        assert_eq!("GPU".parse::<RenderPreference>().unwrap(), RenderPreference::Accelerated);
        assert_eq!("cpu".parse::<RenderPreference>().unwrap(), RenderPreference::Software);
        assert!("vulkan".parse::<RenderPreference>().is_err());
    }

    #[test]
    fn load_from_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("huddle_missing_config.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(HuddleError::FileNotFound { .. })
        ));
    }

    #[test]
    fn load_from_round_trips_saved_json() {
        let path = std::env::temp_dir().join("huddle_test_config.json");
        let mut config = AppConfig::default();
        config.events.drain_budget = 32;
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.events.drain_budget, 32);

        std::fs::remove_file(&path).ok();
    }
}
