use anyhow::{Context, Result};
use glimmer_gradient_lib::AnimationConfig;
use log::{debug, info, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Configurable log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    #[must_use]
    pub const fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!("unknown log level {s:?}")),
        }
    }
}

/// Settings for an animator process, stored as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl AnimatorConfig {
    /// Reset invalid values to their defaults, one field at a time
    pub fn validate(&mut self) {
        let defaults = AnimationConfig::default();
        let animation = &mut self.animation;
        if animation.colors.is_empty() {
            warn!("Palette is empty, resetting to default colors");
            animation.colors = defaults.colors;
        }
        if animation.simultaneous_colors == 0
            || animation.simultaneous_colors > animation.colors.len()
        {
            let fixed = defaults.simultaneous_colors.min(animation.colors.len());
            warn!(
                "simultaneous_colors {} does not fit a palette of {}, using {fixed}",
                animation.simultaneous_colors,
                animation.colors.len()
            );
            animation.simultaneous_colors = fixed;
        }
        if animation.cycle_duration_ms == 0 {
            warn!("cycle_duration_ms is zero, resetting to {}", defaults.cycle_duration_ms);
            animation.cycle_duration_ms = defaults.cycle_duration_ms;
        }
        if animation.target_fps == 0 {
            warn!("target_fps is zero, resetting to {}", defaults.target_fps);
            animation.target_fps = defaults.target_fps;
        }
    }

    /// Read a config file, repairing invalid fields.
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let json = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        debug!("Config file size: {} bytes", json.len());
        let mut config: Self = serde_json::from_slice(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate();
        debug!(
            "Config parsed: log_level={:?}, colors={}, simultaneous={}",
            config.log_level,
            config.animation.colors.len(),
            config.animation.simultaneous_colors
        );
        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load config: {e:#}, using defaults");
                Self::default()
            }
        }
    }

    /// # Errors
    /// Fails if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!("Saving config to {}", path.display());
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Config saved to {}", path.display());
        Ok(())
    }
}
