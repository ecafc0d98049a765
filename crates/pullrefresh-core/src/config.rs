use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub pull: PullConfig,
    #[serde(default)]
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Per-mount controller configuration.
///
/// Read-only to the controller once mounted; call [`PullConfig::validate`]
/// (or construct a `PullController`, which does it for you) before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullConfig {
    /// Distance at which a release triggers a refresh
    #[serde(default = "default_pull_threshold")]
    pub pull_threshold: f64,
    /// Hard clamp for the resistance-adjusted pull distance
    #[serde(default = "default_max_pull_distance")]
    pub max_pull_distance: f64,
    /// Duration of the return-to-rest animations in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Whether gestures are accepted at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Easing applied to the return-to-rest animations
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            pull_threshold: default_pull_threshold(),
            max_pull_distance: default_max_pull_distance(),
            animation_duration_ms: default_animation_duration(),
            enabled: default_true(),
            easing: EasingType::default(),
        }
    }
}

impl PullConfig {
    /// Create a config with the given threshold and max distance, other fields default
    pub fn with_thresholds(pull_threshold: f64, max_pull_distance: f64) -> Self {
        Self {
            pull_threshold,
            max_pull_distance,
            ..Default::default()
        }
    }

    /// Reject configurations the controller cannot honor.
    ///
    /// Nothing is clamped: a bad threshold is a mounting error.
    pub fn validate(&self) -> Result<()> {
        if !self.pull_threshold.is_finite() || self.pull_threshold <= 0.0 {
            return Err(Error::InvalidThreshold(self.pull_threshold));
        }
        if !self.max_pull_distance.is_finite() || self.max_pull_distance < self.pull_threshold {
            return Err(Error::InvalidMaxPull {
                max: self.max_pull_distance,
                threshold: self.pull_threshold,
            });
        }
        if self.animation_duration_ms > MAX_ANIMATION_DURATION_MS {
            return Err(Error::InvalidDuration(format!(
                "{}ms exceeds the {}ms limit",
                self.animation_duration_ms, MAX_ANIMATION_DURATION_MS
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

const MAX_ANIMATION_DURATION_MS: u64 = 10_000;

/// Easing function type for the settle animations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// No animation (instant jump)
    None,
    /// Linear interpolation
    Linear,
    /// Cubic ease-out
    #[default]
    Cubic,
}

/// How the indicator is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorStyle {
    /// Built-in spinner driven by the derived rotation/scale transform
    #[default]
    Default,
    /// Caller-drawn indicator that receives the raw progress value
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default)]
    pub style: IndicatorStyle,
    /// Hex color string (e.g., "#fabd2f" or "fabd2f")
    #[serde(default)]
    pub color: Option<String>,
    /// Indicator size in terminal cells
    #[serde(default)]
    pub size: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds when nothing is animating
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Content units covered by one terminal row of mouse drag
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Pull distance added per keyboard pull step
    #[serde(default = "default_key_pull_step")]
    pub key_pull_step: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            row_height: default_row_height(),
            key_pull_step: default_key_pull_step(),
        }
    }
}

impl UiConfig {
    /// Tick duration used while animating
    pub fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }
}

/// Parameters of the demo refresh action used by the TUI and the simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Simulated refresh latency
    #[serde(default = "default_refresh_delay")]
    pub refresh_delay_ms: u64,
    /// Every Nth refresh fails (0 = never)
    #[serde(default)]
    pub fail_every: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: default_refresh_delay(),
            fail_every: 0,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pullrefresh")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_pull_threshold() -> f64 {
    80.0
}

fn default_max_pull_distance() -> f64 {
    160.0
}

fn default_animation_duration() -> u64 {
    300
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_row_height() -> f64 {
    10.0
}

fn default_key_pull_step() -> f64 {
    20.0
}

fn default_refresh_delay() -> u64 {
    1500
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.pull.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pullrefresh/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pullrefresh")
            .join("config.toml")
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("pullrefresh.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
