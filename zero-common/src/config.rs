//! Configuration management for Zero tools.
//!
//! Zero tools share a configuration file at `~/.zero/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (ZERO_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `ZERO_LOG_LEVEL` → observability.log_level
//! - `ZERO_LOG_FORMAT` → observability.log_format
//! - `ZERO_VALUATION_TARGET_PER` → valuation.default_assumptions.target_per
//! - `ZERO_VALUATION_DISCOUNT_RATE` → valuation.default_assumptions.discount_rate
//! - `ZERO_VALUATION_PEG_RATIO` → valuation.default_assumptions.peg_ratio

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".zero"),
        |dirs| dirs.home_dir().join(".zero"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Observability
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Valuation
// ============================================================================

/// Fallback values for user-tunable valuation assumptions.
///
/// These fill in whatever a valuation request leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssumptionDefaults {
    /// Treasury share count
    #[serde(default)]
    pub treasury_shares: f64,

    /// Target P/E multiple
    #[serde(default = "default_target_per")]
    pub target_per: f64,

    /// Discount / required-return rate in percent
    #[serde(default = "default_discount_rate")]
    pub discount_rate: f64,

    /// PEG multiplier applied to the growth rate
    #[serde(default = "default_peg_ratio")]
    pub peg_ratio: f64,
}

impl Default for AssumptionDefaults {
    fn default() -> Self {
        Self {
            treasury_shares: 0.0,
            target_per: default_target_per(),
            discount_rate: default_discount_rate(),
            peg_ratio: default_peg_ratio(),
        }
    }
}

fn default_target_per() -> f64 {
    10.0
}

fn default_discount_rate() -> f64 {
    8.0
}

fn default_peg_ratio() -> f64 {
    1.0
}

/// Valuation section of the shared configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuationSettings {
    /// Defaults for assumptions a request omits
    #[serde(default)]
    pub default_assumptions: AssumptionDefaults,
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration structure for Zero tools.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// JSON Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Valuation engine configuration
    #[serde(default)]
    pub valuation: ValuationSettings,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Numeric values that fail to parse, or are not finite, are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("ZERO_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("ZERO_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        let number = |key: &str| {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };

        let defaults = &mut self.valuation.default_assumptions;
        if let Some(v) = number("ZERO_VALUATION_TARGET_PER") {
            defaults.target_per = v;
        }
        if let Some(v) = number("ZERO_VALUATION_DISCOUNT_RATE") {
            defaults.discount_rate = v;
        }
        if let Some(v) = number("ZERO_VALUATION_PEG_RATIO") {
            defaults.peg_ratio = v;
        }
    }

    /// Save configuration to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
