//! Configuration schema.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Which implementation backs a pluggable strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Deterministic, offline keyword matching
    #[default]
    Keyword,
    /// Delegated to the external inference service
    Inference,
}

impl std::str::FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "rules" => Ok(StrategyKind::Keyword),
            "inference" | "gemini" => Ok(StrategyKind::Inference),
            other => Err(Error::InvalidConfig(format!("unknown strategy: {other}"))),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Keyword => write!(f, "keyword"),
            StrategyKind::Inference => write!(f, "inference"),
        }
    }
}

/// Quantizer settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizerConfig {
    /// Selection strategy
    pub strategy: StrategyKind,
    /// Minimum confidence for a selection to be accepted
    pub acceptance_threshold: f64,
    /// Bound on a single selection call
    pub selection_timeout_ms: u64,
    /// Consult the keyword strategy when inference fails or times out
    pub backup_to_keyword: bool,
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Keyword,
            acceptance_threshold: 0.5,
            selection_timeout_ms: 8_000,
            backup_to_keyword: true,
        }
    }
}

impl QuantizerConfig {
    pub fn selection_timeout(&self) -> Duration {
        Duration::from_millis(self.selection_timeout_ms)
    }
}

/// Autotuner settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AutotunerConfig {
    /// Suggestion strategy
    pub strategy: StrategyKind,
    /// Bound on a single suggestion call
    pub suggestion_timeout_ms: u64,
}

impl Default for AutotunerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Keyword,
            suggestion_timeout_ms: 8_000,
        }
    }
}

impl AutotunerConfig {
    pub fn suggestion_timeout(&self) -> Duration {
        Duration::from_millis(self.suggestion_timeout_ms)
    }
}

/// Inference service settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub model: String,
    pub endpoint: String,
    /// Falls back to `GEMINI_API_KEY` then `GOOGLE_API_KEY`
    pub api_key: Option<String>,
    pub temperature: f64,
    pub top_p: f64,
    pub max_output_tokens: u32,
    pub request_timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            temperature: 0.1,
            top_p: 0.95,
            max_output_tokens: 512,
            request_timeout_secs: 30,
        }
    }
}

/// Control plane settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Events retained for history sync
    pub history_capacity: usize,
    /// Broadcast channel capacity per subscriber
    pub event_buffer: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            event_buffer: 256,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `slipstream=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlipstreamConfig {
    pub quantizer: QuantizerConfig,
    pub autotuner: AutotunerConfig,
    pub inference: InferenceConfig,
    pub control: ControlConfig,
    pub logging: LoggingConfig,
}

impl SlipstreamConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: SlipstreamConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: SlipstreamConfig = toml::from_str(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::SerializationError(e.to_string()))
    }

    /// Apply `SLIPSTREAM_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(kind) = env_value("SLIPSTREAM_QUANTIZER_STRATEGY")
            .and_then(|v| v.parse::<StrategyKind>().ok())
        {
            self.quantizer.strategy = kind;
        }
        if let Some(kind) = env_value("SLIPSTREAM_AUTOTUNER_STRATEGY")
            .and_then(|v| v.parse::<StrategyKind>().ok())
        {
            self.autotuner.strategy = kind;
        }
        if let Some(threshold) = env_value("SLIPSTREAM_ACCEPTANCE_THRESHOLD")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|t| (0.0..=1.0).contains(t))
        {
            self.quantizer.acceptance_threshold = threshold;
        }
        if let Some(model) = env_value("SLIPSTREAM_MODEL") {
            self.inference.model = model;
        }
        if let Some(level) = env_value("SLIPSTREAM_LOG") {
            self.logging.level = level;
        }
    }

    /// Reject settings the runtime cannot honor.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.quantizer.acceptance_threshold) {
            return Err(Error::InvalidConfig(format!(
                "acceptance_threshold must be within [0, 1], got {}",
                self.quantizer.acceptance_threshold
            )));
        }
        if self.quantizer.selection_timeout_ms == 0 || self.autotuner.suggestion_timeout_ms == 0 {
            return Err(Error::InvalidConfig("timeouts must be non-zero".to_string()));
        }
        if self.control.history_capacity == 0 || self.control.event_buffer == 0 {
            return Err(Error::InvalidConfig(
                "history_capacity and event_buffer must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
