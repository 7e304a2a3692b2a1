//! Configuration
//!
//! TOML-backed settings for the quantizer, autotuner, inference service,
//! control plane and logging, with environment overrides.

pub mod schema;

pub use schema::{
    AutotunerConfig, ControlConfig, InferenceConfig, LogFormat, LoggingConfig, QuantizerConfig,
    SlipstreamConfig, StrategyKind,
};
