//! Quantizer.
//!
//! Maps a verbose message onto the best-fitting registered anchor, or signals
//! a fallback. Fallback is an ordinary outcome; `quantize` never fails.

use crate::config::QuantizerConfig;
use crate::core::{AgentMessage, Error, Result};
use crate::quantizer::strategy::{Selection, SelectionStrategy};
use crate::registry::AnchorRegistry;
use crate::wire::{WireCodec, WireParams};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// A successfully quantized message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuantizationResult {
    anchor: String,
    params: WireParams,
    wire: String,
    selection_confidence: Option<f64>,
    reasoning: Option<String>,
}

impl QuantizationResult {
    /// Build a result, deriving the wire through the codec.
    pub fn new(anchor: &str, params: WireParams, selection_confidence: Option<f64>) -> Result<Self> {
        let wire = WireCodec::encode(anchor, &params)?;
        Ok(Self {
            anchor: anchor.to_string(),
            params,
            wire,
            selection_confidence,
            reasoning: None,
        })
    }

    fn from_selection(selection: Selection) -> Result<Self> {
        let mut result = Self::new(&selection.mnemonic, selection.params, Some(selection.confidence))?;
        result.reasoning = selection.reasoning;
        Ok(result)
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn params(&self) -> &WireParams {
        &self.params
    }

    pub fn wire(&self) -> &str {
        &self.wire
    }

    pub fn selection_confidence(&self) -> Option<f64> {
        self.selection_confidence
    }

    /// Justification supplied by the selection strategy, unmodified.
    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }
}

/// Why a message could not be quantized.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The strategy found no fitting anchor
    NoSelection,
    /// The strategy (and any backup) failed or timed out
    SelectionUnavailable { detail: String },
    /// The strategy named a mnemonic the registry does not hold
    UnknownAnchor { mnemonic: String },
    /// Confidence fell below the acceptance threshold
    LowConfidence { confidence: f64 },
    /// The selection could not be encoded
    Unencodable { detail: String },
}

/// Signal that a message must travel uncompressed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Fallback {
    pub message: AgentMessage,
    pub reason: FallbackReason,
}

/// Outcome of quantizing one message.
#[derive(Clone, Debug, PartialEq)]
pub enum Quantization {
    Quantized(QuantizationResult),
    Fallback(Fallback),
}

impl Quantization {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Quantization::Fallback(_))
    }

    pub fn result(&self) -> Option<&QuantizationResult> {
        match self {
            Quantization::Quantized(result) => Some(result),
            Quantization::Fallback(_) => None,
        }
    }
}

/// Orchestrates anchor selection against a registry.
pub struct Quantizer {
    primary: Arc<dyn SelectionStrategy>,
    backup: Option<Arc<dyn SelectionStrategy>>,
    acceptance_threshold: f64,
    timeout: Duration,
}

impl Quantizer {
    /// Create a quantizer with default threshold and timeout.
    pub fn new(strategy: Arc<dyn SelectionStrategy>) -> Self {
        let defaults = QuantizerConfig::default();
        Self {
            primary: strategy,
            backup: None,
            acceptance_threshold: defaults.acceptance_threshold,
            timeout: defaults.selection_timeout(),
        }
    }

    /// Strategy consulted only when the primary fails or times out.
    pub fn with_backup(mut self, backup: Arc<dyn SelectionStrategy>) -> Self {
        self.backup = Some(backup);
        self
    }

    /// Set the acceptance threshold, clamped to `[0, 1]`. Non-finite values are ignored.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        if threshold.is_finite() {
            self.acceptance_threshold = threshold.clamp(0.0, 1.0);
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn acceptance_threshold(&self) -> f64 {
        self.acceptance_threshold
    }

    /// Quantize a message against a registry snapshot.
    pub async fn quantize(&self, message: &AgentMessage, registry: &AnchorRegistry) -> Quantization {
        let selection = match self.select_bounded(self.primary.as_ref(), message, registry).await {
            Ok(selection) => selection,
            Err(err) => {
                tracing::warn!(strategy = self.primary.name(), error = %err, "selection unavailable");
                match &self.backup {
                    Some(backup) => match self.select_bounded(backup.as_ref(), message, registry).await {
                        Ok(selection) => selection,
                        Err(backup_err) => {
                            tracing::warn!(strategy = backup.name(), error = %backup_err, "backup selection unavailable");
                            return fallback(message, FallbackReason::SelectionUnavailable {
                                detail: backup_err.to_string(),
                            });
                        }
                    },
                    None => {
                        return fallback(message, FallbackReason::SelectionUnavailable {
                            detail: err.to_string(),
                        })
                    }
                }
            }
        };

        let Some(selection) = selection else {
            return fallback(message, FallbackReason::NoSelection);
        };
        if !registry.contains(&selection.mnemonic) {
            return fallback(message, FallbackReason::UnknownAnchor {
                mnemonic: selection.mnemonic,
            });
        }
        if !selection.confidence.is_finite() || selection.confidence < self.acceptance_threshold {
            return fallback(message, FallbackReason::LowConfidence {
                confidence: selection.confidence,
            });
        }

        match QuantizationResult::from_selection(selection) {
            Ok(result) => {
                tracing::debug!(src = %message.src, dst = %message.dst, wire = result.wire(), "quantized");
                Quantization::Quantized(result)
            }
            Err(err) => {
                tracing::warn!(error = %err, "selection could not be encoded");
                fallback(message, FallbackReason::Unencodable {
                    detail: err.to_string(),
                })
            }
        }
    }

    async fn select_bounded(
        &self,
        strategy: &dyn SelectionStrategy,
        message: &AgentMessage,
        registry: &AnchorRegistry,
    ) -> Result<Option<Selection>> {
        let call = strategy.select(&message.text, &message.src, &message.dst, registry.all());
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(|e| match e {
                Error::SelectionUnavailable(_) => e,
                other => Error::SelectionUnavailable(other.to_string()),
            }),
            Err(_) => Err(Error::SelectionUnavailable(format!(
                "{} timed out after {:?}",
                strategy.name(),
                self.timeout
            ))),
        }
    }
}

fn fallback(message: &AgentMessage, reason: FallbackReason) -> Quantization {
    tracing::debug!(src = %message.src, dst = %message.dst, ?reason, "fallback");
    Quantization::Fallback(Fallback {
        message: message.clone(),
        reason,
    })
}
