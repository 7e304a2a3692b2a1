//! Token-savings accounting.

use crate::core::{word_count, AgentMessage};
use serde::{Deserialize, Serialize};

/// Baseline token policy: the whitespace word count of the natural-language
/// message, unless the message carries an explicit baseline count.
pub const ORIGINAL_TOKEN_POLICY: &str = "whitespace word count of the message text";

/// Token counts for one message and the savings they imply.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenMetrics {
    pub original_tokens: usize,
    pub compressed_tokens: usize,
    pub savings_pct: f64,
}

impl TokenMetrics {
    pub fn new(original_tokens: usize, compressed_tokens: usize) -> Self {
        Self {
            original_tokens,
            compressed_tokens,
            savings_pct: savings_pct(original_tokens, compressed_tokens),
        }
    }

    /// Meter a message against the form it travelled in.
    pub fn measure(message: &AgentMessage, transmitted: &str) -> Self {
        Self::new(baseline_tokens(message), word_count(transmitted))
    }

    /// Metrics for a message carried raw.
    pub fn uncompressed(message: &AgentMessage) -> Self {
        Self::new(baseline_tokens(message), word_count(&message.text))
    }

    pub fn tokens_saved(&self) -> usize {
        self.original_tokens.saturating_sub(self.compressed_tokens)
    }
}

pub fn baseline_tokens(message: &AgentMessage) -> usize {
    message
        .baseline_tokens
        .unwrap_or_else(|| word_count(&message.text))
}

/// Percentage saved, rounded to one decimal with ties to even. Never negative.
pub fn savings_pct(original: usize, compressed: usize) -> f64 {
    if compressed >= original {
        return 0.0;
    }
    let raw = (1.0 - compressed as f64 / original as f64) * 100.0;
    (raw * 10.0).round_ties_even() / 10.0
}
