//! Selection strategy boundary.

use crate::core::Result;
use crate::registry::Anchor;
use crate::wire::WireParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A candidate anchor proposed by a selection strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Chosen anchor mnemonic
    pub mnemonic: String,
    /// Extracted parameters, in a stable order
    pub params: WireParams,
    /// Confidence in the choice (0.0 - 1.0)
    pub confidence: f64,
    /// Free-text justification, passed through unmodified
    pub reasoning: Option<String>,
}

impl Selection {
    /// Create a selection without reasoning.
    pub fn new(mnemonic: &str, params: WireParams, confidence: f64) -> Self {
        Self {
            mnemonic: mnemonic.to_string(),
            params,
            confidence,
            reasoning: None,
        }
    }

    /// Attach a justification string.
    pub fn with_reasoning(mut self, reasoning: &str) -> Self {
        self.reasoning = Some(reasoning.to_string());
        self
    }
}

/// Chooses the best-fitting anchor for a message.
///
/// Returning `Ok(None)` means no anchor fits. Errors mean the strategy itself
/// was unavailable; the quantizer recovers from both.
#[async_trait]
pub trait SelectionStrategy: Send + Sync {
    async fn select(
        &self,
        message: &str,
        src: &str,
        dst: &str,
        anchors: &[Anchor],
    ) -> Result<Option<Selection>>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
