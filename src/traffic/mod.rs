//! Traffic Module
//!
//! Provides observability for quantized traffic:
//! - Keyword-rule classification (success, disagreement, recovery)
//! - Token-savings metrics
//! - Outbound event envelopes and inbound control commands

pub mod classifier;
pub mod event;
pub mod metrics;

pub use classifier::{ClassificationRule, TrafficClassifier, TrafficStatus};
pub use event::{
    ControlCommand, HubEvent, ProposalEvent, TrafficEvent, FALLBACK_ANCHOR, FALLBACK_WIRE_PREFIX,
};
pub use metrics::{baseline_tokens, savings_pct, TokenMetrics, ORIGINAL_TOKEN_POLICY};
