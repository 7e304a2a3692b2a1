//! Session statistics.
//!
//! Lock-free counters accumulated from traffic events, plus a serializable
//! snapshot for display.

use crate::traffic::{TrafficEvent, TrafficStatus};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Estimated cost per million tokens, in USD.
pub const COST_PER_MILLION_TOKENS: f64 = 5.0;

/// A counter metric (monotonically increasing).
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, amount: u64) {
        self.value.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Running f64 sum stored as bits.
#[derive(Debug, Default)]
struct Sum {
    bits: AtomicU64,
}

impl Sum {
    fn add(&self, amount: f64) {
        let _ = self
            .bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + amount).to_bits())
            });
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Cumulative statistics for one control-plane session.
#[derive(Debug, Default)]
pub struct SessionStats {
    messages: Counter,
    fallbacks: Counter,
    disagreements: Counter,
    recoveries: Counter,
    original_tokens: Counter,
    compressed_tokens: Counter,
    savings_pct_sum: Sum,
    proposals: Counter,
    approvals: Counter,
    dismissals: Counter,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account one traffic event.
    pub fn record(&self, event: &TrafficEvent) {
        self.messages.inc();
        if event.is_fallback() {
            self.fallbacks.inc();
        }
        match event.classification {
            TrafficStatus::Disagreement => self.disagreements.inc(),
            TrafficStatus::Recovery => self.recoveries.inc(),
            TrafficStatus::Success => {}
        }
        self.original_tokens.add(event.metrics.original_tokens as u64);
        self.compressed_tokens.add(event.metrics.compressed_tokens as u64);
        self.savings_pct_sum.add(event.metrics.savings_pct);
    }

    pub fn record_proposal(&self) {
        self.proposals.inc();
    }

    pub fn record_approval(&self) {
        self.approvals.inc();
    }

    pub fn record_dismissal(&self) {
        self.dismissals.inc();
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let messages = self.messages.get();
        let original = self.original_tokens.get();
        let compressed = self.compressed_tokens.get();
        let tokens_saved = original.saturating_sub(compressed);
        let (avg_savings_pct, disagreement_rate) = if messages == 0 {
            (0.0, 0.0)
        } else {
            (
                round1(self.savings_pct_sum.get() / messages as f64),
                self.disagreements.get() as f64 / messages as f64,
            )
        };

        StatsSnapshot {
            total_messages: messages,
            total_original_tokens: original,
            total_compressed_tokens: compressed,
            tokens_saved,
            avg_savings_pct,
            disagreement_rate,
            recovery_count: self.recoveries.get(),
            fallback_count: self.fallbacks.get(),
            proposals: self.proposals.get(),
            approvals: self.approvals.get(),
            dismissals: self.dismissals.get(),
            est_cost_saved_usd: tokens_saved as f64 * COST_PER_MILLION_TOKENS / 1_000_000.0,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Point-in-time view of [`SessionStats`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_messages: u64,
    pub total_original_tokens: u64,
    pub total_compressed_tokens: u64,
    pub tokens_saved: u64,
    pub avg_savings_pct: f64,
    /// Fraction of messages classified as disagreement
    pub disagreement_rate: f64,
    pub recovery_count: u64,
    pub fallback_count: u64,
    pub proposals: u64,
    pub approvals: u64,
    pub dismissals: u64,
    pub est_cost_saved_usd: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AgentMessage;
    use crate::quantizer::QuantizationResult;
    use crate::traffic::TrafficClassifier;
    use crate::wire::WireParams;

    fn quantized(text: &str, baseline: usize) -> TrafficEvent {
        let message = AgentMessage::new("a", "b", text).with_baseline_tokens(baseline);
        let result = QuantizationResult::new("MetaAck", WireParams::new(), Some(0.9)).unwrap();
        TrafficEvent::quantized(&message, &result, &TrafficClassifier::default())
    }

    #[test]
    fn test_counter() {
        let counter = Counter::new();
        counter.inc();
        counter.add(4);
        assert_eq!(counter.get(), 5);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = SessionStats::new().snapshot();
        assert_eq!(snapshot.total_messages, 0);
        assert_eq!(snapshot.avg_savings_pct, 0.0);
        assert_eq!(snapshot.disagreement_rate, 0.0);
    }

    #[test]
    fn test_record_traffic() {
        let stats = SessionStats::new();
        stats.record(&quantized("acknowledged", 10));
        stats.record(&quantized("regression found", 2));
        let message = AgentMessage::new("a", "b", "rollback now please");
        stats.record(&TrafficEvent::fallback(&message, &TrafficClassifier::default()));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_messages, 3);
        assert_eq!(snapshot.total_original_tokens, 15);
        assert_eq!(snapshot.total_compressed_tokens, 5);
        assert_eq!(snapshot.tokens_saved, 10);
        // (90.0 + 50.0 + 0.0) / 3
        assert_eq!(snapshot.avg_savings_pct, 46.7);
        assert_eq!(snapshot.fallback_count, 1);
        assert_eq!(snapshot.recovery_count, 1);
        assert!((snapshot.disagreement_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!((snapshot.est_cost_saved_usd - 0.00005).abs() < 1e-12);
    }
}
