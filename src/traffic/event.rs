//! Exposed event shapes and inbound control commands.
//!
//! Every outbound event shares one JSON envelope tagged by `"type"`.

use crate::autotune::{Proposal, ProposalOrigin};
use crate::core::{now, AgentMessage, MessageId, Timestamp};
use crate::quantizer::{Quantization, QuantizationResult};
use crate::registry::AnchorCategory;
use crate::traffic::classifier::{TrafficClassifier, TrafficStatus};
use crate::traffic::metrics::TokenMetrics;
use crate::wire::WireParams;
use serde::{Deserialize, Serialize};

/// Anchor reported for messages carried raw.
pub const FALLBACK_ANCHOR: &str = "NONE";
/// Prefix marking a raw message on the wire.
pub const FALLBACK_WIRE_PREFIX: &str = "[FALLBACK]";

/// One message as it crossed the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrafficEvent {
    pub id: MessageId,
    pub timestamp: Timestamp,
    pub src: String,
    pub dst: String,
    pub original_message: String,
    pub wire: String,
    pub anchor: String,
    pub params: WireParams,
    pub classification: TrafficStatus,
    pub metrics: TokenMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl TrafficEvent {
    /// Build the event for a quantization outcome.
    pub fn from_quantization(
        message: &AgentMessage,
        outcome: &Quantization,
        classifier: &TrafficClassifier,
    ) -> Self {
        match outcome {
            Quantization::Quantized(result) => Self::quantized(message, result, classifier),
            Quantization::Fallback(_) => Self::fallback(message, classifier),
        }
    }

    pub fn quantized(
        message: &AgentMessage,
        result: &QuantizationResult,
        classifier: &TrafficClassifier,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            timestamp: now(),
            src: message.src.clone(),
            dst: message.dst.clone(),
            original_message: message.text.clone(),
            wire: result.wire().to_string(),
            anchor: result.anchor().to_string(),
            params: result.params().clone(),
            classification: classifier.classify(&message.text),
            metrics: TokenMetrics::measure(message, result.wire()),
            confidence: result.selection_confidence(),
            reasoning: result.reasoning().map(str::to_string),
        }
    }

    /// Event for a message carried uncompressed.
    pub fn fallback(message: &AgentMessage, classifier: &TrafficClassifier) -> Self {
        Self {
            id: MessageId::generate(),
            timestamp: now(),
            src: message.src.clone(),
            dst: message.dst.clone(),
            original_message: message.text.clone(),
            wire: format!("{} {}", FALLBACK_WIRE_PREFIX, message.text),
            anchor: FALLBACK_ANCHOR.to_string(),
            params: WireParams::new(),
            classification: classifier.classify(&message.text),
            metrics: TokenMetrics::uncompressed(message),
            confidence: None,
            reasoning: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.anchor == FALLBACK_ANCHOR
    }
}

/// A new anchor awaiting a decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposalEvent {
    pub id: MessageId,
    pub trigger_message_id: MessageId,
    pub mnemonic: String,
    pub definition: String,
    pub category: AnchorCategory,
    pub origin: ProposalOrigin,
    #[serde(default)]
    pub example_messages: Vec<String>,
}

impl From<&Proposal> for ProposalEvent {
    fn from(proposal: &Proposal) -> Self {
        Self {
            id: proposal.id.clone(),
            trigger_message_id: proposal.trigger_message_id.clone(),
            mnemonic: proposal.mnemonic.clone(),
            definition: proposal.definition.clone(),
            category: proposal.category.clone(),
            origin: proposal.origin,
            example_messages: proposal.example_messages.clone(),
        }
    }
}

/// Outbound event envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubEvent {
    Traffic(TrafficEvent),
    Proposal(ProposalEvent),
    SystemNotification { message: String, timestamp: Timestamp },
    HistorySync {
        #[serde(rename = "messages")]
        history: Vec<HubEvent>,
    },
}

impl HubEvent {
    pub fn notification(message: impl Into<String>) -> Self {
        HubEvent::SystemNotification {
            message: message.into(),
            timestamp: now(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HubEvent::Traffic(_) => "traffic",
            HubEvent::Proposal(_) => "proposal",
            HubEvent::SystemNotification { .. } => "system_notification",
            HubEvent::HistorySync { .. } => "history_sync",
        }
    }
}

/// Inbound human decision on a proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlCommand {
    #[serde(alias = "approve_anchor")]
    Approve { mnemonic: String },
    #[serde(alias = "dismiss_anchor")]
    Dismiss { mnemonic: String },
}

impl ControlCommand {
    pub fn mnemonic(&self) -> &str {
        match self {
            ControlCommand::Approve { mnemonic } | ControlCommand::Dismiss { mnemonic } => mnemonic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantizer::FallbackReason;

    fn message() -> AgentMessage {
        AgentMessage::new("QA", "Executor", "Running regression suite on Authentication module")
            .with_baseline_tokens(7)
    }

    #[test]
    fn test_quantized_event_shape() {
        let params = WireParams::new().with("task", "regression_test").with("target", "auth");
        let result = QuantizationResult::new("RequestTask", params, Some(0.9)).unwrap();
        let event = TrafficEvent::from_quantization(
            &message(),
            &Quantization::Quantized(result),
            &TrafficClassifier::default(),
        );

        let json = serde_json::to_value(HubEvent::Traffic(event)).unwrap();
        assert_eq!(json["type"], "traffic");
        assert_eq!(json["wire"], "RequestTask(task:regression_test,target:auth)");
        assert_eq!(json["anchor"], "RequestTask");
        assert_eq!(json["params"]["task"], "regression_test");
        assert_eq!(json["classification"], "disagreement");
        assert_eq!(json["metrics"]["original_tokens"], 7);
        assert_eq!(json["metrics"]["compressed_tokens"], 1);
        assert_eq!(json["metrics"]["savings_pct"], 85.7);
        assert_eq!(json["confidence"], 0.9);
        assert!(json.get("reasoning").is_none());
    }

    #[test]
    fn test_fallback_event() {
        let outcome = Quantization::Fallback(crate::quantizer::Fallback {
            message: message(),
            reason: FallbackReason::NoSelection,
        });
        let event = TrafficEvent::from_quantization(&message(), &outcome, &TrafficClassifier::default());
        assert!(event.is_fallback());
        assert_eq!(
            event.wire,
            "[FALLBACK] Running regression suite on Authentication module"
        );
        assert!(event.params.is_empty());
        assert_eq!(event.metrics.compressed_tokens, 6);
        assert_eq!(event.metrics.savings_pct, 0.0);
    }

    #[test]
    fn test_hub_event_round_trip() {
        let event = HubEvent::HistorySync {
            history: vec![HubEvent::notification("Anchor 'X' optimized and deployed.")],
        };
        let json = serde_json::to_string(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "history_sync");
        assert_eq!(value["messages"].as_array().map(Vec::len), Some(1));
        assert!(value.get("history").is_none());

        let back: HubEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.kind(), "history_sync");
    }

    #[test]
    fn test_control_command_aliases() {
        let approve: ControlCommand =
            serde_json::from_str(r#"{"type":"approve_anchor","mnemonic":"CheckPolicy2FA"}"#).unwrap();
        assert_eq!(
            approve,
            ControlCommand::Approve {
                mnemonic: "CheckPolicy2FA".to_string()
            }
        );
        let dismiss: ControlCommand =
            serde_json::from_str(r#"{"type":"dismiss","mnemonic":"X"}"#).unwrap();
        assert_eq!(dismiss.mnemonic(), "X");
        assert!(serde_json::from_str::<ControlCommand>(r#"{"type":"delete","mnemonic":"X"}"#).is_err());
    }
}
