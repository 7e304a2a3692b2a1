//! End-to-end protocol properties.

use async_trait::async_trait;
use slipstream::autotune::{Autotuner, Vocabulary};
use slipstream::control::ControlPlane;
use slipstream::core::AgentMessage;
use slipstream::quantizer::{Quantization, Quantizer, Selection, SelectionStrategy};
use slipstream::registry::{Anchor, AnchorCategory, AnchorRegistry};
use slipstream::traffic::{HubEvent, TrafficStatus};
use slipstream::wire::{WireCodec, WireParams};
use slipstream::{Error, Result};
use std::sync::Arc;

/// Selection strategy returning a fixed answer.
struct Scripted(Option<Selection>);

#[async_trait]
impl SelectionStrategy for Scripted {
    async fn select(&self, _: &str, _: &str, _: &str, _: &[Anchor]) -> Result<Option<Selection>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn request_task() -> Selection {
    Selection::new(
        "RequestTask",
        WireParams::new()
            .with("task", "regression_test")
            .with("target", "auth"),
        0.9,
    )
}

fn plane_with(selection: Option<Selection>) -> ControlPlane {
    ControlPlane::new(
        Vocabulary::with_defaults(),
        Quantizer::new(Arc::new(Scripted(selection))),
        Autotuner::default(),
    )
}

#[tokio::test]
async fn regression_message_end_to_end() {
    let plane = plane_with(Some(request_task()));
    let message = AgentMessage::new(
        "QA",
        "Executor",
        "Running regression suite on Authentication module",
    )
    .with_baseline_tokens(7);

    let outcome = plane.process(message).await;
    let traffic = outcome.traffic;
    assert_eq!(traffic.wire, "RequestTask(task:regression_test,target:auth)");
    assert_eq!(traffic.classification, TrafficStatus::Disagreement);
    assert_eq!(traffic.metrics.original_tokens, 7);
    assert_eq!(traffic.metrics.compressed_tokens, 1);
    assert_eq!(traffic.metrics.savings_pct, 85.7);
    assert!(outcome.proposal.is_none());

    let decoded = WireCodec::decode(&traffic.wire).unwrap();
    assert_eq!(decoded.mnemonic, "RequestTask");
    assert_eq!(decoded.params, traffic.params);
    assert_eq!(
        plane.registry_snapshot().await.resolve(&decoded).unwrap().mnemonic,
        "RequestTask"
    );
}

#[tokio::test]
async fn traffic_event_json_shape() {
    let plane = plane_with(Some(request_task()));
    let outcome = plane
        .process(AgentMessage::new("QA", "Executor", "Run the suite").with_baseline_tokens(3))
        .await;

    let json = serde_json::to_value(HubEvent::Traffic(outcome.traffic)).unwrap();
    for field in [
        "src",
        "dst",
        "original_message",
        "wire",
        "anchor",
        "params",
        "classification",
        "metrics",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert_eq!(json["params"]["target"], "auth");
    assert_eq!(json["metrics"]["savings_pct"], 66.7);
}

#[tokio::test]
async fn empty_selection_is_always_fallback() {
    let registry = AnchorRegistry::with_defaults();
    let quantizer = Quantizer::new(Arc::new(Scripted(None))).with_threshold(0.0);
    for text in ["", "Acknowledged.", "Running regression suite"] {
        let outcome = quantizer
            .quantize(&AgentMessage::new("a", "b", text), &registry)
            .await;
        assert!(matches!(outcome, Quantization::Fallback(_)), "{text:?}");
    }
}

#[tokio::test]
async fn fallback_carries_raw_text() {
    let plane = plane_with(None);
    let outcome = plane
        .process(AgentMessage::new("Ops", "QA", "Quixotic zephyrs bewilder"))
        .await;
    assert_eq!(outcome.traffic.anchor, "NONE");
    assert_eq!(outcome.traffic.wire, "[FALLBACK] Quixotic zephyrs bewilder");
    assert_eq!(outcome.traffic.metrics.savings_pct, 0.0);
    assert_eq!(plane.stats().fallback_count, 1);
}

#[test]
fn wire_round_trip() {
    let cases = [
        WireParams::new(),
        WireParams::new().with("task", "regression_test"),
        WireParams::new()
            .with("z", "1")
            .with("a", "two words")
            .with("m", ""),
    ];
    for params in cases {
        let wire = WireCodec::encode("ObserveState", &params).unwrap();
        let decoded = WireCodec::decode(&wire).unwrap();
        assert_eq!(decoded.mnemonic, "ObserveState");
        assert_eq!(decoded.params, params);
    }
    assert_eq!(
        WireCodec::encode("MetaAck", &WireParams::new()).unwrap(),
        "MetaAck()"
    );
}

#[test]
fn wire_grammar_rejection() {
    assert!(matches!(WireCodec::decode("Foo(bar"), Err(Error::MalformedWire(_))));
    assert!(matches!(WireCodec::decode("Foo bar)"), Err(Error::MalformedWire(_))));
    assert!(matches!(
        WireCodec::encode("Foo", &WireParams::new().with("k", "a:b")),
        Err(Error::ReservedCharacter { .. })
    ));
}

#[test]
fn registry_replaces_on_duplicate_mnemonic() {
    let mut registry = AnchorRegistry::new();
    registry.register(Anchor::new("Deploy", "first", AnchorCategory::Action));
    registry.register(Anchor::new("Deploy", "second", AnchorCategory::Action));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup("Deploy").unwrap().definition, "second");
    assert!(matches!(
        registry.lookup("Missing"),
        Err(Error::UnknownMnemonic(_))
    ));
}

#[test]
fn processing_with_block_on() {
    let plane = plane_with(Some(request_task()));
    let outcome = tokio_test::block_on(plane.process(AgentMessage::new(
        "QA",
        "Executor",
        "Initiating rollback",
    )));
    assert_eq!(outcome.traffic.classification, TrafficStatus::Recovery);
    tokio_test::assert_ok!(WireCodec::decode(&outcome.traffic.wire));
}
