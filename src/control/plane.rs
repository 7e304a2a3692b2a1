//! Control plane
//!
//! Drives each message through quantize, classify, meter and (on fallback)
//! autotune, then publishes the resulting events. Approval and dismissal
//! commands may arrive concurrently with message processing; all of them
//! share one vocabulary lock.

use crate::autotune::{Autotuner, Proposal, Vocabulary};
use crate::config::{SlipstreamConfig, StrategyKind};
use crate::control::hub::{EventHub, EventReceiver};
use crate::core::{AgentMessage, Error, Result};
use crate::inference::{GeminiClient, InferenceClient};
use crate::monitoring::{SessionStats, StatsSnapshot};
use crate::quantizer::{create_quantizer, Quantization, Quantizer};
use crate::registry::{fallback_summaries, Anchor, AnchorRegistry, AnchorSummary};
use crate::traffic::{ControlCommand, HubEvent, ProposalEvent, TrafficClassifier, TrafficEvent};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Result of processing one message.
#[derive(Clone, Debug)]
pub struct ProcessOutcome {
    pub traffic: TrafficEvent,
    /// Proposal raised because the message fell back
    pub proposal: Option<Proposal>,
}

pub struct ControlPlane {
    vocabulary: Arc<RwLock<Vocabulary>>,
    quantizer: Quantizer,
    autotuner: Autotuner,
    classifier: TrafficClassifier,
    hub: EventHub,
    stats: SessionStats,
}

impl ControlPlane {
    /// Create a control plane over an existing vocabulary.
    pub fn new(vocabulary: Vocabulary, quantizer: Quantizer, autotuner: Autotuner) -> Self {
        let defaults = crate::config::ControlConfig::default();
        Self {
            vocabulary: Arc::new(RwLock::new(vocabulary)),
            quantizer,
            autotuner,
            classifier: TrafficClassifier::default(),
            hub: EventHub::new(defaults.history_capacity, defaults.event_buffer),
            stats: SessionStats::new(),
        }
    }

    /// Build from configuration with an optional inference client.
    pub fn from_config(
        config: &SlipstreamConfig,
        client: Option<Arc<dyn InferenceClient>>,
    ) -> Result<Self> {
        config.validate()?;
        let quantizer = create_quantizer(&config.quantizer, client.clone());
        let autotuner = Autotuner::from_config(&config.autotuner, client);

        tracing::info!(
            selection = %config.quantizer.strategy,
            suggestion = autotuner.strategy(),
            threshold = quantizer.acceptance_threshold(),
            "control plane configured"
        );

        Ok(Self {
            hub: EventHub::new(config.control.history_capacity, config.control.event_buffer),
            ..Self::new(Vocabulary::with_defaults(), quantizer, autotuner)
        })
    }

    /// Build from configuration with `SLIPSTREAM_*` environment overrides
    /// applied, creating a Gemini client when an inference strategy is
    /// configured and an API key is available.
    pub fn from_env(config: &SlipstreamConfig) -> Result<Self> {
        let mut config = config.clone();
        config.apply_env_overrides();

        let wants_inference = config.quantizer.strategy == StrategyKind::Inference
            || config.autotuner.strategy == StrategyKind::Inference;
        let client = if wants_inference {
            GeminiClient::from_config(&config.inference)
                .map(|client| Arc::new(client) as Arc<dyn InferenceClient>)
        } else {
            None
        };
        Self::from_config(&config, client)
    }

    pub fn with_classifier(mut self, classifier: TrafficClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Shared vocabulary handle.
    pub fn vocabulary(&self) -> Arc<RwLock<Vocabulary>> {
        Arc::clone(&self.vocabulary)
    }

    /// Consistent copy of the registry at this instant.
    pub async fn registry_snapshot(&self) -> AnchorRegistry {
        self.vocabulary.read().await.registry().clone()
    }

    /// Process one message end to end.
    pub async fn process(&self, message: AgentMessage) -> ProcessOutcome {
        let registry = self.registry_snapshot().await;
        let outcome = self.quantizer.quantize(&message, &registry).await;
        let traffic = TrafficEvent::from_quantization(&message, &outcome, &self.classifier);

        tracing::debug!(
            id = %traffic.id,
            anchor = %traffic.anchor,
            classification = %traffic.classification,
            savings_pct = traffic.metrics.savings_pct,
            "message processed"
        );
        self.stats.record(&traffic);
        self.hub.publish(HubEvent::Traffic(traffic.clone())).await;

        let proposal = match &outcome {
            Quantization::Fallback(fallback) => {
                self.autotuner
                    .observe(fallback, &traffic.id, &self.vocabulary)
                    .await
            }
            Quantization::Quantized(_) => None,
        };
        if let Some(proposal) = &proposal {
            self.stats.record_proposal();
            self.hub
                .publish(HubEvent::Proposal(ProposalEvent::from(proposal)))
                .await;
        }

        ProcessOutcome { traffic, proposal }
    }

    /// Process a stream of messages in order.
    pub async fn process_all<S>(&self, messages: S) -> Vec<ProcessOutcome>
    where
        S: Stream<Item = AgentMessage>,
    {
        let mut messages = std::pin::pin!(messages);
        let mut outcomes = Vec::new();
        while let Some(message) = messages.next().await {
            outcomes.push(self.process(message).await);
        }
        outcomes
    }

    /// Apply a human decision.
    pub async fn handle_command(&self, command: ControlCommand) -> Result<()> {
        match command {
            ControlCommand::Approve { mnemonic } => {
                self.approve(&mnemonic).await?;
            }
            ControlCommand::Dismiss { mnemonic } => {
                self.dismiss(&mnemonic).await?;
            }
        }
        Ok(())
    }

    /// Parse and apply a JSON command. Unrecognized input is ignored.
    pub async fn handle_raw(&self, raw: &str) -> Result<()> {
        match serde_json::from_str::<ControlCommand>(raw) {
            Ok(command) => self.handle_command(command).await,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unrecognized control input");
                Ok(())
            }
        }
    }

    /// Approve a proposal and announce the new anchor.
    pub async fn approve(&self, mnemonic: &str) -> Result<Anchor> {
        let anchor = self.autotuner.approve(&self.vocabulary, mnemonic).await?;
        self.stats.record_approval();
        self.hub
            .publish(HubEvent::notification(format!(
                "Anchor '{}' optimized and deployed.",
                anchor.mnemonic
            )))
            .await;
        Ok(anchor)
    }

    pub async fn dismiss(&self, mnemonic: &str) -> Result<()> {
        self.autotuner.dismiss(&self.vocabulary, mnemonic).await?;
        self.stats.record_dismissal();
        Ok(())
    }

    /// Administrative anchor registration outside the proposal flow.
    pub async fn register(&self, anchor: Anchor) {
        tracing::info!(mnemonic = %anchor.mnemonic, "anchor registered");
        self.vocabulary.write().await.register(anchor);
    }

    /// Administrative anchor removal.
    pub async fn remove(&self, mnemonic: &str) -> Result<Anchor> {
        let removed = self.vocabulary.write().await.remove(mnemonic);
        removed.ok_or_else(|| Error::UnknownMnemonic(mnemonic.to_string()))
    }

    /// Registry export. Never empty.
    pub async fn anchors(&self) -> Vec<AnchorSummary> {
        let summaries = self.vocabulary.read().await.registry().summaries();
        if summaries.is_empty() {
            tracing::warn!("registry is empty, exporting the fallback vocabulary");
            return fallback_summaries();
        }
        summaries
    }

    pub async fn pending_proposals(&self) -> Vec<Proposal> {
        self.vocabulary
            .read()
            .await
            .pending()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.hub.subscribe()
    }

    pub async fn history(&self) -> Vec<HubEvent> {
        self.hub.history().await
    }

    pub async fn history_sync(&self) -> HubEvent {
        self.hub.history_sync().await
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
