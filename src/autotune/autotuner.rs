//! Autotuner
//!
//! Turns fallbacks into anchor proposals. A suggestion is requested outside
//! any lock; the vocabulary is only locked to snapshot the current anchors
//! and to admit the resulting proposal.

use crate::autotune::proposal::Proposal;
use crate::autotune::suggest::{create_suggestion_strategy, Suggestion, SuggestionStrategy};
use crate::autotune::vocabulary::{Admission, Vocabulary};
use crate::config::AutotunerConfig;
use crate::core::{Error, MessageId, Result};
use crate::inference::InferenceClient;
use crate::quantizer::Fallback;
use crate::registry::Anchor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub struct Autotuner {
    suggester: Arc<dyn SuggestionStrategy>,
    timeout: Duration,
}

impl Autotuner {
    pub fn new(suggester: Arc<dyn SuggestionStrategy>) -> Self {
        Self {
            suggester,
            timeout: AutotunerConfig::default().suggestion_timeout(),
        }
    }

    /// Build from configuration, degrading to keyword suggestions without a client.
    pub fn from_config(config: &AutotunerConfig, client: Option<Arc<dyn InferenceClient>>) -> Self {
        Self::new(create_suggestion_strategy(config.strategy, client))
            .with_timeout(config.suggestion_timeout())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn strategy(&self) -> &'static str {
        self.suggester.name()
    }

    /// React to a fallback, returning the proposal it produced if any.
    ///
    /// Suggestion failures and timeouts yield `None` for this cycle.
    pub async fn observe(
        &self,
        fallback: &Fallback,
        trigger: &MessageId,
        vocabulary: &RwLock<Vocabulary>,
    ) -> Option<Proposal> {
        let anchors: Vec<Anchor> = vocabulary.read().await.registry().all().to_vec();

        let suggestion = match self.suggest_bounded(&fallback.message.text, &anchors).await {
            Ok(Some(suggestion)) => suggestion,
            Ok(None) => {
                tracing::debug!(message_id = %trigger, "no anchor suggestion");
                return None;
            }
            Err(err) => {
                tracing::warn!(strategy = self.suggester.name(), error = %err, "suggestion unavailable");
                return None;
            }
        };

        let proposal = Proposal::new(
            &suggestion.mnemonic,
            &suggestion.definition,
            suggestion.category,
            trigger.clone(),
            self.suggester.origin(),
        )
        .with_examples(suggestion.example_messages);

        let admission = vocabulary.write().await.admit(proposal.clone());
        match admission {
            Admission::Admitted => {
                tracing::info!(
                    mnemonic = %proposal.mnemonic,
                    origin = ?proposal.origin,
                    message_id = %trigger,
                    "anchor proposed"
                );
                Some(proposal)
            }
            suppressed => {
                tracing::debug!(mnemonic = %proposal.mnemonic, ?suppressed, "proposal suppressed");
                None
            }
        }
    }

    /// Approve a pending proposal, registering its anchor.
    pub async fn approve(&self, vocabulary: &RwLock<Vocabulary>, mnemonic: &str) -> Result<Anchor> {
        let anchor = vocabulary.write().await.approve(mnemonic)?;
        tracing::info!(mnemonic, "anchor approved");
        Ok(anchor)
    }

    /// Dismiss a mnemonic for the rest of the session.
    pub async fn dismiss(&self, vocabulary: &RwLock<Vocabulary>, mnemonic: &str) -> Result<()> {
        vocabulary.write().await.dismiss(mnemonic)?;
        tracing::info!(mnemonic, "anchor dismissed");
        Ok(())
    }

    async fn suggest_bounded(&self, message: &str, anchors: &[Anchor]) -> Result<Option<Suggestion>> {
        match tokio::time::timeout(self.timeout, self.suggester.suggest(message, anchors)).await {
            Ok(result) => result.map_err(|e| match e {
                Error::SuggestionUnavailable(_) => e,
                other => Error::SuggestionUnavailable(other.to_string()),
            }),
            Err(_) => Err(Error::SuggestionUnavailable(format!(
                "{} timed out after {:?}",
                self.suggester.name(),
                self.timeout
            ))),
        }
    }
}

impl Default for Autotuner {
    fn default() -> Self {
        Self::from_config(&AutotunerConfig::default(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autotune::proposal::{ProposalOrigin, ProposalStatus};
    use crate::autotune::suggest::KeywordSuggester;
    use crate::core::AgentMessage;
    use crate::quantizer::FallbackReason;
    use async_trait::async_trait;

    struct StalledSuggester;

    #[async_trait]
    impl SuggestionStrategy for StalledSuggester {
        async fn suggest(&self, _: &str, _: &[Anchor]) -> Result<Option<Suggestion>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        fn origin(&self) -> ProposalOrigin {
            ProposalOrigin::InferenceDerived
        }

        fn name(&self) -> &'static str {
            "stalled"
        }
    }

    fn fallback(text: &str) -> Fallback {
        Fallback {
            message: AgentMessage::new("Security", "Admin", text),
            reason: FallbackReason::NoSelection,
        }
    }

    const QUESTION: &str = "Can SuperAdmin bypass 2FA?";

    #[tokio::test]
    async fn test_observe_proposes() {
        let vocabulary = RwLock::new(Vocabulary::with_defaults());
        let autotuner = Autotuner::new(Arc::new(KeywordSuggester::new()));
        let trigger = MessageId::new("msg-7");

        let proposal = autotuner
            .observe(&fallback(QUESTION), &trigger, &vocabulary)
            .await
            .unwrap();
        assert_eq!(proposal.mnemonic, "AskSuperadminBypass");
        assert_eq!(proposal.trigger_message_id, trigger);
        assert_eq!(proposal.origin, ProposalOrigin::RuleBased);
        assert_eq!(proposal.status, ProposalStatus::Pending);
    }

    #[tokio::test]
    async fn test_pending_is_not_reproposed() {
        let vocabulary = RwLock::new(Vocabulary::with_defaults());
        let autotuner = Autotuner::default();
        let trigger = MessageId::generate();

        assert!(autotuner.observe(&fallback(QUESTION), &trigger, &vocabulary).await.is_some());
        assert!(autotuner.observe(&fallback(QUESTION), &trigger, &vocabulary).await.is_none());
    }

    #[tokio::test]
    async fn test_dismissed_is_suppressed() {
        let vocabulary = RwLock::new(Vocabulary::with_defaults());
        let autotuner = Autotuner::default();

        let proposal = autotuner
            .observe(&fallback(QUESTION), &MessageId::generate(), &vocabulary)
            .await
            .unwrap();
        autotuner.dismiss(&vocabulary, &proposal.mnemonic).await.unwrap();

        for _ in 0..3 {
            let again = autotuner
                .observe(&fallback(QUESTION), &MessageId::generate(), &vocabulary)
                .await;
            assert!(again.is_none());
        }
    }

    #[tokio::test]
    async fn test_approved_is_registered_and_suppressed() {
        let vocabulary = RwLock::new(Vocabulary::with_defaults());
        let autotuner = Autotuner::default();

        let proposal = autotuner
            .observe(&fallback(QUESTION), &MessageId::generate(), &vocabulary)
            .await
            .unwrap();
        let anchor = autotuner.approve(&vocabulary, &proposal.mnemonic).await.unwrap();
        assert_eq!(anchor.mnemonic, "AskSuperadminBypass");
        assert!(vocabulary.read().await.registry().contains("AskSuperadminBypass"));

        let again = autotuner
            .observe(&fallback(QUESTION), &MessageId::generate(), &vocabulary)
            .await;
        assert!(again.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestion_timeout_yields_nothing() {
        let vocabulary = RwLock::new(Vocabulary::with_defaults());
        let autotuner =
            Autotuner::new(Arc::new(StalledSuggester)).with_timeout(Duration::from_millis(20));

        let proposal = autotuner
            .observe(&fallback(QUESTION), &MessageId::generate(), &vocabulary)
            .await;
        assert!(proposal.is_none());
        assert!(vocabulary.read().await.pending().is_empty());
    }
}
