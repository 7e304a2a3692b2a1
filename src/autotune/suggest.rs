//! Suggestion strategies for new anchors.

use crate::autotune::proposal::ProposalOrigin;
use crate::config::StrategyKind;
use crate::core::{Error, Result};
use crate::inference::prompt::{parse_suggestion, suggestion_prompt};
use crate::inference::InferenceClient;
use crate::quantizer::keywords::terms;
use crate::registry::{Anchor, AnchorCategory};
use crate::wire::normalize_token;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A candidate new anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub mnemonic: String,
    pub definition: String,
    pub category: AnchorCategory,
    pub example_messages: Vec<String>,
}

/// Proposes a new anchor for a message no existing anchor fits.
#[async_trait]
pub trait SuggestionStrategy: Send + Sync {
    async fn suggest(&self, message: &str, existing: &[Anchor]) -> Result<Option<Suggestion>>;

    /// Origin recorded on proposals produced by this strategy.
    fn origin(&self) -> ProposalOrigin;

    fn name(&self) -> &'static str;
}

/// Deterministic suggester deriving a mnemonic from message keywords.
///
/// The mnemonic is the category verb followed by the first two significant
/// words, e.g. `AskSuperadminBypass`.
#[derive(Clone, Debug, Default)]
pub struct KeywordSuggester;

impl KeywordSuggester {
    pub fn new() -> Self {
        Self
    }

    /// Derive a suggestion, or None when the message has no usable keywords.
    pub fn derive(&self, message: &str) -> Option<Suggestion> {
        let words: Vec<String> = terms(message)
            .into_iter()
            .map(|t| t.word)
            .filter(|w| w.len() >= 3 && !w.chars().all(|c| c.is_ascii_digit()))
            .take(2)
            .collect();
        if words.is_empty() {
            return None;
        }

        let category = guess_category(message);
        let mnemonic = std::iter::once(category.mnemonic_prefix())
            .chain(words.iter().map(|w| capitalize(w)))
            .collect::<String>();
        let definition = format!("{} regarding {}", category_phrase(&category), words.join(" "));

        Some(Suggestion {
            mnemonic,
            definition,
            category,
            example_messages: vec![message.trim().to_string()],
        })
    }
}

fn guess_category(message: &str) -> AnchorCategory {
    let lower = message.trim().to_lowercase();
    if lower.ends_with('?') {
        AnchorCategory::Ask
    } else if ["please", "can you", "could you"].iter().any(|p| lower.starts_with(p)) {
        AnchorCategory::Request
    } else {
        AnchorCategory::Inform
    }
}

fn category_phrase(category: &AnchorCategory) -> &'static str {
    match category {
        AnchorCategory::Ask => "Question",
        AnchorCategory::Request => "Request",
        _ => "Report",
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl SuggestionStrategy for KeywordSuggester {
    async fn suggest(&self, message: &str, _existing: &[Anchor]) -> Result<Option<Suggestion>> {
        Ok(self.derive(message))
    }

    fn origin(&self) -> ProposalOrigin {
        ProposalOrigin::RuleBased
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// Suggester delegating to the inference service.
pub struct InferenceSuggester {
    client: Arc<dyn InferenceClient>,
}

impl InferenceSuggester {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SuggestionStrategy for InferenceSuggester {
    async fn suggest(&self, message: &str, existing: &[Anchor]) -> Result<Option<Suggestion>> {
        let text = self
            .client
            .generate(&suggestion_prompt(message, existing))
            .await
            .map_err(|e| Error::SuggestionUnavailable(e.to_string()))?;
        let response = parse_suggestion(&text)?;

        let mnemonic = normalize_token(&response.mnemonic);
        if mnemonic.is_empty() {
            return Err(Error::SuggestionUnavailable(format!(
                "unusable mnemonic {:?}",
                response.mnemonic
            )));
        }
        Ok(Some(Suggestion {
            mnemonic,
            definition: response.definition.trim().to_string(),
            category: AnchorCategory::from(response.category),
            example_messages: response.example_messages,
        }))
    }

    fn origin(&self) -> ProposalOrigin {
        ProposalOrigin::InferenceDerived
    }

    fn name(&self) -> &'static str {
        "inference"
    }
}

/// Create the configured suggestion strategy.
///
/// An inference strategy without a client degrades to keyword suggestions.
pub fn create_suggestion_strategy(
    kind: StrategyKind,
    client: Option<Arc<dyn InferenceClient>>,
) -> Arc<dyn SuggestionStrategy> {
    match (kind, client) {
        (StrategyKind::Inference, Some(client)) => Arc::new(InferenceSuggester::new(client)),
        (StrategyKind::Inference, None) => {
            tracing::warn!("inference suggestions configured without a client, using keyword suggestions");
            Arc::new(KeywordSuggester::new())
        }
        (StrategyKind::Keyword, _) => Arc::new(KeywordSuggester::new()),
    }
}
