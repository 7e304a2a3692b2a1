//! Quantizer construction from configuration.

use crate::config::{QuantizerConfig, StrategyKind};
use crate::inference::InferenceClient;
use crate::quantizer::inference::InferenceSelector;
use crate::quantizer::keyword::KeywordSelector;
use crate::quantizer::quantizer::Quantizer;
use crate::quantizer::strategy::SelectionStrategy;
use std::sync::Arc;

/// Create the configured selection strategy.
///
/// An inference strategy without a client degrades to keyword selection.
pub fn create_selection_strategy(
    kind: StrategyKind,
    client: Option<Arc<dyn InferenceClient>>,
) -> Arc<dyn SelectionStrategy> {
    match (kind, client) {
        (StrategyKind::Inference, Some(client)) => Arc::new(InferenceSelector::new(client)),
        (StrategyKind::Inference, None) => {
            tracing::warn!("inference selection configured without a client, using keyword selection");
            Arc::new(KeywordSelector::new())
        }
        (StrategyKind::Keyword, _) => Arc::new(KeywordSelector::new()),
    }
}

/// Create a quantizer from configuration.
pub fn create_quantizer(config: &QuantizerConfig, client: Option<Arc<dyn InferenceClient>>) -> Quantizer {
    let strategy = create_selection_strategy(config.strategy, client);
    let mut quantizer = Quantizer::new(strategy.clone())
        .with_threshold(config.acceptance_threshold)
        .with_timeout(config.selection_timeout());
    if config.backup_to_keyword && strategy.name() != "keyword" {
        quantizer = quantizer.with_backup(Arc::new(KeywordSelector::new()));
    }
    quantizer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Result;
    use async_trait::async_trait;

    struct NullClient;

    #[async_trait]
    impl InferenceClient for NullClient {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok("{}".to_string())
        }

        fn model(&self) -> &str {
            "null"
        }
    }

    #[test]
    fn test_factory_keyword() {
        let strategy = create_selection_strategy(StrategyKind::Keyword, None);
        assert_eq!(strategy.name(), "keyword");
    }

    #[test]
    fn test_factory_inference() {
        let strategy = create_selection_strategy(StrategyKind::Inference, Some(Arc::new(NullClient)));
        assert_eq!(strategy.name(), "inference");
    }

    #[test]
    fn test_factory_inference_without_client_degrades() {
        let strategy = create_selection_strategy(StrategyKind::Inference, None);
        assert_eq!(strategy.name(), "keyword");
    }

    #[test]
    fn test_create_quantizer_threshold() {
        let config = QuantizerConfig {
            acceptance_threshold: 0.75,
            ..QuantizerConfig::default()
        };
        let quantizer = create_quantizer(&config, None);
        assert_eq!(quantizer.acceptance_threshold(), 0.75);
    }
}
