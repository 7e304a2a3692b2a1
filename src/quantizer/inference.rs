//! Selection delegated to the external inference service.

use crate::core::Result;
use crate::inference::prompt::{parse_selection, selection_prompt, to_wire_params};
use crate::inference::InferenceClient;
use crate::quantizer::strategy::{Selection, SelectionStrategy};
use crate::registry::Anchor;
use async_trait::async_trait;
use std::sync::Arc;

/// Confidence assumed when the model omits one.
pub const DEFAULT_INFERENCE_CONFIDENCE: f64 = 0.8;

/// Selector asking a language model to pick the anchor.
pub struct InferenceSelector {
    client: Arc<dyn InferenceClient>,
}

impl InferenceSelector {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SelectionStrategy for InferenceSelector {
    async fn select(
        &self,
        message: &str,
        src: &str,
        dst: &str,
        anchors: &[Anchor],
    ) -> Result<Option<Selection>> {
        let prompt = selection_prompt(message, src, dst, anchors);
        let text = self.client.generate(&prompt).await?;
        let response = parse_selection(&text)?;

        tracing::debug!(
            model = self.client.model(),
            anchor = %response.anchor,
            "inference selection received"
        );

        let confidence = response
            .confidence
            .unwrap_or(DEFAULT_INFERENCE_CONFIDENCE)
            .clamp(0.0, 1.0);
        let mut selection = Selection::new(
            response.anchor.trim(),
            to_wire_params(&response.params),
            confidence,
        );
        if !response.reasoning.is_empty() {
            selection = selection.with_reasoning(&response.reasoning);
        }
        Ok(Some(selection))
    }

    fn name(&self) -> &'static str {
        "inference"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::registry::default_anchors;

    struct CannedClient(String);

    #[async_trait]
    impl InferenceClient for CannedClient {
        async fn generate(&self, prompt: &str) -> Result<String> {
            assert!(prompt.contains("RequestTask"));
            Ok(self.0.clone())
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    #[tokio::test]
    async fn test_inference_selection_passes_reasoning_through() {
        let client = Arc::new(CannedClient(
            r#"{"anchor":"RequestTask","reasoning":"The message requests a test run","params":{"task":"regression_test","target":"auth"},"confidence":0.9}"#
                .to_string(),
        ));
        let selector = InferenceSelector::new(client);
        let selection = selector
            .select("Running regression suite", "QA", "Executor", &default_anchors())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(selection.mnemonic, "RequestTask");
        assert_eq!(selection.confidence, 0.9);
        assert_eq!(selection.reasoning.as_deref(), Some("The message requests a test run"));
        assert_eq!(selection.params.get("task"), Some("regression_test"));
    }

    #[tokio::test]
    async fn test_missing_confidence_uses_default() {
        let client = Arc::new(CannedClient(r#"{"anchor":"MetaAck"}"#.to_string()));
        let selection = InferenceSelector::new(client)
            .select("ok", "A", "B", &default_anchors())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(selection.confidence, DEFAULT_INFERENCE_CONFIDENCE);
        assert!(selection.reasoning.is_none());
    }

    #[tokio::test]
    async fn test_unparseable_response_is_unavailable() {
        let client = Arc::new(CannedClient("no idea".to_string()));
        let result = InferenceSelector::new(client)
            .select("ok", "A", "B", &default_anchors())
            .await;
        assert!(matches!(result, Err(Error::SelectionUnavailable(_))));
    }
}
