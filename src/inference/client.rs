//! Inference client trait.

use crate::core::Result;
use async_trait::async_trait;

/// Text-in, text-out access to an external language inference service.
///
/// Implementations must be side-effect free with respect to the caller so a
/// failed call can be retried or abandoned.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send a prompt and return the raw model text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the backing model, for logs.
    fn model(&self) -> &str;
}
