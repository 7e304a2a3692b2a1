//! Common types used across Slipstream modules.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Identifier of a message or proposal flowing through the control plane.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier.
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A natural-language message exchanged between two agents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Sending agent
    pub src: String,
    /// Receiving agent
    pub dst: String,
    /// Verbose message text
    pub text: String,
    /// Explicit baseline token count, overriding the default policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_tokens: Option<usize>,
}

impl AgentMessage {
    /// Create a new message.
    pub fn new(src: &str, dst: &str, text: &str) -> Self {
        Self {
            src: src.to_string(),
            dst: dst.to_string(),
            text: text.to_string(),
            baseline_tokens: None,
        }
    }

    /// Set an explicit baseline token count.
    pub fn with_baseline_tokens(mut self, tokens: usize) -> Self {
        self.baseline_tokens = Some(tokens);
        self
    }
}

/// Whitespace-delimited word count, the token approximation used for metering.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
