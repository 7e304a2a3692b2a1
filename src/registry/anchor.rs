//! Anchor representation.
//!
//! An anchor is a named, reusable intent template. Mnemonics identify anchors
//! on the wire; categories only group them for display and ordering.

use serde::{Deserialize, Serialize};

/// Category taxonomy for anchors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnchorCategory {
    /// Report state, changes or errors
    Observe,
    /// Share results, status or progress
    Inform,
    /// Questions
    Ask,
    /// Requests for work, review or data
    Request,
    /// Plans, changes and fixes put up for consideration
    Propose,
    /// Commitments to tasks or plans
    Commit,
    /// Evaluations and verdicts
    Eval,
    /// Concrete operations
    Action,
    /// Protocol-level acknowledgements and sync
    Meta,
    /// Category not in the built-in taxonomy
    Custom(String),
}

impl AnchorCategory {
    /// Built-in categories, in default display order.
    pub const BUILTIN: [AnchorCategory; 9] = [
        AnchorCategory::Observe,
        AnchorCategory::Inform,
        AnchorCategory::Ask,
        AnchorCategory::Request,
        AnchorCategory::Propose,
        AnchorCategory::Commit,
        AnchorCategory::Eval,
        AnchorCategory::Action,
        AnchorCategory::Meta,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AnchorCategory::Observe => "observe",
            AnchorCategory::Inform => "inform",
            AnchorCategory::Ask => "ask",
            AnchorCategory::Request => "request",
            AnchorCategory::Propose => "propose",
            AnchorCategory::Commit => "commit",
            AnchorCategory::Eval => "eval",
            AnchorCategory::Action => "action",
            AnchorCategory::Meta => "meta",
            AnchorCategory::Custom(name) => name.as_str(),
        }
    }

    /// Verb used as the mnemonic prefix for anchors of this category.
    pub fn mnemonic_prefix(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for AnchorCategory {
    fn default() -> Self {
        Self::Meta
    }
}

impl From<String> for AnchorCategory {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "observe" => AnchorCategory::Observe,
            "inform" => AnchorCategory::Inform,
            "ask" => AnchorCategory::Ask,
            "request" => AnchorCategory::Request,
            "propose" => AnchorCategory::Propose,
            "commit" => AnchorCategory::Commit,
            "eval" => AnchorCategory::Eval,
            "action" => AnchorCategory::Action,
            "meta" => AnchorCategory::Meta,
            other => AnchorCategory::Custom(other.to_string()),
        }
    }
}

impl From<&str> for AnchorCategory {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<AnchorCategory> for String {
    fn from(value: AnchorCategory) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for AnchorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A semantic anchor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Unique identifier, used verbatim on the wire
    pub mnemonic: String,
    /// One-sentence human-readable meaning
    pub definition: String,
    /// Grouping tag
    pub category: AnchorCategory,
}

impl Anchor {
    /// Create a new anchor.
    pub fn new(mnemonic: &str, definition: &str, category: AnchorCategory) -> Self {
        Self {
            mnemonic: mnemonic.to_string(),
            definition: definition.to_string(),
            category,
        }
    }

    /// Display summary exposed to external callers.
    pub fn summary(&self) -> AnchorSummary {
        AnchorSummary {
            mnemonic: self.mnemonic.clone(),
            definition: self.definition.clone(),
        }
    }
}

/// `{mnemonic, definition}` pair exported for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSummary {
    pub mnemonic: String,
    pub definition: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(AnchorCategory::from("Observe"), AnchorCategory::Observe);
        assert_eq!(AnchorCategory::from(" eval "), AnchorCategory::Eval);
        assert_eq!(
            AnchorCategory::from("security"),
            AnchorCategory::Custom("security".to_string())
        );
    }

    #[test]
    fn test_category_serde_as_string() {
        let anchor = Anchor::new("AskStatus", "Query current status", AnchorCategory::Ask);
        let json = serde_json::to_string(&anchor).unwrap();
        assert!(json.contains("\"category\":\"ask\""));

        let parsed: Anchor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, anchor);
    }

    #[test]
    fn test_mnemonic_prefix() {
        assert_eq!(AnchorCategory::Request.mnemonic_prefix(), "Request");
        assert_eq!(AnchorCategory::Custom("audit".into()).mnemonic_prefix(), "Audit");
    }

    #[test]
    fn test_summary() {
        let anchor = Anchor::new("MetaAck", "Acknowledge receipt", AnchorCategory::Meta);
        let summary = anchor.summary();
        assert_eq!(summary.mnemonic, "MetaAck");
        assert_eq!(summary.definition, "Acknowledge receipt");
    }
}
