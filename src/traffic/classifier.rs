//! Traffic classification.
//!
//! An ordered list of keyword rules; the first rule whose keywords appear in
//! the message (case-insensitive substring) decides the label.

use serde::{Deserialize, Serialize};

/// Observability label for a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficStatus {
    Success,
    Disagreement,
    Recovery,
}

impl std::fmt::Display for TrafficStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrafficStatus::Success => write!(f, "success"),
            TrafficStatus::Disagreement => write!(f, "disagreement"),
            TrafficStatus::Recovery => write!(f, "recovery"),
        }
    }
}

/// One classification rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub keywords: Vec<String>,
    pub status: TrafficStatus,
}

impl ClassificationRule {
    pub fn new(keywords: &[&str], status: TrafficStatus) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            status,
        }
    }

    /// `lowered` must already be lowercase.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

pub const DISAGREEMENT_KEYWORDS: &[&str] = &["critical", "reject", "regression", "fail"];
pub const RECOVERY_KEYWORDS: &[&str] = &["recovery", "rollback", "refactoring"];

#[derive(Clone, Debug, PartialEq)]
pub struct TrafficClassifier {
    rules: Vec<ClassificationRule>,
    default_status: TrafficStatus,
}

impl TrafficClassifier {
    /// Classifier with no rules; everything is `Success`.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            default_status: TrafficStatus::Success,
        }
    }

    /// Append a rule at the lowest priority.
    pub fn with_rule(mut self, rule: ClassificationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn classify(&self, text: &str) -> TrafficStatus {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.status)
            .unwrap_or(self.default_status)
    }
}

impl Default for TrafficClassifier {
    fn default() -> Self {
        Self::empty()
            .with_rule(ClassificationRule::new(DISAGREEMENT_KEYWORDS, TrafficStatus::Disagreement))
            .with_rule(ClassificationRule::new(RECOVERY_KEYWORDS, TrafficStatus::Recovery))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let classifier = TrafficClassifier::default();
        assert_eq!(
            classifier.classify("Running regression suite on Authentication module"),
            TrafficStatus::Disagreement
        );
        assert_eq!(
            classifier.classify("Initiating rollback to v2.3"),
            TrafficStatus::Recovery
        );
        assert_eq!(classifier.classify("Deploy finished."), TrafficStatus::Success);
    }

    #[test]
    fn test_disagreement_wins_over_recovery() {
        let classifier = TrafficClassifier::default();
        assert_eq!(
            classifier.classify("I reject this plan, start the rollback"),
            TrafficStatus::Disagreement
        );
    }

    #[test]
    fn test_case_insensitive_substring() {
        let classifier = TrafficClassifier::default();
        assert_eq!(classifier.classify("CRITICAL leak"), TrafficStatus::Disagreement);
        assert_eq!(classifier.classify("tests are Failing"), TrafficStatus::Disagreement);
        assert_eq!(classifier.classify("Refactoring the parser"), TrafficStatus::Recovery);
    }

    #[test]
    fn test_custom_rule_order() {
        let classifier = TrafficClassifier::empty()
            .with_rule(ClassificationRule::new(&["Rollback"], TrafficStatus::Recovery))
            .with_rule(ClassificationRule::new(&["reject"], TrafficStatus::Disagreement));
        assert_eq!(classifier.classify("reject, then rollback"), TrafficStatus::Recovery);
        assert!(TrafficClassifier::empty().rules().is_empty());
    }
}
