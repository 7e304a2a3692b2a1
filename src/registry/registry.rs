//! Anchor registry.
//!
//! Insertion-ordered vocabulary of known anchors, keyed by mnemonic.

use crate::core::{Error, Result};
use crate::registry::anchor::{Anchor, AnchorCategory, AnchorSummary};
use crate::wire::DecodedWire;
use std::collections::HashMap;

/// Authoritative vocabulary of anchors.
///
/// Registering a mnemonic that already exists replaces the entry in place,
/// keeping its original position.
#[derive(Clone, Debug, Default)]
pub struct AnchorRegistry {
    /// Anchors in insertion order
    anchors: Vec<Anchor>,
    /// Mnemonic to position in `anchors`
    index: HashMap<String, usize>,
}

impl AnchorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in vocabulary.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.seed(crate::registry::defaults::default_anchors());
        registry
    }

    /// Insert or replace an anchor.
    pub fn register(&mut self, anchor: Anchor) {
        match self.index.get(&anchor.mnemonic) {
            Some(&position) => self.anchors[position] = anchor,
            None => {
                self.index.insert(anchor.mnemonic.clone(), self.anchors.len());
                self.anchors.push(anchor);
            }
        }
    }

    /// Bulk-register a vocabulary.
    pub fn seed(&mut self, defaults: impl IntoIterator<Item = Anchor>) {
        for anchor in defaults {
            self.register(anchor);
        }
    }

    /// Look up an anchor by mnemonic.
    pub fn lookup(&self, mnemonic: &str) -> Result<&Anchor> {
        self.get(mnemonic)
            .ok_or_else(|| Error::UnknownMnemonic(mnemonic.to_string()))
    }

    /// Look up an anchor, returning None when absent.
    pub fn get(&self, mnemonic: &str) -> Option<&Anchor> {
        self.index.get(mnemonic).map(|&position| &self.anchors[position])
    }

    /// Check whether a mnemonic is registered.
    pub fn contains(&self, mnemonic: &str) -> bool {
        self.index.contains_key(mnemonic)
    }

    /// All anchors in insertion order.
    pub fn all(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Iterate `(mnemonic, anchor)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Anchor)> {
        self.anchors.iter().map(|a| (a.mnemonic.as_str(), a))
    }

    /// Anchors of a category, in insertion order.
    pub fn by_category(&self, category: &AnchorCategory) -> Vec<&Anchor> {
        self.anchors
            .iter()
            .filter(|a| &a.category == category)
            .collect()
    }

    /// Ordered `{mnemonic, definition}` export.
    pub fn summaries(&self) -> Vec<AnchorSummary> {
        self.anchors.iter().map(Anchor::summary).collect()
    }

    /// Semantic check of a decoded wire against this registry.
    pub fn resolve(&self, decoded: &DecodedWire) -> Result<&Anchor> {
        self.lookup(&decoded.mnemonic)
    }

    /// Remove an anchor. Administrative only; the quantization flow never shrinks the registry.
    pub fn remove(&mut self, mnemonic: &str) -> Option<Anchor> {
        let position = self.index.remove(mnemonic)?;
        let removed = self.anchors.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Number of registered anchors.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::WireCodec;

    fn anchor(mnemonic: &str, definition: &str) -> Anchor {
        Anchor::new(mnemonic, definition, AnchorCategory::Request)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = AnchorRegistry::new();
        registry.register(anchor("RequestTask", "Request execution of a task"));

        let found = registry.lookup("RequestTask").unwrap();
        assert_eq!(found.definition, "Request execution of a task");
        assert!(matches!(
            registry.lookup("Missing"),
            Err(Error::UnknownMnemonic(m)) if m == "Missing"
        ));
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = AnchorRegistry::new();
        registry.register(anchor("A", "first"));
        registry.register(anchor("B", "second"));
        registry.register(anchor("A", "replaced"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("A").unwrap().definition, "replaced");
        // Replacement keeps the original slot
        assert_eq!(registry.all()[0].mnemonic, "A");
    }

    #[test]
    fn test_register_idempotent() {
        let mut registry = AnchorRegistry::new();
        registry.register(anchor("A", "same"));
        let snapshot = registry.all().to_vec();
        registry.register(anchor("A", "same"));
        assert_eq!(registry.all(), snapshot.as_slice());
    }

    #[test]
    fn test_insertion_order() {
        let mut registry = AnchorRegistry::new();
        for m in ["Zeta", "Alpha", "Mid"] {
            registry.register(anchor(m, "x"));
        }
        let order: Vec<_> = registry.iter().map(|(m, _)| m).collect();
        assert_eq!(order, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_remove_reindexes() {
        let mut registry = AnchorRegistry::new();
        for m in ["A", "B", "C"] {
            registry.register(anchor(m, "x"));
        }
        assert!(registry.remove("A").is_some());
        assert!(registry.remove("A").is_none());
        assert_eq!(registry.lookup("C").unwrap().mnemonic, "C");
        registry.register(anchor("C", "updated"));
        assert_eq!(registry.all()[1].definition, "updated");
    }

    #[test]
    fn test_resolve_decoded_wire() {
        let registry = AnchorRegistry::with_defaults();
        let known = WireCodec::decode("RequestTask(task:deploy)").unwrap();
        assert_eq!(registry.resolve(&known).unwrap().mnemonic, "RequestTask");

        let unknown = WireCodec::decode("Nonexistent()").unwrap();
        assert!(matches!(
            registry.resolve(&unknown),
            Err(Error::UnknownMnemonic(_))
        ));
    }

    #[test]
    fn test_by_category() {
        let registry = AnchorRegistry::with_defaults();
        let evals = registry.by_category(&AnchorCategory::Eval);
        assert!(evals.len() >= 2);
        assert!(evals.iter().all(|a| a.category == AnchorCategory::Eval));
    }
}
