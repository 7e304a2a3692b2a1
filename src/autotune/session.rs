//! Session state: mnemonics the operator has decided on.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Approved and dismissed mnemonics for the life of the process.
///
/// Sets only grow; a mnemonic in either set is never proposed again.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionState {
    approved: HashSet<String>,
    dismissed: HashSet<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_approved(&self, mnemonic: &str) -> bool {
        self.approved.contains(mnemonic)
    }

    pub fn is_dismissed(&self, mnemonic: &str) -> bool {
        self.dismissed.contains(mnemonic)
    }

    /// Whether a decision has been recorded for this mnemonic.
    pub fn is_resolved(&self, mnemonic: &str) -> bool {
        self.is_approved(mnemonic) || self.is_dismissed(mnemonic)
    }

    pub(crate) fn insert_approved(&mut self, mnemonic: &str) {
        self.approved.insert(mnemonic.to_string());
    }

    pub(crate) fn insert_dismissed(&mut self, mnemonic: &str) {
        self.dismissed.insert(mnemonic.to_string());
    }

    /// Approved mnemonics, sorted.
    pub fn approved(&self) -> Vec<String> {
        let mut out: Vec<_> = self.approved.iter().cloned().collect();
        out.sort();
        out
    }

    /// Dismissed mnemonics, sorted.
    pub fn dismissed(&self) -> Vec<String> {
        let mut out: Vec<_> = self.dismissed.iter().cloned().collect();
        out.sort();
        out
    }
}
