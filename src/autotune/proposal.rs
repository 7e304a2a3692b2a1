//! Anchor proposals and their lifecycle.
//!
//! ```text
//! Pending --approve--> Approved
//! Pending --dismiss--> Dismissed
//! ```
//!
//! Both transitions are terminal.

use crate::core::{now, Error, MessageId, Result, Timestamp};
use crate::registry::{Anchor, AnchorCategory};
use serde::{Deserialize, Serialize};

/// How the proposal was derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalOrigin {
    /// Derived from message keywords
    RuleBased,
    /// Suggested by the inference service
    InferenceDerived,
}

/// Lifecycle state of a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Dismissed,
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalStatus::Pending => write!(f, "pending"),
            ProposalStatus::Approved => write!(f, "approved"),
            ProposalStatus::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// A candidate anchor awaiting a human decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Proposal identifier
    pub id: MessageId,
    pub mnemonic: String,
    pub definition: String,
    pub category: AnchorCategory,
    /// Traffic message whose fallback triggered this proposal
    pub trigger_message_id: MessageId,
    pub origin: ProposalOrigin,
    pub status: ProposalStatus,
    /// Illustrative messages the anchor would cover
    pub example_messages: Vec<String>,
    pub created: Timestamp,
}

impl Proposal {
    /// Create a pending proposal.
    pub fn new(
        mnemonic: &str,
        definition: &str,
        category: AnchorCategory,
        trigger_message_id: MessageId,
        origin: ProposalOrigin,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            mnemonic: mnemonic.to_string(),
            definition: definition.to_string(),
            category,
            trigger_message_id,
            origin,
            status: ProposalStatus::Pending,
            example_messages: Vec::new(),
            created: now(),
        }
    }

    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.example_messages = examples;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == ProposalStatus::Pending
    }

    /// Anchor this proposal would register.
    pub fn to_anchor(&self) -> Anchor {
        Anchor::new(&self.mnemonic, &self.definition, self.category.clone())
    }

    /// Transition Pending -> Approved.
    pub fn approve(&mut self) -> Result<()> {
        self.transition(ProposalStatus::Approved)
    }

    /// Transition Pending -> Dismissed.
    pub fn dismiss(&mut self) -> Result<()> {
        self.transition(ProposalStatus::Dismissed)
    }

    fn transition(&mut self, to: ProposalStatus) -> Result<()> {
        if !self.is_pending() {
            return Err(Error::ProposalResolved {
                mnemonic: self.mnemonic.clone(),
                status: self.status.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}
