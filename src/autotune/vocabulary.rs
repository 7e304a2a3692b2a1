//! Shared vocabulary state
//!
//! Bundles the anchor registry, the session's approval sets and the live
//! proposals so that approval updates all three under one exclusive borrow.
//! Wrap it in a single `tokio::sync::RwLock` to share it between tasks: a
//! reader holding the read guard can never see a mnemonic in the approved
//! set while its anchor is missing from the registry.

use crate::autotune::proposal::{Proposal, ProposalStatus};
use crate::autotune::session::SessionState;
use crate::core::{Error, Result};
use crate::registry::{Anchor, AnchorRegistry};
use std::collections::HashMap;

/// Outcome of offering a proposal to the vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// Mnemonic was already approved or dismissed this session
    Resolved,
    /// A pending proposal for the mnemonic is already live
    AlreadyPending,
    /// The registry already holds an anchor with this mnemonic
    AlreadyRegistered,
}

#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    registry: AnchorRegistry,
    session: SessionState,
    proposals: HashMap<String, Proposal>,
}

impl Vocabulary {
    pub fn new(registry: AnchorRegistry) -> Self {
        Self {
            registry,
            session: SessionState::new(),
            proposals: HashMap::new(),
        }
    }

    /// Vocabulary seeded with the built-in anchors.
    pub fn with_defaults() -> Self {
        Self::new(AnchorRegistry::with_defaults())
    }

    pub fn registry(&self) -> &AnchorRegistry {
        &self.registry
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn proposal(&self, mnemonic: &str) -> Option<&Proposal> {
        self.proposals.get(mnemonic)
    }

    /// Pending proposals, oldest first.
    pub fn pending(&self) -> Vec<&Proposal> {
        let mut pending: Vec<&Proposal> =
            self.proposals.values().filter(|p| p.is_pending()).collect();
        pending.sort_by(|a, b| a.created.cmp(&b.created).then(a.mnemonic.cmp(&b.mnemonic)));
        pending
    }

    /// Whether a new proposal for `mnemonic` would be admitted.
    pub fn check(&self, mnemonic: &str) -> Admission {
        if self.session.is_resolved(mnemonic) {
            Admission::Resolved
        } else if self.proposals.get(mnemonic).is_some_and(Proposal::is_pending) {
            Admission::AlreadyPending
        } else if self.registry.contains(mnemonic) {
            Admission::AlreadyRegistered
        } else {
            Admission::Admitted
        }
    }

    /// Record a proposal unless it would duplicate or revive a resolved one.
    pub fn admit(&mut self, proposal: Proposal) -> Admission {
        let admission = self.check(&proposal.mnemonic);
        if admission == Admission::Admitted {
            self.proposals.insert(proposal.mnemonic.clone(), proposal);
        }
        admission
    }

    /// Approve the pending proposal for `mnemonic`.
    ///
    /// Marks the proposal approved, adds the mnemonic to the session's
    /// approved set and registers the anchor in one step.
    pub fn approve(&mut self, mnemonic: &str) -> Result<Anchor> {
        let proposal = self
            .proposals
            .get_mut(mnemonic)
            .ok_or_else(|| Error::UnknownProposal(mnemonic.to_string()))?;
        proposal.approve()?;
        let anchor = proposal.to_anchor();

        self.session.insert_approved(mnemonic);
        self.registry.register(anchor.clone());
        Ok(anchor)
    }

    /// Dismiss `mnemonic`, suppressing it for the rest of the session.
    ///
    /// A mnemonic with no live proposal can still be dismissed up front.
    /// Dismissing twice is a no-op; dismissing an approved mnemonic fails.
    pub fn dismiss(&mut self, mnemonic: &str) -> Result<()> {
        if self.session.is_approved(mnemonic) {
            return Err(Error::ProposalResolved {
                mnemonic: mnemonic.to_string(),
                status: ProposalStatus::Approved.to_string(),
            });
        }
        if self.session.is_dismissed(mnemonic) {
            return Ok(());
        }
        if let Some(proposal) = self.proposals.get_mut(mnemonic) {
            proposal.dismiss()?;
        }
        self.session.insert_dismissed(mnemonic);
        Ok(())
    }

    /// Administrative registration outside the proposal flow.
    pub fn register(&mut self, anchor: Anchor) {
        self.registry.register(anchor);
    }

    /// Administrative removal. Session sets are left untouched.
    pub fn remove(&mut self, mnemonic: &str) -> Option<Anchor> {
        self.registry.remove(mnemonic)
    }
}
