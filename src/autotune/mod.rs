//! Autotune Module
//!
//! Proposes new anchors when messages fall back:
//! - Suggestion strategies (keyword-derived or inference-derived)
//! - Proposal lifecycle (pending, approved, dismissed)
//! - Session approval state and the shared vocabulary

pub mod autotuner;
pub mod proposal;
pub mod session;
pub mod suggest;
pub mod vocabulary;

pub use autotuner::Autotuner;
pub use proposal::{Proposal, ProposalOrigin, ProposalStatus};
pub use session::SessionState;
pub use suggest::{
    create_suggestion_strategy, InferenceSuggester, KeywordSuggester, Suggestion, SuggestionStrategy,
};
pub use vocabulary::{Admission, Vocabulary};
