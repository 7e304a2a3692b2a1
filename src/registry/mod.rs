//! Anchor Registry
//!
//! The shared vocabulary of intents:
//! - Anchor and category taxonomy
//! - Insertion-ordered registry with replace-on-register semantics
//! - Built-in starter and fallback vocabularies

pub mod anchor;
pub mod defaults;
#[allow(clippy::module_inception)]
pub mod registry;

pub use anchor::{Anchor, AnchorCategory, AnchorSummary};
pub use defaults::{default_anchors, fallback_summaries};
pub use registry::AnchorRegistry;
