//! Quantizer
//!
//! Semantic quantization of verbose messages:
//! - Pluggable `SelectionStrategy` boundary
//! - Deterministic keyword selector
//! - Inference-service selector
//! - Quantizer with acceptance threshold, bounded timeout and backup strategy

pub mod factory;
pub mod inference;
pub mod keyword;
pub mod keywords;
#[allow(clippy::module_inception)]
pub mod quantizer;
pub mod strategy;

pub use factory::{create_quantizer, create_selection_strategy};
pub use inference::InferenceSelector;
pub use keyword::KeywordSelector;
pub use quantizer::{Fallback, FallbackReason, Quantization, QuantizationResult, Quantizer};
pub use strategy::{Selection, SelectionStrategy};
