//! Core utilities and common types for Slipstream.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
