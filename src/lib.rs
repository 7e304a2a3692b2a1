//! # Slipstream - Semantic Quantization for Agent Traffic
//!
//! Compresses verbose inter-agent messages into compact anchor-coded wire
//! forms such as `RequestTask(task:regression_test,target:auth)`:
//! - **Registry**: the live vocabulary of reusable intents (anchors)
//! - **Wire**: exact, invertible encoding of an anchor plus parameters
//! - **Quantizer**: pluggable anchor selection with a raw-text fallback
//! - **Autotune**: proposes new anchors for a human to approve or dismiss
//! - **Traffic**: classification and token-savings accounting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slipstream::config::SlipstreamConfig;
//! use slipstream::control::ControlPlane;
//! use slipstream::core::AgentMessage;
//!
//! #[tokio::main]
//! async fn main() -> slipstream::Result<()> {
//!     let plane = ControlPlane::from_env(&SlipstreamConfig::default())?;
//!     let outcome = plane
//!         .process(AgentMessage::new("QA", "Executor", "Running regression suite on Authentication module"))
//!         .await;
//!     println!("{} ({}% saved)", outcome.traffic.wire, outcome.traffic.metrics.savings_pct);
//!     Ok(())
//! }
//! ```

pub mod autotune;
pub mod config;
pub mod control;
pub mod core;
pub mod inference;
pub mod monitoring;
pub mod quantizer;
pub mod registry;
pub mod traffic;
pub mod wire;

pub use core::error::{Error, Result};
