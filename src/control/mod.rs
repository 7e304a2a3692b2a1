//! Control Module
//!
//! Orchestrates the protocol for a session:
//! - Message processing (quantize, classify, meter, autotune)
//! - Approval and dismissal commands
//! - Event fan-out with history replay

pub mod hub;
pub mod plane;

pub use hub::{EventHub, EventReceiver, EventSender};
pub use plane::{ControlPlane, ProcessOutcome};
