//! Monitoring Module
//!
//! Provides observability for Slipstream:
//! - Tracing subscriber setup
//! - Session statistics

pub mod logging;
pub mod metrics;

pub use logging::{env_filter, init_tracing};
pub use metrics::{Counter, SessionStats, StatsSnapshot, COST_PER_MILLION_TOKENS};
