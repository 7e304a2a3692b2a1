//! Wire Codec
//!
//! Deterministic bidirectional mapping between an anchor plus parameters and
//! the compact textual wire form, e.g. `RequestTask(task:regression_test,target:auth)`.

pub mod codec;
pub mod params;

pub use codec::{normalize_token, DecodedWire, WireCodec, RESERVED_CHARS};
pub use params::WireParams;
