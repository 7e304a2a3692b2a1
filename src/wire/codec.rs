//! Wire codec.
//!
//! Grammar:
//!
//! ```text
//! wire  := mnemonic "(" [ param ("," param)* ] ")"
//! param := key ":" value
//! ```
//!
//! Mnemonics, keys and values never contain `(`, `)`, `,` or `:`. Decoding is
//! purely syntactic; checking the mnemonic against a registry is left to
//! [`AnchorRegistry::resolve`](crate::registry::AnchorRegistry::resolve).

use crate::core::{Error, Result};
use crate::wire::params::WireParams;
use serde::{Deserialize, Serialize};

/// Characters with structural meaning in the wire grammar.
pub const RESERVED_CHARS: [char; 4] = ['(', ')', ',', ':'];

/// Result of decoding a wire string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedWire {
    /// Anchor mnemonic as written on the wire
    pub mnemonic: String,
    /// Parameters in wire order
    pub params: WireParams,
}

/// Stateless encoder/decoder for the compact wire form.
pub struct WireCodec;

impl WireCodec {
    /// Encode an anchor mnemonic and its parameters.
    ///
    /// Rejects any mnemonic, key or value containing a reserved character.
    pub fn encode(mnemonic: &str, params: &WireParams) -> Result<String> {
        check_token("mnemonic", mnemonic, false)?;

        let mut wire = String::with_capacity(mnemonic.len() + 2 + params.len() * 8);
        wire.push_str(mnemonic);
        wire.push('(');
        for (i, (key, value)) in params.iter().enumerate() {
            check_token("key", key, false)?;
            check_token("value", value, true)?;
            if i > 0 {
                wire.push(',');
            }
            wire.push_str(key);
            wire.push(':');
            wire.push_str(value);
        }
        wire.push(')');
        Ok(wire)
    }

    /// Decode a wire string into its mnemonic and parameters.
    pub fn decode(wire: &str) -> Result<DecodedWire> {
        let open = wire
            .find('(')
            .ok_or_else(|| malformed(wire, "missing '('"))?;
        if !wire.ends_with(')') {
            return Err(malformed(wire, "missing closing ')'"));
        }

        let mnemonic = &wire[..open];
        if mnemonic.is_empty() {
            return Err(malformed(wire, "empty mnemonic"));
        }
        if mnemonic.contains(RESERVED_CHARS) {
            return Err(malformed(wire, "reserved character in mnemonic"));
        }

        let inner = &wire[open + 1..wire.len() - 1];
        if inner.contains(['(', ')']) {
            return Err(malformed(wire, "unbalanced parentheses"));
        }

        let mut params = WireParams::new();
        if !inner.is_empty() {
            for param in inner.split(',') {
                let (key, value) = param
                    .split_once(':')
                    .ok_or_else(|| malformed(wire, "parameter without ':'"))?;
                if key.is_empty() {
                    return Err(malformed(wire, "empty parameter key"));
                }
                if value.contains(':') {
                    return Err(malformed(wire, "extra ':' in parameter"));
                }
                if params.contains_key(key) {
                    return Err(malformed(wire, "duplicate parameter key"));
                }
                params.insert(key, value);
            }
        }

        Ok(DecodedWire {
            mnemonic: mnemonic.to_string(),
            params,
        })
    }

    /// Check whether a string parses as a wire.
    pub fn is_wire(text: &str) -> bool {
        Self::decode(text).is_ok()
    }
}

/// Normalize free text into a wire-safe token.
///
/// Whitespace runs become `_` and reserved characters are dropped.
pub fn normalize_token(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.replace(RESERVED_CHARS, ""))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn check_token(field: &'static str, value: &str, allow_empty: bool) -> Result<()> {
    if (!allow_empty && value.is_empty()) || value.contains(RESERVED_CHARS) {
        return Err(Error::ReservedCharacter {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn malformed(wire: &str, reason: &str) -> Error {
    Error::MalformedWire(format!("{reason} in {wire:?}"))
}
