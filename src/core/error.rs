//! Error types for Slipstream.

use thiserror::Error;

/// Result type alias for Slipstream operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Slipstream operations.
#[derive(Error, Debug)]
pub enum Error {
    // Wire errors
    #[error("Malformed wire: {0}")]
    MalformedWire(String),

    #[error("Reserved character in {field}: {value:?}")]
    ReservedCharacter { field: &'static str, value: String },

    // Registry errors
    #[error("Unknown mnemonic: {0}")]
    UnknownMnemonic(String),

    // Boundary errors
    #[error("Selection unavailable: {0}")]
    SelectionUnavailable(String),

    #[error("Suggestion unavailable: {0}")]
    SuggestionUnavailable(String),

    #[error("Inference request failed: {0}")]
    InferenceFailed(String),

    // Autotuner errors
    #[error("No proposal for mnemonic: {0}")]
    UnknownProposal(String),

    #[error("Proposal {mnemonic} already {status}")]
    ProposalResolved { mnemonic: String, status: String },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::DeserializationError(err.to_string())
        } else {
            Error::SerializationError(err.to_string())
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::InferenceFailed(err.to_string())
    }
}
