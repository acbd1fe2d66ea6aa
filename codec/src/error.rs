//! Error types for the codec layer.
//!
//! Every fallible operation in this crate returns a [`CodecError`]. The
//! variants fall into three groups a caller usually wants to tell apart:
//!
//! - programming errors: [`CodecError::UnknownType`],
//!   [`CodecError::DuplicateType`], [`CodecError::RegistryFrozen`],
//!   [`CodecError::MissingNonce`]
//! - data errors: [`CodecError::Range`], [`CodecError::Malformed`] and the
//!   wrapped decoder failures
//! - capability gaps: [`CodecError::UnsupportedOperation`]

use thiserror::Error;

/// Errors raised by the signing and wire codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A nonce component does not fit the transport representation.
    #[error("{field} {value} is out of range: at most {max_digits} decimal digits allowed")]
    Range {
        /// Which nonce component failed (`account_number` or `sequence`).
        field: &'static str,
        /// The offending value as received.
        value: String,
        /// The configured digit bound.
        max_digits: usize,
    },

    /// A type URL was registered twice.
    #[error("message type already registered: {type_url}")]
    DuplicateType { type_url: String },

    /// A type URL (or legacy type name) has no registered codec.
    #[error("unknown message type: {type_url}")]
    UnknownType { type_url: String },

    /// Registration attempted after the registry served its first lookup.
    #[error("registry is frozen, cannot register {type_url}")]
    RegistryFrozen { type_url: String },

    /// Parsing legacy postable bytes requires an out-of-band nonce.
    #[error("nonce is required to parse a legacy transaction")]
    MissingNonce,

    /// The operation has no well-defined implementation for this format.
    #[error("unsupported operation {operation}: {reason}")]
    UnsupportedOperation {
        operation: &'static str,
        reason: String,
    },

    /// The input has the wrong shape for the format being decoded.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// Binary envelope decoding failed.
    #[error("binary decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A base64 field on the wire could not be decoded.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// An address string failed bech32 decoding or has the wrong payload.
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A fee amount names a ticker missing from the token table.
    #[error("unknown token ticker: {ticker}")]
    UnknownToken { ticker: String },

    /// A wire coin names a denom missing from the token table.
    #[error("unknown denom: {denom}")]
    UnknownDenom { denom: String },

    /// An amount's fractional digits disagree with the token table.
    #[error("wrong fractional digits for {ticker}: expected {expected}, got {got}")]
    FractionalDigits {
        ticker: String,
        expected: u32,
        got: u32,
    },

    /// The signer could not produce a signature.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CodecError>;
