//! Core value types shared by every part of the codec.
//!
//! These are plain data carriers. Nothing here knows about wire formats;
//! the encoders in [`crate::canonical`], [`crate::legacy`] and
//! [`crate::sign_doc`] decide how each field turns into bytes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::nonce::Nonce;

// ---------------------------------------------------------------------------
// Keys & identities
// ---------------------------------------------------------------------------

/// Signature algorithm a public key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    Secp256k1,
    Ed25519,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secp256k1 => write!(f, "secp256k1"),
            Self::Ed25519 => write!(f, "ed25519"),
        }
    }
}

/// A public key tagged with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    pub algo: KeyAlgorithm,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

impl PublicKey {
    pub fn new(algo: KeyAlgorithm, data: impl Into<Vec<u8>>) -> Self {
        Self {
            algo,
            data: data.into(),
        }
    }
}

/// A key on a specific chain. Borrowed by the codec, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub chain_id: String,
    pub pubkey: PublicKey,
}

// ---------------------------------------------------------------------------
// Messages & fees
// ---------------------------------------------------------------------------

/// One message of a transaction: a type URL and its structured payload.
///
/// The payload is opaque to the codec; the codec registered for `type_url`
/// in [`crate::registry::MessageRegistry`] decides how it is encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedMessage {
    pub type_url: String,
    pub value: Value,
}

impl TypedMessage {
    pub fn new(type_url: impl Into<String>, value: Value) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }
}

/// Metadata for one fee token: the user-facing ticker and the chain denom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub ticker: String,
    pub denom: String,
    pub fractional_digits: u32,
}

/// An amount in atomic units of the token named by `token_ticker`.
///
/// `quantity` is a decimal string so values beyond 2^53 survive JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub quantity: String,
    pub fractional_digits: u32,
    pub token_ticker: String,
}

impl Amount {
    pub fn new(
        quantity: impl Into<String>,
        fractional_digits: u32,
        token_ticker: impl Into<String>,
    ) -> Self {
        Self {
            quantity: quantity.into(),
            fractional_digits,
            token_ticker: token_ticker.into(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.token_ticker)
    }
}

/// Transaction fee: what is paid and how much gas it buys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fee {
    pub tokens: Vec<Amount>,
    pub gas_limit: String,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// A transaction before signing.
///
/// An empty `messages` list is never useful on chain but still encodes
/// deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub chain_id: String,
    #[serde(default)]
    pub memo: String,
    pub messages: Vec<TypedMessage>,
    #[serde(default)]
    pub fee: Fee,
}

/// A signature together with the key and nonce it was made with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullSignature {
    pub pubkey: PublicKey,
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
    pub nonce: Nonce,
}

/// An unsigned transaction plus one or more signatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    pub signatures: Vec<FullSignature>,
}

// ---------------------------------------------------------------------------
// Signing jobs & wire bytes
// ---------------------------------------------------------------------------

/// Hash the signer must apply to [`SigningJob::bytes`] before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrehashType {
    None,
    Sha256,
}

/// The exact bytes an external signer must sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningJob {
    pub bytes: Vec<u8>,
    pub prehash: PrehashType,
}

/// Which scheme produced a set of postable bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireFormat {
    /// `{"type":"cosmos-sdk/StdTx","value":{...}}` JSON.
    LegacyJson,
    /// Length-prefixed binary `TxRaw`.
    Binary,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyJson => write!(f, "legacy-json"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Finalized bytes ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostableBytes {
    pub format: WireFormat,
    pub bytes: Vec<u8>,
}

impl PostableBytes {
    pub fn legacy(bytes: Vec<u8>) -> Self {
        Self {
            format: WireFormat::LegacyJson,
            bytes,
        }
    }

    pub fn binary(bytes: Vec<u8>) -> Self {
        Self {
            format: WireFormat::Binary,
            bytes,
        }
    }
}

/// Upper-case hex transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bech32 account address.
pub type Address = String;

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
