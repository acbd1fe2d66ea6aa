//! # Codec Configuration & Constants
//!
//! Every wire-format tag and numeric bound the codec relies on lives here.
//! Changing any of these changes the bytes that get signed, so treat them
//! as part of the network protocol rather than as tuning knobs.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::types::TokenInfo;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Default bech32 human-readable prefix.
pub const DEFAULT_PREFIX: &str = "cosmos";

/// Length of the ripemd160(sha256(pubkey)) digest encoded in an address.
pub const ADDRESS_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Nonce
// ---------------------------------------------------------------------------

/// Largest number of decimal digits a nonce component may have.
///
/// 15 digits stays below 2^53, so a JSON reader that parses numbers into
/// doubles still gets the exact value back.
pub const MAX_NONCE_DIGITS: usize = 15;

/// Upper bound accepted by [`CodecConfig::validate`] for the digit limit.
/// `u64::MAX` has 20 digits; 18 keeps every accepted value inside i64.
pub const MAX_CONFIGURABLE_NONCE_DIGITS: usize = 18;

// ---------------------------------------------------------------------------
// Legacy (amino JSON) wire tags
// ---------------------------------------------------------------------------

/// Wrapper type of a legacy signed transaction on the wire.
pub const STD_TX_TYPE: &str = "cosmos-sdk/StdTx";

/// Amino JSON tag of a secp256k1 public key.
pub const PUBKEY_SECP256K1_TYPE: &str = "tendermint/PubKeySecp256k1";

/// Amino JSON tag of an ed25519 public key.
pub const PUBKEY_ED25519_TYPE: &str = "tendermint/PubKeyEd25519";

// ---------------------------------------------------------------------------
// Direct (binary) wire tags
// ---------------------------------------------------------------------------

/// `Any` type URL of a secp256k1 public key in signer infos.
pub const PUBKEY_SECP256K1_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// `Any` type URL of an ed25519 public key in signer infos.
pub const PUBKEY_ED25519_TYPE_URL: &str = "/cosmos.crypto.ed25519.PubKey";

/// `SignMode` value of the direct scheme.
pub const SIGN_MODE_DIRECT: i32 = 1;

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Ticker of the default fee token.
pub const DEFAULT_TICKER: &str = "ATOM";

/// On-chain denom of the default fee token.
pub const DEFAULT_DENOM: &str = "uatom";

/// Fractional digits of the default fee token.
pub const DEFAULT_FRACTIONAL_DIGITS: u32 = 6;

/// The token table used when nothing else is configured.
pub fn default_tokens() -> Vec<TokenInfo> {
    vec![TokenInfo {
        ticker: DEFAULT_TICKER.to_string(),
        denom: DEFAULT_DENOM.to_string(),
        fractional_digits: DEFAULT_FRACTIONAL_DIGITS,
    }]
}

// ---------------------------------------------------------------------------
// CodecConfig
// ---------------------------------------------------------------------------

/// A message kind the application wants registered at startup.
///
/// Used by front ends that register payloads through the generic JSON codec;
/// applications with real binary schemas register their codecs directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTypeConfig {
    /// Binary envelope type identifier, e.g. `/cosmos.bank.v1beta1.MsgSend`.
    pub type_url: String,
    /// Name used in the legacy JSON scheme, e.g. `cosmos-sdk/MsgSend`.
    #[serde(default)]
    pub legacy_type: Option<String>,
}

/// Runtime configuration for a [`crate::codec::TransactionCodec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Bech32 prefix for derived addresses.
    pub prefix: String,
    /// Token metadata table used to translate fees.
    pub tokens: Vec<TokenInfo>,
    /// Digit bound for nonce components.
    pub max_nonce_digits: usize,
    /// Message kinds to register with the generic JSON codec.
    pub messages: Vec<MessageTypeConfig>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            tokens: default_tokens(),
            max_nonce_digits: MAX_NONCE_DIGITS,
            messages: Vec::new(),
        }
    }
}

impl CodecConfig {
    /// Parses a JSON configuration document. Missing fields take defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the codec cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(CodecError::Malformed("prefix must not be empty".into()));
        }
        if self.max_nonce_digits == 0 || self.max_nonce_digits > MAX_CONFIGURABLE_NONCE_DIGITS {
            return Err(CodecError::Malformed(format!(
                "max_nonce_digits must be within 1..={}, got {}",
                MAX_CONFIGURABLE_NONCE_DIGITS, self.max_nonce_digits
            )));
        }
        for (i, token) in self.tokens.iter().enumerate() {
            if self.tokens[..i].iter().any(|t| t.ticker == token.ticker) {
                return Err(CodecError::Malformed(format!(
                    "duplicate token ticker {}",
                    token.ticker
                )));
            }
        }
        Ok(())
    }
}
