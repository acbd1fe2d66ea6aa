//! The transaction codec façade.
//!
//! [`TransactionCodec`] ties the pieces together for one network: its
//! bech32 prefix, its fee token table and the shared message registry.
//!
//! ## Legacy flow
//!
//! 1. [`bytes_to_sign`](TransactionCodec::bytes_to_sign): canonical JSON
//!    sign bytes, prehash SHA-256.
//! 2. An external [`crate::signer::Signer`] signs them.
//! 3. [`bytes_to_post`](TransactionCodec::bytes_to_post): wrapped StdTx JSON.
//! 4. [`parse_bytes`](TransactionCodec::parse_bytes): back to a
//!    [`SignedTransaction`], given the nonce the wire format lacks.
//!
//! ## Direct flow
//!
//! [`tx_body_bytes`](TransactionCodec::tx_body_bytes) and
//! [`auth_info_bytes`](TransactionCodec::auth_info_bytes), then
//! [`direct_bytes_to_sign`](TransactionCodec::direct_bytes_to_sign) and
//! [`direct_bytes_to_post`](TransactionCodec::direct_bytes_to_post).

use std::sync::Arc;

use bech32::Hrp;

use crate::address;
use crate::canonical::CanonicalJsonSigner;
use crate::config::CodecConfig;
use crate::direct;
use crate::error::{CodecError, Result};
use crate::legacy;
use crate::nonce::{Nonce, NonceCodec};
use crate::registry::{json_codec, MessageRegistry};
use crate::sign_doc::BinarySignDocBuilder;
use crate::types::{
    Address, Fee, Identity, PostableBytes, PrehashType, PublicKey, SignedTransaction, SigningJob,
    TokenInfo, TransactionId, UnsignedTransaction, WireFormat,
};

/// Stateless codec bound to one network's prefix and token table.
#[derive(Debug, Clone)]
pub struct TransactionCodec {
    prefix: String,
    tokens: Vec<TokenInfo>,
    nonces: NonceCodec,
    registry: Arc<MessageRegistry>,
}

impl TransactionCodec {
    /// Creates a codec. Fails if `prefix` is not a valid bech32 prefix.
    pub fn new(
        prefix: impl Into<String>,
        tokens: Vec<TokenInfo>,
        registry: Arc<MessageRegistry>,
    ) -> Result<Self> {
        let prefix = prefix.into();
        Hrp::parse(&prefix).map_err(|e| CodecError::InvalidAddress {
            address: prefix.clone(),
            reason: format!("invalid prefix: {e}"),
        })?;
        Ok(Self {
            prefix,
            tokens,
            nonces: NonceCodec::default(),
            registry,
        })
    }

    /// Builds a codec from configuration.
    ///
    /// Message kinds listed in the config are registered with the generic
    /// JSON codec, so this must run before the registry is first used.
    pub fn from_config(config: &CodecConfig, registry: Arc<MessageRegistry>) -> Result<Self> {
        config.validate()?;
        let mut codec = Self::new(config.prefix.clone(), config.tokens.clone(), registry)?;
        codec.nonces = NonceCodec::new(config.max_nonce_digits);
        for message in &config.messages {
            let mut entry = json_codec();
            if let Some(legacy_type) = &message.legacy_type {
                entry = entry.with_legacy_type(legacy_type.clone());
            }
            codec
                .registry
                .register_codec(message.type_url.clone(), entry)?;
        }
        Ok(codec)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    pub fn registry(&self) -> &MessageRegistry {
        &self.registry
    }

    /// Nonce codec using this codec's digit bound.
    pub fn nonces(&self) -> &NonceCodec {
        &self.nonces
    }

    // -----------------------------------------------------------------------
    // Legacy scheme
    // -----------------------------------------------------------------------

    /// Canonical JSON sign bytes for `unsigned` at `nonce`.
    ///
    /// Fails with [`CodecError::Range`] if `nonce` exceeds this codec's
    /// digit bound, even when it was built under a wider one.
    pub fn bytes_to_sign(&self, unsigned: &UnsignedTransaction, nonce: &Nonce) -> Result<SigningJob> {
        self.nonces.validate(nonce)?;
        let fee = serde_json::to_value(legacy::encode_fee(&unsigned.fee, &self.tokens)?)?;
        let bytes = CanonicalJsonSigner.build_sign_bytes(&self.registry, unsigned, nonce, &fee)?;
        Ok(SigningJob {
            bytes,
            prehash: PrehashType::Sha256,
        })
    }

    /// JSON-wrapped StdTx ready for broadcast.
    ///
    /// At least one signature is expected; an unsigned transaction is
    /// encoded anyway and will be rejected by the network.
    pub fn bytes_to_post(&self, signed: &SignedTransaction) -> Result<PostableBytes> {
        if signed.signatures.is_empty() {
            tracing::warn!(chain_id = %signed.transaction.chain_id, "encoding transaction without signatures");
        }
        let wrapped = legacy::build_signed_tx(&self.registry, signed, &self.tokens)?;
        let bytes = legacy::marshal_tx(&wrapped)?;
        tracing::debug!(len = bytes.len(), signatures = signed.signatures.len(), "built legacy postable bytes");
        Ok(PostableBytes::legacy(bytes))
    }

    /// Parses legacy postable bytes.
    ///
    /// The wire format has no account number or sequence, so `nonce` is
    /// mandatory; `None` fails with [`CodecError::MissingNonce`].
    pub fn parse_bytes(
        &self,
        bytes: &PostableBytes,
        chain_id: &str,
        nonce: Option<Nonce>,
    ) -> Result<SignedTransaction> {
        let nonce = nonce.ok_or(CodecError::MissingNonce)?;
        self.nonces.validate(&nonce)?;
        if bytes.format != WireFormat::LegacyJson {
            return Err(CodecError::UnsupportedOperation {
                operation: "parse_bytes",
                reason: format!("cannot parse {} bytes as a legacy transaction", bytes.format),
            });
        }
        let wrapped = legacy::unmarshal_tx(&bytes.bytes)?;
        legacy::parse_tx(&self.registry, &wrapped, chain_id, nonce, &self.tokens)
    }

    /// Transaction hash of a legacy transaction.
    ///
    /// The network hashes the binary amino encoding of the StdTx, which
    /// this crate does not implement, so this always fails rather than
    /// returning a hash of the JSON bytes.
    pub fn identifier(&self, _signed: &SignedTransaction) -> Result<TransactionId> {
        Err(CodecError::UnsupportedOperation {
            operation: "identifier",
            reason: "legacy transaction ids require the binary amino encoding".into(),
        })
    }

    // -----------------------------------------------------------------------
    // Direct scheme
    // -----------------------------------------------------------------------

    /// Encoded `TxBody` for the messages and memo of `unsigned`.
    pub fn tx_body_bytes(&self, unsigned: &UnsignedTransaction, timeout_height: u64) -> Result<Vec<u8>> {
        direct::encode_tx_body(&self.registry, &unsigned.messages, &unsigned.memo, timeout_height)
    }

    /// Encoded `AuthInfo` for direct-mode signers at `sequence`, paying
    /// `fee` through this codec's token table.
    pub fn auth_info_bytes(&self, pubkeys: &[PublicKey], fee: &Fee, sequence: u64) -> Result<Vec<u8>> {
        direct::encode_auth_info(pubkeys, fee, sequence, &self.tokens)
    }

    pub fn direct_bytes_to_sign(
        &self,
        body_bytes: &[u8],
        auth_info_bytes: &[u8],
        chain_id: &str,
        nonce: &Nonce,
    ) -> SigningJob {
        BinarySignDocBuilder.signing_job(body_bytes, auth_info_bytes, chain_id, nonce)
    }

    pub fn direct_bytes_to_post(
        &self,
        body_bytes: Vec<u8>,
        auth_info_bytes: Vec<u8>,
        signatures: Vec<Vec<u8>>,
    ) -> PostableBytes {
        direct::build_tx_raw(body_bytes, auth_info_bytes, signatures)
    }

    /// Hash of direct postable bytes.
    pub fn direct_identifier(&self, bytes: &PostableBytes) -> Result<TransactionId> {
        direct::tx_raw_identifier(bytes)
    }

    // -----------------------------------------------------------------------
    // Addresses
    // -----------------------------------------------------------------------

    pub fn identity_to_address(&self, identity: &Identity) -> Result<Address> {
        address::pubkey_to_address(&identity.pubkey, &self.prefix)
    }

    pub fn is_valid_address(&self, candidate: &str) -> bool {
        address::is_valid_address(candidate)
    }
}
