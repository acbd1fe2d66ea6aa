// Copyright (c) 2026 CosmWasm Codec Contributors. Apache-2.0 License.
// See LICENSE for details.

//! # CosmWasm Codec: Transaction Signing & Wire Formats
//!
//! Client-side construction and parsing of transactions for CosmWasm-based
//! proof-of-stake chains. The crate turns an unsigned transaction into the
//! exact bytes a key must sign, turns signatures into broadcastable bytes,
//! and parses those bytes back.
//!
//! Two signing schemes coexist on these networks:
//!
//! - **legacy**: canonical JSON (sorted keys, compact) of an amino StdSignDoc,
//!   broadcast as a JSON-wrapped StdTx;
//! - **direct**: a length-prefixed binary SignDoc over encoded body and auth
//!   info bytes, broadcast as a binary TxRaw.
//!
//! ## Modules
//!
//! - **address**: bech32 addresses from public keys; validation.
//! - **nonce**: account number and sequence packed into one nonce.
//! - **registry**: type URL → pluggable message encode/decode.
//! - **canonical**: legacy canonical JSON sign bytes.
//! - **sign_doc**: direct binary sign documents.
//! - **legacy** / **direct**: the two wire formats.
//! - **codec**: [`TransactionCodec`], the façade over all of the above.
//! - **signer**: signer and transport seams, plus a reference signer.
//! - **config**: constants and [`CodecConfig`].
//!
//! Signing keys, network transport and concrete message schemas live
//! outside this crate and plug in through [`signer::Signer`],
//! [`signer::Transport`] and [`registry::MessageRegistry`].

pub mod address;
pub mod canonical;
pub mod codec;
pub mod config;
pub mod direct;
pub mod error;
pub mod legacy;
pub mod nonce;
pub mod registry;
pub mod sign_doc;
pub mod signer;
pub mod types;

pub use address::{derive_address, is_valid_address};
pub use codec::TransactionCodec;
pub use config::CodecConfig;
pub use error::{CodecError, Result};
pub use nonce::{Nonce, NonceCodec};
pub use registry::{json_codec, MessageCodec, MessageRegistry};
pub use types::{
    Amount, Fee, FullSignature, Identity, KeyAlgorithm, PostableBytes, PrehashType, PublicKey,
    SignedTransaction, SigningJob, TokenInfo, TransactionId, TypedMessage, UnsignedTransaction,
    WireFormat,
};
