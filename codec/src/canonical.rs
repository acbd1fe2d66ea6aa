//! Canonical JSON sign bytes for the legacy scheme.
//!
//! The network re-derives the sign bytes from its own copy of the
//! transaction, so the client must produce them byte for byte:
//!
//! 1. build `{account_number, chain_id, fee, memo, msgs, sequence}`
//! 2. sort object keys byte-wise at every level, keep array order
//! 3. serialize as compact UTF-8 JSON
//!
//! The tree walked in step 2 is a [`CanonicalValue`], built fresh from the
//! transaction on every call, so there is nothing shared and no cycles.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::nonce::{nonce_to_account_number, nonce_to_sequence, Nonce};
use crate::registry::MessageRegistry;
use crate::types::UnsignedTransaction;

/// JSON value whose objects are always key-sorted.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<CanonicalValue>),
    Object(BTreeMap<String, CanonicalValue>),
}

/// Omission rule of the legacy scheme: nothing is dropped.
///
/// The broadcast StdTx carries every member of the payload, `null`, `""`
/// and `0` included, and the network signs over that same structure.
pub fn should_omit(_value: &Value) -> bool {
    false
}

impl From<&Value> for CanonicalValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(
                map.iter()
                    .filter(|(_, v)| !should_omit(v))
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for CanonicalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                // BTreeMap<String, _> iterates in byte-wise key order.
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

/// Canonical compact JSON bytes of an arbitrary value.
pub fn to_canonical_bytes(value: &Value) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&CanonicalValue::from(value))?)
}

/// Produces legacy sign bytes from an unsigned transaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalJsonSigner;

impl CanonicalJsonSigner {
    /// Builds the sign bytes.
    ///
    /// `fee` is embedded as supplied; messages take the registry's legacy
    /// shape. The chain id is used verbatim.
    pub fn build_sign_bytes(
        &self,
        registry: &MessageRegistry,
        unsigned: &UnsignedTransaction,
        nonce: &Nonce,
        fee: &Value,
    ) -> Result<Vec<u8>> {
        let msgs = unsigned
            .messages
            .iter()
            .map(|m| registry.encode_legacy(m))
            .collect::<Result<Vec<_>>>()?;

        let doc = serde_json::json!({
            "account_number": nonce_to_account_number(nonce),
            "chain_id": unsigned.chain_id,
            "fee": fee,
            "memo": unsigned.memo,
            "msgs": msgs,
            "sequence": nonce_to_sequence(nonce),
        });

        let bytes = to_canonical_bytes(&doc)?;
        tracing::debug!(
            chain_id = %unsigned.chain_id,
            messages = unsigned.messages.len(),
            len = bytes.len(),
            "built legacy sign bytes"
        );
        Ok(bytes)
    }
}
