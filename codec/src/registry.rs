//! # Message Registry
//!
//! Maps a message type URL to the pair of functions that encode and decode
//! its payload. The codec core knows nothing about any concrete message
//! layout; applications register every kind they sign or parse at startup.
//!
//! Each registered message can leave the registry in two shapes:
//!
//! - **binary**: an [`Any`] envelope `{type_url, value}` whose `value` is
//!   the registered encoder's output, used by the direct scheme;
//! - **legacy**: the JSON object `{"type": <legacy name>, "value": payload}`
//!   embedded as-is in the legacy sign bytes and wire format.
//!
//! ## Lifecycle
//!
//! Registration is a setup step. The first encode or decode call freezes
//! the registry and every later [`MessageRegistry::register`] fails with
//! [`CodecError::RegistryFrozen`]. After that the table is read-only and
//! can be shared across threads behind an `Arc`.

use parking_lot::RwLock;
use prost::Message;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::canonical;
use crate::error::{CodecError, Result};
use crate::types::TypedMessage;

/// Encodes a payload into its binary message bytes.
pub type EncodeFn = Arc<dyn Fn(&Value) -> Result<Vec<u8>> + Send + Sync>;

/// Decodes binary message bytes back into a payload.
pub type DecodeFn = Arc<dyn Fn(&[u8]) -> Result<Value> + Send + Sync>;

/// Two-field binary envelope pairing a type URL with encoded bytes.
#[derive(Clone, PartialEq, Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// The registered codec for one type URL.
#[derive(Clone)]
pub struct MessageCodec {
    encode: EncodeFn,
    decode: DecodeFn,
    legacy_type: Option<String>,
}

impl MessageCodec {
    pub fn new(encode: EncodeFn, decode: DecodeFn) -> Self {
        Self {
            encode,
            decode,
            legacy_type: None,
        }
    }

    /// Sets the name this message carries in the legacy JSON scheme.
    pub fn with_legacy_type(mut self, legacy_type: impl Into<String>) -> Self {
        self.legacy_type = Some(legacy_type.into());
        self
    }

    pub fn legacy_type(&self) -> Option<&str> {
        self.legacy_type.as_deref()
    }
}

impl fmt::Debug for MessageCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCodec")
            .field("legacy_type", &self.legacy_type)
            .finish_non_exhaustive()
    }
}

/// A codec pair that stores the payload as canonical JSON bytes.
///
/// For messages without a dedicated binary schema, and for tests.
pub fn json_codec() -> MessageCodec {
    MessageCodec::new(
        Arc::new(|payload: &Value| canonical::to_canonical_bytes(payload)),
        Arc::new(|bytes: &[u8]| Ok(serde_json::from_slice(bytes)?)),
    )
}

#[derive(Default)]
struct Tables {
    by_type_url: HashMap<String, MessageCodec>,
    // legacy name -> type URL
    by_legacy_type: HashMap<String, String>,
}

/// Type URL → codec table. See the module docs for the freeze rule.
#[derive(Default)]
pub struct MessageRegistry {
    tables: RwLock<Tables>,
    frozen: AtomicBool,
}

impl fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        let mut types: Vec<&String> = tables.by_type_url.keys().collect();
        types.sort();
        f.debug_struct("MessageRegistry")
            .field("types", &types)
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an encode/decode pair under `type_url`.
    pub fn register(
        &self,
        type_url: impl Into<String>,
        encode: EncodeFn,
        decode: DecodeFn,
    ) -> Result<()> {
        self.register_codec(type_url, MessageCodec::new(encode, decode))
    }

    /// Registers a fully configured [`MessageCodec`].
    ///
    /// Fails with [`CodecError::DuplicateType`] if the type URL or its
    /// legacy name is taken, and with [`CodecError::RegistryFrozen`] once
    /// the registry has served a lookup.
    pub fn register_codec(&self, type_url: impl Into<String>, codec: MessageCodec) -> Result<()> {
        let type_url = type_url.into();
        // The flag is only set under the write lock, so checking it here
        // orders this registration strictly before or after any freeze.
        let mut tables = self.tables.write();
        if self.is_frozen() {
            tracing::warn!(%type_url, "registration rejected: registry frozen");
            return Err(CodecError::RegistryFrozen { type_url });
        }
        if tables.by_type_url.contains_key(&type_url) {
            tracing::warn!(%type_url, "registration rejected: duplicate type");
            return Err(CodecError::DuplicateType { type_url });
        }
        if let Some(legacy) = codec.legacy_type() {
            if tables.by_legacy_type.contains_key(legacy) {
                return Err(CodecError::DuplicateType {
                    type_url: legacy.to_string(),
                });
            }
            tables
                .by_legacy_type
                .insert(legacy.to_string(), type_url.clone());
        }

        tracing::debug!(%type_url, legacy_type = ?codec.legacy_type(), "registered message type");
        tables.by_type_url.insert(type_url, codec);
        Ok(())
    }

    /// Stops accepting registrations. Idempotent.
    pub fn freeze(&self) {
        if self.is_frozen() {
            return;
        }
        let tables = self.tables.write();
        if !self.frozen.swap(true, Ordering::AcqRel) {
            tracing::info!(types = tables.by_type_url.len(), "message registry frozen");
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.tables.read().by_type_url.contains_key(type_url)
    }

    /// Whether `name` resolves on the legacy path, as a registered legacy
    /// name or as a type URL.
    pub fn contains_legacy(&self, name: &str) -> bool {
        let tables = self.tables.read();
        tables.by_legacy_type.contains_key(name) || tables.by_type_url.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.read().by_type_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, type_url: &str) -> Result<MessageCodec> {
        self.freeze();
        self.tables
            .read()
            .by_type_url
            .get(type_url)
            .cloned()
            .ok_or_else(|| CodecError::UnknownType {
                type_url: type_url.to_string(),
            })
    }

    // -----------------------------------------------------------------------
    // Binary path
    // -----------------------------------------------------------------------

    /// Wraps a message into an [`Any`] envelope.
    pub fn to_any(&self, message: &TypedMessage) -> Result<Any> {
        let codec = self.lookup(&message.type_url)?;
        let value = (codec.encode)(&message.value)?;
        Ok(Any {
            type_url: message.type_url.clone(),
            value,
        })
    }

    /// Encodes `payload` and returns the serialized [`Any`] envelope.
    pub fn encode_any(&self, type_url: &str, payload: &Value) -> Result<Vec<u8>> {
        let any = self.to_any(&TypedMessage::new(type_url, payload.clone()))?;
        Ok(any.encode_to_vec())
    }

    /// Decodes the payload inside an [`Any`] envelope.
    pub fn from_any(&self, any: &Any) -> Result<TypedMessage> {
        let codec = self.lookup(&any.type_url)?;
        let value = (codec.decode)(&any.value)?;
        Ok(TypedMessage::new(any.type_url.clone(), value))
    }

    /// Inverse of [`encode_any`](Self::encode_any).
    pub fn decode_any(&self, envelope: &[u8]) -> Result<TypedMessage> {
        let any = Any::decode(envelope)?;
        self.from_any(&any)
    }

    // -----------------------------------------------------------------------
    // Legacy path
    // -----------------------------------------------------------------------

    /// The `{"type", "value"}` object for the legacy JSON scheme.
    ///
    /// The payload is embedded unchanged; the type is the registered legacy
    /// name, or the type URL when none was given.
    pub fn encode_legacy(&self, message: &TypedMessage) -> Result<Value> {
        let codec = self.lookup(&message.type_url)?;
        let name = codec
            .legacy_type
            .unwrap_or_else(|| message.type_url.clone());

        let mut obj = Map::new();
        obj.insert("type".to_string(), Value::String(name));
        obj.insert("value".to_string(), message.value.clone());
        Ok(Value::Object(obj))
    }

    /// Inverse of [`encode_legacy`](Self::encode_legacy).
    pub fn decode_legacy(&self, wrapped: &Value) -> Result<TypedMessage> {
        let name = wrapped
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::Malformed("legacy message without a type".into()))?;
        let value = wrapped
            .get("value")
            .cloned()
            .ok_or_else(|| CodecError::Malformed(format!("legacy message {name} without a value")))?;

        self.freeze();
        let tables = self.tables.read();
        let type_url = match tables.by_legacy_type.get(name) {
            Some(type_url) => type_url.clone(),
            None if tables.by_type_url.contains_key(name) => name.to_string(),
            None => {
                return Err(CodecError::UnknownType {
                    type_url: name.to_string(),
                })
            }
        };
        Ok(TypedMessage::new(type_url, value))
    }
}
