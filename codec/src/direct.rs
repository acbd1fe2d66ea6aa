//! Direct (binary) transaction envelopes.
//!
//! The direct scheme signs a [`crate::sign_doc`] built from two byte
//! strings: the encoded [`TxBody`] and the encoded [`AuthInfo`]. The
//! signed result is a [`TxRaw`] carrying those same bytes plus signatures,
//! so the network sees exactly what was signed.
//!
//! [`encode_auth_info`] builds the auth info for single-key signers in
//! direct sign mode. Callers with other signer setups may pass their own
//! auth info bytes instead.

use prost::Message;
use sha2::{Digest, Sha256};

use crate::config::{PUBKEY_ED25519_TYPE_URL, PUBKEY_SECP256K1_TYPE_URL, SIGN_MODE_DIRECT};
use crate::error::{CodecError, Result};
use crate::legacy::amount_to_coin;
use crate::registry::{Any, MessageRegistry};
use crate::types::{
    Fee, KeyAlgorithm, PostableBytes, PublicKey, TokenInfo, TransactionId, TypedMessage,
    WireFormat,
};

#[derive(Clone, PartialEq, Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    #[prost(string, tag = "2")]
    pub memo: String,
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct TxRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct AuthInfo {
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,
    #[prost(message, optional, tag = "2")]
    pub fee: Option<DirectFee>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignerInfo {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<Any>,
    #[prost(message, optional, tag = "2")]
    pub mode_info: Option<ModeInfo>,
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

/// Signing mode of one signer. Only the `single` arm is modelled; on the
/// wire it is the first member of a oneof.
#[derive(Clone, PartialEq, Message)]
pub struct ModeInfo {
    #[prost(message, optional, tag = "1")]
    pub single: Option<ModeInfoSingle>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfoSingle {
    #[prost(int32, tag = "1")]
    pub mode: i32,
}

#[derive(Clone, PartialEq, Message)]
pub struct DirectFee {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<DirectCoin>,
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct DirectCoin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

/// Key bytes inside a public key `Any`.
#[derive(Clone, PartialEq, Message)]
pub struct PubKeyBytes {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
}

/// A body with its messages run back through the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTxBody {
    pub messages: Vec<TypedMessage>,
    pub memo: String,
    pub timeout_height: u64,
}

/// Encodes a transaction body, wrapping each message in an [`Any`].
pub fn encode_tx_body(
    registry: &MessageRegistry,
    messages: &[TypedMessage],
    memo: &str,
    timeout_height: u64,
) -> Result<Vec<u8>> {
    let messages = messages
        .iter()
        .map(|m| registry.to_any(m))
        .collect::<Result<Vec<_>>>()?;
    let body = TxBody {
        messages,
        memo: memo.to_string(),
        timeout_height,
    };
    Ok(body.encode_to_vec())
}

pub fn decode_tx_body(registry: &MessageRegistry, bytes: &[u8]) -> Result<DecodedTxBody> {
    let body = TxBody::decode(bytes)?;
    let messages = body
        .messages
        .iter()
        .map(|any| registry.from_any(any))
        .collect::<Result<Vec<_>>>()?;
    Ok(DecodedTxBody {
        messages,
        memo: body.memo,
        timeout_height: body.timeout_height,
    })
}

/// Wraps a public key in the `Any` used by signer infos.
pub fn pubkey_to_any(pubkey: &PublicKey) -> Any {
    let type_url = match pubkey.algo {
        KeyAlgorithm::Secp256k1 => PUBKEY_SECP256K1_TYPE_URL,
        KeyAlgorithm::Ed25519 => PUBKEY_ED25519_TYPE_URL,
    };
    Any {
        type_url: type_url.to_string(),
        value: PubKeyBytes {
            key: pubkey.data.clone(),
        }
        .encode_to_vec(),
    }
}

/// Converts a fee through the token table into its binary form.
pub fn encode_direct_fee(fee: &Fee, tokens: &[TokenInfo]) -> Result<DirectFee> {
    let amount = fee
        .tokens
        .iter()
        .map(|a| {
            let coin = amount_to_coin(a, tokens)?;
            Ok(DirectCoin {
                denom: coin.denom,
                amount: coin.amount,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let gas_limit = if fee.gas_limit.is_empty() {
        0
    } else {
        fee.gas_limit.parse::<u64>().map_err(|_| {
            CodecError::Malformed(format!("gas limit {:?} is not a u64", fee.gas_limit))
        })?
    };
    Ok(DirectFee { amount, gas_limit })
}

/// Encodes auth info for signers that all sign in direct mode at `sequence`.
pub fn encode_auth_info(
    pubkeys: &[PublicKey],
    fee: &Fee,
    sequence: u64,
    tokens: &[TokenInfo],
) -> Result<Vec<u8>> {
    let signer_infos = pubkeys
        .iter()
        .map(|pk| SignerInfo {
            public_key: Some(pubkey_to_any(pk)),
            mode_info: Some(ModeInfo {
                single: Some(ModeInfoSingle {
                    mode: SIGN_MODE_DIRECT,
                }),
            }),
            sequence,
        })
        .collect();
    let auth_info = AuthInfo {
        signer_infos,
        fee: Some(encode_direct_fee(fee, tokens)?),
    };
    Ok(auth_info.encode_to_vec())
}

/// Assembles postable bytes from signed body and auth info bytes.
pub fn build_tx_raw(
    body_bytes: Vec<u8>,
    auth_info_bytes: Vec<u8>,
    signatures: Vec<Vec<u8>>,
) -> PostableBytes {
    let raw = TxRaw {
        body_bytes,
        auth_info_bytes,
        signatures,
    };
    PostableBytes::binary(raw.encode_to_vec())
}

pub fn parse_tx_raw(postable: &PostableBytes) -> Result<TxRaw> {
    if postable.format != WireFormat::Binary {
        return Err(CodecError::UnsupportedOperation {
            operation: "parse_tx_raw",
            reason: format!("expected binary bytes, got {}", postable.format),
        });
    }
    Ok(TxRaw::decode(postable.bytes.as_slice())?)
}

/// Upper-case hex SHA-256 of the `TxRaw` bytes.
pub fn tx_raw_identifier(postable: &PostableBytes) -> Result<TransactionId> {
    if postable.format != WireFormat::Binary {
        return Err(CodecError::UnsupportedOperation {
            operation: "tx_raw_identifier",
            reason: format!("expected binary bytes, got {}", postable.format),
        });
    }
    Ok(TransactionId(hex::encode_upper(Sha256::digest(&postable.bytes))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tokens;
    use crate::registry::json_codec;
    use crate::types::Amount;
    use serde_json::json;

    fn registry() -> MessageRegistry {
        let registry = MessageRegistry::new();
        registry.register_codec("/demo.Msg", json_codec()).unwrap();
        registry
    }

    #[test]
    fn body_round_trip() {
        let registry = registry();
        let messages = vec![
            TypedMessage::new("/demo.Msg", json!({"a": 1})),
            TypedMessage::new("/demo.Msg", json!({"b": 2})),
        ];
        let bytes = encode_tx_body(&registry, &messages, "Some memo", 9999).unwrap();
        let decoded = decode_tx_body(&registry, &bytes).unwrap();
        assert_eq!(decoded.messages, messages);
        assert_eq!(decoded.memo, "Some memo");
        assert_eq!(decoded.timeout_height, 9999);
    }

    #[test]
    fn body_with_unregistered_message_fails() {
        let registry = registry();
        let err = encode_tx_body(&registry, &[TypedMessage::new("/x.Y", json!({}))], "", 0)
            .unwrap_err();
        assert!(matches!(err, CodecError::UnknownType { .. }));
    }

    #[test]
    fn auth_info_layout_omits_zero_gas_and_sequence() {
        let pk = PublicKey::new(KeyAlgorithm::Ed25519, vec![7; 32]);
        let fee = Fee {
            tokens: vec![],
            gas_limit: "0".into(),
        };
        let bytes = encode_auth_info(&[pk], &fee, 0, &default_tokens()).unwrap();

        let mut expected = vec![0x0a, 75, 0x0a, 67, 0x0a, 29];
        expected.extend_from_slice(PUBKEY_ED25519_TYPE_URL.as_bytes());
        expected.extend_from_slice(&[0x12, 34, 0x0a, 32]);
        expected.extend_from_slice(&[7; 32]);
        // mode_info { single { mode: DIRECT } }, then an empty fee
        expected.extend_from_slice(&[0x12, 4, 0x0a, 2, 0x08, 1]);
        expected.extend_from_slice(&[0x12, 0]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn auth_info_carries_fee_and_sequence() {
        let pk = PublicKey::new(KeyAlgorithm::Secp256k1, vec![2; 33]);
        let fee = Fee {
            tokens: vec![Amount::new("5000", 6, "ATOM")],
            gas_limit: "200000".into(),
        };
        let bytes = encode_auth_info(&[pk.clone()], &fee, 9, &default_tokens()).unwrap();
        let decoded = AuthInfo::decode(bytes.as_slice()).unwrap();

        let signer = &decoded.signer_infos[0];
        assert_eq!(signer.sequence, 9);
        let any = signer.public_key.as_ref().unwrap();
        assert_eq!(any.type_url, PUBKEY_SECP256K1_TYPE_URL);
        assert_eq!(PubKeyBytes::decode(any.value.as_slice()).unwrap().key, pk.data);
        assert_eq!(
            signer.mode_info.as_ref().unwrap().single.as_ref().unwrap().mode,
            SIGN_MODE_DIRECT
        );

        let fee = decoded.fee.unwrap();
        assert_eq!(fee.gas_limit, 200_000);
        assert_eq!(fee.amount[0].denom, "uatom");
        assert_eq!(fee.amount[0].amount, "5000");
    }

    #[test]
    fn auth_info_rejects_bad_gas_and_unknown_tokens() {
        let pk = PublicKey::new(KeyAlgorithm::Ed25519, vec![1; 32]);
        let bad_gas = Fee {
            tokens: vec![],
            gas_limit: "lots".into(),
        };
        assert!(matches!(
            encode_auth_info(&[pk.clone()], &bad_gas, 0, &default_tokens()),
            Err(CodecError::Malformed(_))
        ));
        let bad_token = Fee {
            tokens: vec![Amount::new("1", 18, "ETH")],
            gas_limit: "1".into(),
        };
        assert!(matches!(
            encode_auth_info(&[pk], &bad_token, 0, &default_tokens()),
            Err(CodecError::UnknownToken { .. })
        ));
    }

    #[test]
    fn tx_raw_round_trip() {
        let postable = build_tx_raw(vec![1, 2], vec![3], vec![vec![4; 64]]);
        assert_eq!(postable.format, WireFormat::Binary);
        let raw = parse_tx_raw(&postable).unwrap();
        assert_eq!(raw.body_bytes, vec![1, 2]);
        assert_eq!(raw.auth_info_bytes, vec![3]);
        assert_eq!(raw.signatures, vec![vec![4; 64]]);
    }

    #[test]
    fn identifier_is_uppercase_sha256() {
        let postable = build_tx_raw(vec![1], vec![2], vec![vec![3]]);
        let id = tx_raw_identifier(&postable).unwrap();
        assert_eq!(id.0.len(), 64);
        assert_eq!(id.0, id.0.to_uppercase());
        assert_eq!(id.0, hex::encode_upper(Sha256::digest(&postable.bytes)));
    }

    #[test]
    fn legacy_bytes_are_rejected() {
        let postable = PostableBytes::legacy(b"{}".to_vec());
        assert!(matches!(
            tx_raw_identifier(&postable),
            Err(CodecError::UnsupportedOperation { .. })
        ));
        assert!(parse_tx_raw(&postable).is_err());
    }
}
