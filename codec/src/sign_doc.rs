//! Binary sign documents for the direct signing scheme.
//!
//! A sign document is a five-field length-prefixed message:
//!
//! ```text
//! 1: body_bytes       bytes
//! 2: auth_info_bytes  bytes
//! 3: chain_id         string
//! 4: account_number   uint64
//! 5: sequence         uint64
//! ```
//!
//! Fields are written in tag order. A field holding its type's default
//! (0, "", empty bytes) is left out entirely, as the binary convention
//! treats it as implicit. Writing `sequence = 0` explicitly would produce
//! different bytes and an invalid signature.

use prost::encoding::{encode_key, encode_varint, WireType};
use prost::Message;

use crate::error::Result;
use crate::nonce::Nonce;
use crate::types::{PrehashType, SigningJob};

/// Decoded form of a sign document.
#[derive(Clone, PartialEq, Message)]
pub struct SignDoc {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(string, tag = "3")]
    pub chain_id: String,
    #[prost(uint64, tag = "4")]
    pub account_number: u64,
    #[prost(uint64, tag = "5")]
    pub sequence: u64,
}

/// A single field value as seen by the omission rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Bytes(&'a [u8]),
    String(&'a str),
    Uint64(u64),
}

/// Omission rule of the binary scheme: defaults are implicit.
pub fn should_omit(value: FieldValue<'_>) -> bool {
    match value {
        FieldValue::Bytes(b) => b.is_empty(),
        FieldValue::String(s) => s.is_empty(),
        FieldValue::Uint64(n) => n == 0,
    }
}

fn write_field(buf: &mut Vec<u8>, tag: u32, value: FieldValue<'_>) {
    if should_omit(value) {
        return;
    }
    match value {
        FieldValue::Bytes(data) => {
            encode_key(tag, WireType::LengthDelimited, buf);
            encode_varint(data.len() as u64, buf);
            buf.extend_from_slice(data);
        }
        FieldValue::String(s) => {
            encode_key(tag, WireType::LengthDelimited, buf);
            encode_varint(s.len() as u64, buf);
            buf.extend_from_slice(s.as_bytes());
        }
        FieldValue::Uint64(n) => {
            encode_key(tag, WireType::Varint, buf);
            encode_varint(n, buf);
        }
    }
}

/// Builds sign documents with a fixed field order and omission rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinarySignDocBuilder;

impl BinarySignDocBuilder {
    pub fn build_sign_doc(
        &self,
        body_bytes: &[u8],
        auth_info_bytes: &[u8],
        chain_id: &str,
        account_number: u64,
        sequence: u64,
    ) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            body_bytes.len() + auth_info_bytes.len() + chain_id.len() + 32,
        );
        write_field(&mut buf, 1, FieldValue::Bytes(body_bytes));
        write_field(&mut buf, 2, FieldValue::Bytes(auth_info_bytes));
        write_field(&mut buf, 3, FieldValue::String(chain_id));
        write_field(&mut buf, 4, FieldValue::Uint64(account_number));
        write_field(&mut buf, 5, FieldValue::Uint64(sequence));

        tracing::debug!(chain_id, account_number, sequence, len = buf.len(), "built sign doc");
        buf
    }

    /// Builds the signing job for the direct scheme from a nonce.
    pub fn signing_job(
        &self,
        body_bytes: &[u8],
        auth_info_bytes: &[u8],
        chain_id: &str,
        nonce: &Nonce,
    ) -> SigningJob {
        SigningJob {
            bytes: self.build_sign_doc(
                body_bytes,
                auth_info_bytes,
                chain_id,
                nonce.account_number(),
                nonce.sequence(),
            ),
            prehash: PrehashType::Sha256,
        }
    }

    /// Parses sign document bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<SignDoc> {
        Ok(SignDoc::decode(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonce::NonceCodec;

    #[test]
    fn binary_policy_omits_defaults() {
        assert!(should_omit(FieldValue::Uint64(0)));
        assert!(should_omit(FieldValue::String("")));
        assert!(should_omit(FieldValue::Bytes(&[])));
        assert!(!should_omit(FieldValue::Uint64(1)));
        assert!(!should_omit(FieldValue::String("0")));
        assert!(!should_omit(FieldValue::Bytes(&[0])));
    }

    #[test]
    fn zero_sequence_is_omitted() {
        let doc = BinarySignDocBuilder.build_sign_doc(b"body", b"auth", "simd-testing", 1, 0);
        let mut expected = vec![0x0a, 4];
        expected.extend_from_slice(b"body");
        expected.extend_from_slice(&[0x12, 4]);
        expected.extend_from_slice(b"auth");
        expected.extend_from_slice(&[0x1a, 12]);
        expected.extend_from_slice(b"simd-testing");
        expected.extend_from_slice(&[0x20, 1]);
        assert_eq!(doc, expected);
    }

    #[test]
    fn nonzero_sequence_is_written_last() {
        let with_zero = BinarySignDocBuilder.build_sign_doc(b"b", b"a", "c", 1, 0);
        let with_one = BinarySignDocBuilder.build_sign_doc(b"b", b"a", "c", 1, 1);
        assert_ne!(with_zero, with_one);
        assert_eq!(&with_one[..with_zero.len()], &with_zero[..]);
        assert_eq!(&with_one[with_zero.len()..], &[0x28, 1]);
    }

    #[test]
    fn matches_schema_encoding() {
        let cases = [
            (b"body".to_vec(), b"auth".to_vec(), "chain".to_string(), 0u64, 0u64),
            (vec![], vec![], String::new(), 0, 0),
            (vec![1; 300], vec![2; 5], "x".into(), 1 << 40, 999),
        ];
        for (body, auth, chain_id, account_number, sequence) in cases {
            let ours = BinarySignDocBuilder.build_sign_doc(
                &body,
                &auth,
                &chain_id,
                account_number,
                sequence,
            );
            let schema = SignDoc {
                body_bytes: body,
                auth_info_bytes: auth,
                chain_id,
                account_number,
                sequence,
            }
            .encode_to_vec();
            assert_eq!(ours, schema);
        }
    }

    #[test]
    fn decodes_back() {
        let bytes = BinarySignDocBuilder.build_sign_doc(b"body", b"", "testing", 7, 0);
        let doc = BinarySignDocBuilder.decode(&bytes).unwrap();
        assert_eq!(doc.body_bytes, b"body");
        assert!(doc.auth_info_bytes.is_empty());
        assert_eq!(doc.chain_id, "testing");
        assert_eq!(doc.account_number, 7);
        assert_eq!(doc.sequence, 0);
    }

    #[test]
    fn signing_job_uses_nonce() {
        let nonce = NonceCodec::default().encode(3, 9).unwrap();
        let job = BinarySignDocBuilder.signing_job(b"b", b"a", "c", &nonce);
        assert_eq!(job.prehash, PrehashType::Sha256);
        assert_eq!(job.bytes, BinarySignDocBuilder.build_sign_doc(b"b", b"a", "c", 3, 9));
    }
}
