//! Nonce packing for account number and sequence.
//!
//! Chains of this family order transactions with two counters: the account
//! number (fixed when the account is created) and the sequence (incremented
//! per transaction). The generic transaction model only has room for one
//! opaque nonce, so both counters travel together inside [`Nonce`].
//!
//! Both counters are written into the legacy sign bytes as decimal strings
//! that downstream tooling may read back as JSON numbers. A digit bound
//! (default [`MAX_NONCE_DIGITS`]) keeps them exact in a 53-bit float.

use serde::{Deserialize, Serialize};

use crate::config::{MAX_CONFIGURABLE_NONCE_DIGITS, MAX_NONCE_DIGITS};
use crate::error::{CodecError, Result};

/// Account number and sequence, validated against a digit bound.
///
/// Fields are private: code builds a `Nonce` through [`NonceCodec`], which
/// checks the bound. Deserialization checks the widest configurable bound;
/// a codec re-checks its own bound with [`NonceCodec::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawNonce")]
pub struct Nonce {
    account_number: u64,
    sequence: u64,
}

/// Unchecked wire form of a [`Nonce`].
#[derive(Deserialize)]
struct RawNonce {
    account_number: u64,
    sequence: u64,
}

impl TryFrom<RawNonce> for Nonce {
    type Error = CodecError;

    fn try_from(raw: RawNonce) -> Result<Self> {
        NonceCodec::new(MAX_CONFIGURABLE_NONCE_DIGITS).encode(raw.account_number, raw.sequence)
    }
}

/// Account fields as returned by an account query: decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_number: String,
    pub sequence: String,
}

/// Encodes and decodes [`Nonce`] values under a configurable digit bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceCodec {
    max_digits: usize,
}

impl Default for NonceCodec {
    fn default() -> Self {
        Self {
            max_digits: MAX_NONCE_DIGITS,
        }
    }
}

impl NonceCodec {
    pub fn new(max_digits: usize) -> Self {
        Self { max_digits }
    }

    pub fn max_digits(&self) -> usize {
        self.max_digits
    }

    /// Packs the two counters into a nonce.
    ///
    /// Fails with [`CodecError::Range`] if either value has more decimal
    /// digits than the bound.
    pub fn encode(&self, account_number: u64, sequence: u64) -> Result<Nonce> {
        self.check("account_number", account_number)?;
        self.check("sequence", sequence)?;
        Ok(Nonce {
            account_number,
            sequence,
        })
    }

    /// Builds a nonce from the string counters of an account query.
    pub fn from_account_info(&self, info: &AccountInfo) -> Result<Nonce> {
        let account_number = self.parse("account_number", &info.account_number)?;
        let sequence = self.parse("sequence", &info.sequence)?;
        self.encode(account_number, sequence)
    }

    /// Checks a nonce built elsewhere against this codec's bound.
    pub fn validate(&self, nonce: &Nonce) -> Result<()> {
        self.check("account_number", nonce.account_number)?;
        self.check("sequence", nonce.sequence)
    }

    pub fn decode_account_number(&self, nonce: &Nonce) -> u64 {
        nonce.account_number
    }

    pub fn decode_sequence(&self, nonce: &Nonce) -> u64 {
        nonce.sequence
    }

    fn check(&self, field: &'static str, value: u64) -> Result<()> {
        let rendered = value.to_string();
        if rendered.len() > self.max_digits {
            return Err(CodecError::Range {
                field,
                value: rendered,
                max_digits: self.max_digits,
            });
        }
        Ok(())
    }

    fn parse(&self, field: &'static str, raw: &str) -> Result<u64> {
        let range_err = || CodecError::Range {
            field,
            value: raw.to_string(),
            max_digits: self.max_digits,
        };
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(range_err());
        }
        raw.parse::<u64>().map_err(|_| range_err())
    }
}

impl Nonce {
    pub fn account_number(&self) -> u64 {
        self.account_number
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Builds a nonce from account query strings with the default bound.
pub fn account_to_nonce(info: &AccountInfo) -> Result<Nonce> {
    NonceCodec::default().from_account_info(info)
}

/// The account number as the decimal string used in sign bytes.
pub fn nonce_to_account_number(nonce: &Nonce) -> String {
    nonce.account_number.to_string()
}

/// The sequence as the decimal string used in sign bytes.
pub fn nonce_to_sequence(nonce: &Nonce) -> String {
    nonce.sequence.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(account_number: &str, sequence: &str) -> AccountInfo {
        AccountInfo {
            account_number: account_number.to_string(),
            sequence: sequence.to_string(),
        }
    }

    #[test]
    fn works_for_input_in_range() {
        let nonce = account_to_nonce(&info("1234", "7890")).unwrap();
        assert_eq!(nonce_to_account_number(&nonce), "1234");
        assert_eq!(nonce_to_sequence(&nonce), "7890");
    }

    #[test]
    fn encode_decode_is_exact() {
        let codec = NonceCodec::default();
        let cases = [
            (0, 0),
            (7, 0),
            (1, 999_999_999_999_999),
            (999_999_999_999_999, 42),
            (1_234_567_890, 97_320_247_923),
        ];
        for (a, s) in cases {
            let nonce = codec.encode(a, s).unwrap();
            assert_eq!(codec.decode_account_number(&nonce), a);
            assert_eq!(codec.decode_sequence(&nonce), s);
        }
    }

    #[test]
    fn sixteen_digit_account_number_is_rejected() {
        let codec = NonceCodec::default();
        for s in [0, 1, 999_999_999_999_999] {
            let err = codec.encode(1_000_000_000_000_000, s).unwrap_err();
            match err {
                CodecError::Range {
                    field,
                    value,
                    max_digits,
                } => {
                    assert_eq!(field, "account_number");
                    assert_eq!(value, "1000000000000000");
                    assert_eq!(max_digits, 15);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn sixteen_digit_sequence_is_rejected() {
        let err = NonceCodec::default()
            .encode(178, 1_000_000_000_000_000)
            .unwrap_err();
        assert!(matches!(err, CodecError::Range { field: "sequence", .. }));
    }

    #[test]
    fn bound_is_configurable() {
        let tight = NonceCodec::new(9);
        assert!(tight.from_account_info(&info("1234", "7890")).is_ok());
        assert!(tight.from_account_info(&info("1234567890", "7890")).is_err());
        assert!(tight.from_account_info(&info("178", "97320247923")).is_err());
    }

    #[test]
    fn deserialize_enforces_widest_bound() {
        let ok: Nonce =
            serde_json::from_value(serde_json::json!({"account_number": 1234, "sequence": 7890}))
                .unwrap();
        assert_eq!(ok.account_number(), 1234);
        assert_eq!(ok.sequence(), 7890);

        let too_wide = serde_json::from_value::<Nonce>(serde_json::json!({
            "account_number": 12_345_678_901_234_567_890u64,
            "sequence": 0
        }));
        assert!(too_wide.is_err());
    }

    #[test]
    fn validate_applies_the_codec_bound() {
        let nonce = NonceCodec::default().encode(1_234_567_890, 0).unwrap();
        assert!(NonceCodec::default().validate(&nonce).is_ok());
        assert!(matches!(
            NonceCodec::new(9).validate(&nonce),
            Err(CodecError::Range { field: "account_number", .. })
        ));
    }

    #[test]
    fn non_decimal_strings_are_rejected() {
        for (a, s) in [("", "1"), ("12a", "1"), ("-1", "1"), ("1", "1.5")] {
            assert!(
                account_to_nonce(&info(a, s)).is_err(),
                "expected rejection for ({a}, {s})"
            );
        }
    }

    #[test]
    fn leading_zeros_normalize() {
        let nonce = account_to_nonce(&info("0007", "000")).unwrap();
        assert_eq!(nonce_to_account_number(&nonce), "7");
        assert_eq!(nonce_to_sequence(&nonce), "0");
    }
}
