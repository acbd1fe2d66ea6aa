//! # Account Addresses
//!
//! An account address is the bech32 encoding of a 20-byte key digest:
//!
//! ```text
//! public_key
//!     -> SHA-256              -> 32 bytes
//!     -> RIPEMD-160           -> 20 bytes
//!     -> Bech32(prefix, ...)  -> cosmos1pkptre7fdkl6...
//! ```
//!
//! Validation does not consult a list of known prefixes: any well-formed
//! bech32 string carrying a 20-byte payload is a valid address.

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::config::ADDRESS_LENGTH;
use crate::error::{CodecError, Result};
use crate::types::{Address, PublicKey};

/// ripemd160(sha256(data)).
pub fn hash160(data: &[u8]) -> [u8; ADDRESS_LENGTH] {
    let sha = Sha256::digest(data);
    let digest = Ripemd160::digest(sha);
    let mut out = [0u8; ADDRESS_LENGTH];
    out.copy_from_slice(&digest);
    out
}

/// Derives the bech32 address of raw public key bytes under `prefix`.
pub fn derive_address(pubkey: &[u8], prefix: &str) -> Result<Address> {
    encode_address(prefix, &hash160(pubkey))
}

/// Derives the address of a tagged public key.
pub fn pubkey_to_address(pubkey: &PublicKey, prefix: &str) -> Result<Address> {
    derive_address(&pubkey.data, prefix)
}

/// Bech32-encodes an already computed digest.
pub fn encode_address(prefix: &str, digest: &[u8]) -> Result<Address> {
    let hrp = Hrp::parse(prefix).map_err(|e| CodecError::InvalidAddress {
        address: prefix.to_string(),
        reason: format!("invalid prefix: {e}"),
    })?;
    bech32::encode::<Bech32>(hrp, digest).map_err(|e| CodecError::InvalidAddress {
        address: prefix.to_string(),
        reason: e.to_string(),
    })
}

/// Splits an address into its prefix and 20-byte digest.
///
/// Checks the bech32 checksum and the payload length.
pub fn decode_address(address: &str) -> Result<(String, [u8; ADDRESS_LENGTH])> {
    let invalid = |reason: String| CodecError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let checked = CheckedHrpstring::new::<Bech32>(address).map_err(|e| invalid(e.to_string()))?;
    let data: Vec<u8> = checked.byte_iter().collect();
    if data.len() != ADDRESS_LENGTH {
        return Err(invalid(format!(
            "expected {} data bytes, got {}",
            ADDRESS_LENGTH,
            data.len()
        )));
    }

    let mut digest = [0u8; ADDRESS_LENGTH];
    digest.copy_from_slice(&data);
    Ok((checked.hrp().to_string(), digest))
}

/// Returns `true` for well-formed addresses. Never fails.
pub fn is_valid_address(candidate: &str) -> bool {
    decode_address(candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    const FAUCET_PUBKEY: &str = "A08EGB7ro1ORuFhjOnZcSgwYlpe0DSFjVNUIkNNQxwKQ";
    const FAUCET_ADDRESS: &str = "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6";

    fn faucet_pubkey() -> Vec<u8> {
        STANDARD.decode(FAUCET_PUBKEY).unwrap()
    }

    #[test]
    fn derives_known_address() {
        let address = derive_address(&faucet_pubkey(), "cosmos").unwrap();
        assert_eq!(address, FAUCET_ADDRESS);
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_address(&faucet_pubkey(), "wasm").unwrap();
        let b = derive_address(&faucet_pubkey(), "wasm").unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("wasm1"));
    }

    #[test]
    fn derived_address_is_valid() {
        let address = derive_address(&[0x02; 33], "cosmos").unwrap();
        assert!(is_valid_address(&address));
    }

    #[test]
    fn flipped_checksum_character_is_invalid() {
        let mut chars: Vec<char> = FAUCET_ADDRESS.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'q' { 'p' } else { 'q' };
        let corrupted: String = chars.into_iter().collect();
        assert!(!is_valid_address(&corrupted));
    }

    #[test]
    fn unknown_prefix_is_still_valid() {
        let address = encode_address("zzz", &[7u8; 20]).unwrap();
        assert!(is_valid_address(&address));
    }

    #[test]
    fn wrong_payload_length_is_invalid() {
        let address = encode_address("cosmos", &[7u8; 32]).unwrap();
        assert!(!is_valid_address(&address));
    }

    #[test]
    fn garbage_is_invalid() {
        for candidate in ["", "cosmos", "cosmos1", "not an address", "1qqqqqq"] {
            assert!(!is_valid_address(candidate), "accepted {candidate:?}");
        }
    }

    #[test]
    fn decode_returns_prefix_and_digest() {
        let (prefix, digest) = decode_address(FAUCET_ADDRESS).unwrap();
        assert_eq!(prefix, "cosmos");
        assert_eq!(digest, hash160(&faucet_pubkey()));
    }

    #[test]
    fn invalid_prefix_is_an_error() {
        assert!(derive_address(&[1, 2, 3], "").is_err());
    }
}
