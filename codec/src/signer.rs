//! Signer and transport seams.
//!
//! The codec never signs or talks to the network by itself. It hands a
//! [`SigningJob`] to a [`Signer`] and [`PostableBytes`] to a [`Transport`].
//! [`Ed25519Signer`] is a reference signer used by the test suite and the
//! benchmarks; hardware wallets and secp256k1 key stores plug in the same way.

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::{CodecError, Result};
use crate::types::{Identity, KeyAlgorithm, PostableBytes, PrehashType, PublicKey, SigningJob};

/// Produces a signature over a signing job for a given identity.
pub trait Signer {
    fn sign(&self, job: &SigningJob, identity: &Identity) -> Result<Vec<u8>>;
}

/// Delivers postable bytes to the network and returns the raw response.
///
/// Retries and timeouts belong to implementations, not to the codec.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn post(&self, bytes: &PostableBytes) -> std::result::Result<Vec<u8>, Self::Error>;
}

/// The bytes a signer actually signs after applying the prehash.
pub fn message_to_sign(job: &SigningJob) -> Vec<u8> {
    match job.prehash {
        PrehashType::None => job.bytes.clone(),
        PrehashType::Sha256 => Sha256::digest(&job.bytes).to_vec(),
    }
}

/// In-memory ed25519 signer.
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(
            KeyAlgorithm::Ed25519,
            self.signing_key.verifying_key().to_bytes().to_vec(),
        )
    }

    pub fn identity(&self, chain_id: impl Into<String>) -> Identity {
        Identity {
            chain_id: chain_id.into(),
            pubkey: self.public_key(),
        }
    }
}

impl Signer for Ed25519Signer {
    fn sign(&self, job: &SigningJob, identity: &Identity) -> Result<Vec<u8>> {
        if identity.pubkey != self.public_key() {
            return Err(CodecError::Signing(
                "identity does not belong to this signer".into(),
            ));
        }
        let signature = self.signing_key.sign(&message_to_sign(job));
        Ok(signature.to_bytes().to_vec())
    }
}

/// Checks an ed25519 signature over a signing job. `false` on any
/// malformed input or for keys of other algorithms.
pub fn verify_ed25519(pubkey: &PublicKey, job: &SigningJob, signature: &[u8]) -> bool {
    if pubkey.algo != KeyAlgorithm::Ed25519 {
        return false;
    }
    let Ok(key_bytes) = <[u8; 32]>::try_from(pubkey.data.as_slice()) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify(&message_to_sign(job), &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(prehash: PrehashType) -> SigningJob {
        SigningJob {
            bytes: b"sign me".to_vec(),
            prehash,
        }
    }

    #[test]
    fn sign_and_verify() {
        let signer = Ed25519Signer::generate();
        let identity = signer.identity("testing");
        for prehash in [PrehashType::None, PrehashType::Sha256] {
            let sig = signer.sign(&job(prehash), &identity).unwrap();
            assert_eq!(sig.len(), 64);
            assert!(verify_ed25519(&identity.pubkey, &job(prehash), &sig));
        }
    }

    #[test]
    fn prehash_changes_signature() {
        let signer = Ed25519Signer::from_seed(&[1; 32]);
        let identity = signer.identity("testing");
        let raw = signer.sign(&job(PrehashType::None), &identity).unwrap();
        let hashed = signer.sign(&job(PrehashType::Sha256), &identity).unwrap();
        assert_ne!(raw, hashed);
        assert!(!verify_ed25519(&identity.pubkey, &job(PrehashType::None), &hashed));
    }

    #[test]
    fn foreign_identity_is_refused() {
        let signer = Ed25519Signer::from_seed(&[1; 32]);
        let other = Ed25519Signer::from_seed(&[2; 32]).identity("testing");
        assert!(matches!(
            signer.sign(&job(PrehashType::Sha256), &other),
            Err(CodecError::Signing(_))
        ));
    }

    #[test]
    fn malformed_inputs_do_not_verify() {
        let signer = Ed25519Signer::from_seed(&[3; 32]);
        let pk = signer.public_key();
        assert!(!verify_ed25519(&pk, &job(PrehashType::None), &[0; 10]));
        let short = PublicKey::new(KeyAlgorithm::Ed25519, vec![0; 5]);
        assert!(!verify_ed25519(&short, &job(PrehashType::None), &[0; 64]));
        let secp = PublicKey::new(KeyAlgorithm::Secp256k1, pk.data.clone());
        let sig = signer.sign(&job(PrehashType::None), &signer.identity("c")).unwrap();
        assert!(!verify_ed25519(&secp, &job(PrehashType::None), &sig));
    }
}
