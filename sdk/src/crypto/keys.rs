//! # Key Pairs & Signature Schemes
//!
//! Both supported families sign with Ed25519, but they disagree on the
//! digest inside it:
//!
//! - **Symbol** uses textbook Ed25519 (SHA-512).
//! - **NEM** swaps SHA-512 for Keccak-512 and hashes the private key with its
//!   bytes reversed before clamping.
//!
//! The Symbol path goes through the regular `ed25519-dalek` API. The NEM
//! path uses the `hazmat` layer, which lets us feed our own expanded secret
//! key and pick the digest.
//!
//! Private key bytes are never logged.

use ed25519_dalek::hazmat::{raw_sign, raw_verify, ExpandedSecretKey};
use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha3::{Digest, Keccak512};
use thiserror::Error;

use super::byte_array::{PrivateKey, PublicKey, Signature};

/// Errors that can occur while loading key material.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid private key: expected 32 bytes of hex")]
    InvalidPrivateKey,
}

/// Ed25519 flavor used by a network family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// RFC 8032 Ed25519.
    Ed25519Sha512,
    /// Ed25519 with Keccak-512 and a reversed private key.
    Ed25519Keccak512,
}

enum KeyMaterial {
    Standard(SigningKey),
    Keccak {
        expanded: ExpandedSecretKey,
        verifying: VerifyingKey,
    },
}

/// A private key bound to the signature scheme that uses it.
///
/// ```
/// use ledgerkit::crypto::{KeyPair, SignatureScheme, verify};
///
/// let key_pair = KeyPair::generate(SignatureScheme::Ed25519Sha512);
/// let signature = key_pair.sign(b"transfer 10 xym");
/// assert!(verify(
///     SignatureScheme::Ed25519Sha512,
///     &key_pair.public_key(),
///     b"transfer 10 xym",
///     &signature,
/// ));
/// ```
pub struct KeyPair {
    private_key: PrivateKey,
    scheme: SignatureScheme,
    signer: KeyMaterial,
}

impl KeyPair {
    pub fn new(private_key: PrivateKey, scheme: SignatureScheme) -> Self {
        let signer = match scheme {
            SignatureScheme::Ed25519Sha512 => {
                KeyMaterial::Standard(SigningKey::from_bytes(private_key.as_bytes()))
            }
            SignatureScheme::Ed25519Keccak512 => {
                let mut reversed = *private_key.as_bytes();
                reversed.reverse();

                let mut digest = [0u8; 64];
                digest.copy_from_slice(&Keccak512::digest(reversed));

                let expanded = ExpandedSecretKey::from_bytes(&digest);
                let verifying = VerifyingKey::from(&expanded);
                KeyMaterial::Keccak {
                    expanded,
                    verifying,
                }
            }
        };

        Self {
            private_key,
            scheme,
            signer,
        }
    }

    /// Generates a fresh key pair from the OS random number generator.
    pub fn generate(scheme: SignatureScheme) -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self::new(PrivateKey::from_bytes(bytes), scheme)
    }

    /// Loads a key pair from a 64-character hex private key.
    pub fn from_hex(hex_str: &str, scheme: SignatureScheme) -> Result<Self, KeyError> {
        let private_key = hex_str
            .parse::<PrivateKey>()
            .map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::new(private_key, scheme))
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> PublicKey {
        let bytes = match &self.signer {
            KeyMaterial::Standard(signing_key) => signing_key.verifying_key().to_bytes(),
            KeyMaterial::Keccak { verifying, .. } => verifying.to_bytes(),
        };
        PublicKey::from_bytes(bytes)
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        let signature = match &self.signer {
            KeyMaterial::Standard(signing_key) => signing_key.sign(message),
            KeyMaterial::Keccak {
                expanded,
                verifying,
            } => raw_sign::<Keccak512>(expanded, message, verifying),
        };
        Signature::from_bytes(signature.to_bytes())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("scheme", &self.scheme)
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Verifies `signature` over `message` under `scheme`.
///
/// Malformed public keys simply fail verification.
pub fn verify(
    scheme: SignatureScheme,
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
        return false;
    };
    let signature = DalekSignature::from_bytes(signature.as_bytes());

    match scheme {
        SignatureScheme::Ed25519Sha512 => verifying_key.verify(message, &signature).is_ok(),
        SignatureScheme::Ed25519Keccak512 => {
            raw_verify::<Keccak512>(&verifying_key, message, &signature).is_ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &str = "ED4C70D78104EB11BCD73EBDC512FEBC8FBCEB36A370C957FF7E266230BB5D57";

    #[test]
    fn sign_and_verify_both_schemes() {
        for scheme in [
            SignatureScheme::Ed25519Sha512,
            SignatureScheme::Ed25519Keccak512,
        ] {
            let key_pair = KeyPair::from_hex(PRIVATE_KEY, scheme).unwrap();
            let signature = key_pair.sign(b"payload");
            assert!(verify(scheme, &key_pair.public_key(), b"payload", &signature));
            assert!(!verify(scheme, &key_pair.public_key(), b"payloaD", &signature));
        }
    }

    #[test]
    fn schemes_derive_different_public_keys() {
        let symbol = KeyPair::from_hex(PRIVATE_KEY, SignatureScheme::Ed25519Sha512).unwrap();
        let nem = KeyPair::from_hex(PRIVATE_KEY, SignatureScheme::Ed25519Keccak512).unwrap();
        assert_ne!(symbol.public_key(), nem.public_key());
    }

    #[test]
    fn signatures_do_not_cross_schemes() {
        let key_pair = KeyPair::from_hex(PRIVATE_KEY, SignatureScheme::Ed25519Sha512).unwrap();
        let signature = key_pair.sign(b"payload");
        assert!(!verify(
            SignatureScheme::Ed25519Keccak512,
            &key_pair.public_key(),
            b"payload",
            &signature
        ));
    }

    #[test]
    fn signing_is_deterministic() {
        let key_pair = KeyPair::from_hex(PRIVATE_KEY, SignatureScheme::Ed25519Keccak512).unwrap();
        assert_eq!(key_pair.sign(b"x"), key_pair.sign(b"x"));
    }

    #[test]
    fn generated_keys_are_distinct() {
        let a = KeyPair::generate(SignatureScheme::Ed25519Sha512);
        let b = KeyPair::generate(SignatureScheme::Ed25519Sha512);
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert_eq!(
            KeyPair::from_hex("not hex", SignatureScheme::Ed25519Sha512).unwrap_err(),
            KeyError::InvalidPrivateKey
        );
        assert!(KeyPair::from_hex("ABCD", SignatureScheme::Ed25519Sha512).is_err());
    }

    #[test]
    fn debug_never_prints_private_key() {
        let key_pair = KeyPair::from_hex(PRIVATE_KEY, SignatureScheme::Ed25519Sha512).unwrap();
        let text = format!("{key_pair:?}");
        assert!(!text.contains(PRIVATE_KEY));
        assert!(text.contains("public_key"));
    }
}
