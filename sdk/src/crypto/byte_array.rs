//! Fixed-size byte newtypes.
//!
//! Hashes, keys and signatures are all "N bytes with a hex face". Each one
//! gets its own type so a `PublicKey` can never be passed where a `Hash256`
//! is expected, but they share one implementation through a macro.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Why a byte array could not be constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ByteArrayError {
    #[error("expected {expected} bytes, got {actual}")]
    WrongSize { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

macro_rules! byte_array {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; $size]);

        impl $name {
            /// Length in bytes.
            pub const SIZE: usize = $size;

            pub const fn from_bytes(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            /// All-zero value, used as a placeholder before signing.
            pub const fn zero() -> Self {
                Self([0u8; $size])
            }

            pub fn try_from_slice(bytes: &[u8]) -> Result<Self, ByteArrayError> {
                let array: [u8; $size] =
                    bytes.try_into().map_err(|_| ByteArrayError::WrongSize {
                        expected: $size,
                        actual: bytes.len(),
                    })?;
                Ok(Self(array))
            }

            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            pub fn to_vec(&self) -> Vec<u8> {
                self.0.to_vec()
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|byte| *byte == 0)
            }
        }

        impl FromStr for $name {
            type Err = ByteArrayError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                let bytes =
                    hex::decode(text).map_err(|e| ByteArrayError::InvalidHex(e.to_string()))?;
                Self::try_from_slice(&bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }
    };
}

macro_rules! public_byte_array {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        byte_array!($(#[$meta])* $name, $size);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode_upper(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

public_byte_array!(
    /// 32-byte digest (SHA3-256 on Symbol, Keccak-256 on NEM).
    Hash256,
    32
);

public_byte_array!(
    /// Ed25519 public key.
    PublicKey,
    32
);

public_byte_array!(
    /// Ed25519 signature.
    Signature,
    64
);

public_byte_array!(
    /// VRF proof verification hash carried by Symbol block headers.
    ProofVerificationHash,
    16
);

byte_array!(
    /// Ed25519 private key material.
    ///
    /// Deliberately has no `Display` and no serde support. The `Debug`
    /// output is redacted.
    PrivateKey,
    32
);

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl PrivateKey {
    /// Uppercase hex of the key. Handle the result as carefully as the key.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_is_uppercase() {
        let hash: Hash256 = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff"
            .parse()
            .unwrap();
        assert_eq!(
            hash.to_string(),
            "00112233445566778899AABBCCDDEEFF00112233445566778899AABBCCDDEEFF"
        );
    }

    #[test]
    fn wrong_size_is_rejected() {
        let err = PublicKey::try_from_slice(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            ByteArrayError::WrongSize {
                expected: 32,
                actual: 3
            }
        );
        assert!("ABCD".parse::<Signature>().is_err());
        assert!(matches!(
            "ZZ".parse::<Hash256>(),
            Err(ByteArrayError::InvalidHex(_))
        ));
    }

    #[test]
    fn zero_and_ordering() {
        assert!(Hash256::zero().is_zero());
        let low = Hash256::from_bytes([0u8; 32]);
        let mut high_bytes = [0u8; 32];
        high_bytes[0] = 1;
        let high = Hash256::from_bytes(high_bytes);
        assert!(low < high);
        assert!(!high.is_zero());
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let key = PrivateKey::from_bytes([7u8; 32]);
        assert_eq!(format!("{key:?}"), "PrivateKey(<redacted>)");
        assert_eq!(key.to_hex(), "07".repeat(32));
    }

    #[test]
    fn serde_uses_hex_strings() {
        let key = PublicKey::from_bytes([0xAB; 32]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", "AB".repeat(32)));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn proof_verification_hash_is_sixteen_bytes() {
        assert_eq!(ProofVerificationHash::SIZE, 16);
        assert_eq!(ProofVerificationHash::zero().as_bytes().len(), 16);
    }
}
