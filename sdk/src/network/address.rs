//! # Account Addresses
//!
//! Both families derive an address the same way and only differ in the
//! digest and checksum width:
//!
//! ```text
//! public_key (32 bytes)
//!     -> H(public_key)                       H = SHA3-256 | Keccak-256
//!     -> RIPEMD-160(...)                     20 bytes
//!     -> network_byte || ripemd              21 bytes
//!     -> ... || H(those 21 bytes)[..N]       N = 3 (Symbol) | 4 (NEM)
//! ```
//!
//! Symbol renders the 24 raw bytes as 39 base32 characters (one zero byte is
//! appended before encoding and the final character dropped). NEM renders its
//! 25 bytes as exactly 40 base32 characters, and it is that ASCII text, not
//! the raw bytes, that NEM puts on the wire.

use std::fmt;

use data_encoding::BASE32;
use thiserror::Error;

use super::NetworkFamily;
use crate::config::{
    NEM_ADDRESS_SIZE, NEM_ADDRESS_TEXT_SIZE, SYMBOL_ADDRESS_SIZE, SYMBOL_ADDRESS_TEXT_SIZE,
};
use crate::crypto::{ripemd160, PublicKey};

/// Errors from parsing or validating addresses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid base32 address: {0}")]
    InvalidEncoding(String),

    #[error("address checksum mismatch")]
    InvalidChecksum,
}

/// A decoded account address tagged with the family that produced it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    family: NetworkFamily,
    bytes: Vec<u8>,
}

const RIPEMD_END: usize = 21;

impl Address {
    /// Derives the address of `public_key` on the network `identifier`.
    pub fn from_public_key(family: NetworkFamily, identifier: u8, public_key: &PublicKey) -> Self {
        let function = family.hash_function();
        let digest = function.digest(public_key.as_bytes());

        let mut bytes = Vec::with_capacity(family.address_size());
        bytes.push(identifier);
        bytes.extend_from_slice(&ripemd160(digest.as_bytes()));

        let checksum = function.digest(&bytes);
        bytes.extend_from_slice(&checksum.as_bytes()[..family.checksum_size()]);

        Self { family, bytes }
    }

    /// Wraps raw address bytes after checking length and checksum.
    pub fn from_bytes(family: NetworkFamily, bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != family.address_size() {
            return Err(AddressError::InvalidLength {
                expected: family.address_size(),
                got: bytes.len(),
            });
        }

        let address = Self {
            family,
            bytes: bytes.to_vec(),
        };
        if !address.has_valid_checksum() {
            return Err(AddressError::InvalidChecksum);
        }
        Ok(address)
    }

    /// Parses the base32 text form.
    pub fn parse(family: NetworkFamily, text: &str) -> Result<Self, AddressError> {
        let expected = match family {
            NetworkFamily::Symbol => SYMBOL_ADDRESS_TEXT_SIZE,
            NetworkFamily::Nem => NEM_ADDRESS_TEXT_SIZE,
        };
        if text.len() != expected {
            return Err(AddressError::InvalidLength {
                expected,
                got: text.len(),
            });
        }

        let mut padded = text.to_ascii_uppercase();
        if family == NetworkFamily::Symbol {
            padded.push('A');
        }
        let decoded = BASE32
            .decode(padded.as_bytes())
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;

        Self::from_bytes(family, &decoded[..family.address_size()])
    }

    pub fn family(&self) -> NetworkFamily {
        self.family
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The network identifier byte the address was derived for.
    pub fn network_identifier(&self) -> u8 {
        self.bytes[0]
    }

    /// Bytes as they appear inside serialized entities.
    pub fn wire_bytes(&self) -> Vec<u8> {
        match self.family {
            NetworkFamily::Symbol => self.bytes.clone(),
            NetworkFamily::Nem => self.to_string().into_bytes(),
        }
    }

    /// Inverse of [`wire_bytes`](Self::wire_bytes).
    pub fn from_wire_bytes(family: NetworkFamily, wire: &[u8]) -> Result<Self, AddressError> {
        match family {
            NetworkFamily::Symbol => Self::from_bytes(family, wire),
            NetworkFamily::Nem => {
                let text = std::str::from_utf8(wire)
                    .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;
                Self::parse(family, text)
            }
        }
    }

    pub fn has_valid_checksum(&self) -> bool {
        let checksum = self.family.hash_function().digest(&self.bytes[..RIPEMD_END]);
        self.bytes[RIPEMD_END..] == checksum.as_bytes()[..self.family.checksum_size()]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family {
            NetworkFamily::Symbol => {
                let mut padded = self.bytes.clone();
                padded.push(0);
                let text = BASE32.encode(&padded);
                f.write_str(&text[..SYMBOL_ADDRESS_TEXT_SIZE])
            }
            NetworkFamily::Nem => f.write_str(&BASE32.encode(&self.bytes)),
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl NetworkFamily {
    pub(crate) fn address_size(&self) -> usize {
        match self {
            Self::Symbol => SYMBOL_ADDRESS_SIZE,
            Self::Nem => NEM_ADDRESS_SIZE,
        }
    }

    fn checksum_size(&self) -> usize {
        self.address_size() - RIPEMD_END
    }

    /// Bytes an address occupies inside a serialized entity.
    pub(crate) fn address_wire_size(&self) -> usize {
        match self {
            Self::Symbol => SYMBOL_ADDRESS_SIZE,
            Self::Nem => NEM_ADDRESS_TEXT_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> PublicKey {
        PublicKey::from_bytes([byte; 32])
    }

    #[test]
    fn symbol_address_shape() {
        let address = Address::from_public_key(NetworkFamily::Symbol, 0x98, &key(1));
        assert_eq!(address.as_bytes().len(), 24);
        assert_eq!(address.network_identifier(), 0x98);

        let text = address.to_string();
        assert_eq!(text.len(), 39);
        assert!(text.starts_with('T'));
        assert!(address.has_valid_checksum());
    }

    #[test]
    fn mainnet_symbol_addresses_start_with_n() {
        let address = Address::from_public_key(NetworkFamily::Symbol, 0x68, &key(2));
        assert!(address.to_string().starts_with('N'));
    }

    #[test]
    fn text_round_trip_both_families() {
        for family in [NetworkFamily::Symbol, NetworkFamily::Nem] {
            let address = Address::from_public_key(family, 0x98, &key(3));
            let parsed = Address::parse(family, &address.to_string()).unwrap();
            assert_eq!(parsed, address);
        }
    }

    #[test]
    fn nem_wire_form_is_ascii_text() {
        let address = Address::from_public_key(NetworkFamily::Nem, 0x98, &key(4));
        let wire = address.wire_bytes();
        assert_eq!(wire.len(), 40);
        assert_eq!(wire, address.to_string().into_bytes());
        assert_eq!(
            Address::from_wire_bytes(NetworkFamily::Nem, &wire).unwrap(),
            address
        );
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let address = Address::from_public_key(NetworkFamily::Symbol, 0x98, &key(5));
        let mut bytes = address.as_bytes().to_vec();
        bytes[23] ^= 0xFF;
        assert_eq!(
            Address::from_bytes(NetworkFamily::Symbol, &bytes).unwrap_err(),
            AddressError::InvalidChecksum
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(matches!(
            Address::parse(NetworkFamily::Symbol, "TOO-SHORT"),
            Err(AddressError::InvalidLength { expected: 39, .. })
        ));
        assert!(matches!(
            Address::from_bytes(NetworkFamily::Nem, &[0u8; 24]),
            Err(AddressError::InvalidLength { expected: 25, .. })
        ));
    }

    #[test]
    fn lowercase_text_is_accepted() {
        let address = Address::from_public_key(NetworkFamily::Symbol, 0x98, &key(6));
        let lower = address.to_string().to_ascii_lowercase();
        assert_eq!(Address::parse(NetworkFamily::Symbol, &lower).unwrap(), address);
    }
}
