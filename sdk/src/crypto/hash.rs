//! # Hash Functions
//!
//! Symbol hashes with SHA3-256, NEM with the pre-standard Keccak-256. Both
//! derive addresses through RIPEMD-160. Everything else in the crate asks a
//! [`HashFunction`] for digests instead of calling a hasher directly, so the
//! network family decides once.

use ripemd::Ripemd160;
use sha3::{Digest, Keccak256, Sha3_256};

use super::byte_array::Hash256;

/// SHA3-256 of `data`.
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    Sha3_256::digest(data).into()
}

/// Keccak-256 (the original submission, not FIPS 202) of `data`.
pub fn keccak_256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// RIPEMD-160 of `data`.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// The 256-bit hash a network family uses for entity hashes, Merkle trees
/// and address checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFunction {
    Sha3_256,
    Keccak256,
}

impl HashFunction {
    pub fn digest(&self, data: &[u8]) -> Hash256 {
        self.digest_parts(&[data])
    }

    /// Hashes the concatenation of `parts` without materializing it.
    pub fn digest_parts(&self, parts: &[&[u8]]) -> Hash256 {
        let bytes: [u8; 32] = match self {
            Self::Sha3_256 => {
                let mut hasher = Sha3_256::new();
                for part in parts {
                    hasher.update(part);
                }
                hasher.finalize().into()
            }
            Self::Keccak256 => {
                let mut hasher = Keccak256::new();
                for part in parts {
                    hasher.update(part);
                }
                hasher.finalize().into()
            }
        };
        Hash256::from_bytes(bytes)
    }
}

/// Folds leaf hashes into a binary Merkle root.
///
/// An odd node at any level is paired with itself, so appending a copy of
/// the last leaf to an odd-length list does not change the root. No leaves
/// at all yields the zero hash.
#[derive(Debug, Clone)]
pub struct MerkleHashBuilder {
    function: HashFunction,
    hashes: Vec<Hash256>,
}

impl MerkleHashBuilder {
    pub fn new(function: HashFunction) -> Self {
        Self {
            function,
            hashes: Vec::new(),
        }
    }

    pub fn update(&mut self, leaf: Hash256) {
        self.hashes.push(leaf);
    }

    pub fn final_hash(self) -> Hash256 {
        let mut level = self.hashes;
        if level.is_empty() {
            return Hash256::zero();
        }

        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| {
                    let left = pair[0];
                    let right = pair.get(1).copied().unwrap_or(left);
                    self.function
                        .digest_parts(&[left.as_bytes(), right.as_bytes()])
                })
                .collect();
        }

        level[0]
    }
}
