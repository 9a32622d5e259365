//! # Cryptographic Primitives
//!
//! Thin, typed wrappers over audited crates:
//!
//! - **ed25519-dalek** for both Ed25519 flavors (standard and Keccak-512).
//! - **sha3** for SHA3-256, Keccak-256 and Keccak-512.
//! - **ripemd** for the RIPEMD-160 step of address derivation.
//!
//! Nothing in here is hand-rolled beyond the Merkle fold.

pub mod byte_array;
pub mod hash;
pub mod keys;

pub use byte_array::{ByteArrayError, Hash256, PrivateKey, ProofVerificationHash, PublicKey, Signature};
pub use hash::{keccak_256, ripemd160, sha3_256, HashFunction, MerkleHashBuilder};
pub use keys::{verify, KeyError, KeyPair, SignatureScheme};
