//! # Network Parameters & Builder Defaults
//!
//! Every magic number the builder relies on lives here: network identifiers,
//! generation hash seeds, epochs, header geometry and the default fee policy.
//! The values are consensus facts of the target chains, so they are not
//! configurable at runtime. Only [`BuildOptions`] is.

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Symbol mainnet identifier. Addresses on this network start with `N`.
pub const SYMBOL_MAINNET_IDENTIFIER: u8 = 0x68;

/// Symbol public testnet identifier. Addresses start with `T`.
pub const SYMBOL_TESTNET_IDENTIFIER: u8 = 0x98;

/// NEM mainnet identifier.
pub const NEM_MAINNET_IDENTIFIER: u8 = 0x68;

/// NEM testnet identifier.
pub const NEM_TESTNET_IDENTIFIER: u8 = 0x98;

// ---------------------------------------------------------------------------
// Generation Hash Seeds
// ---------------------------------------------------------------------------

/// Symbol mainnet generation hash seed. Prepended to every signed payload so
/// a signature can never be replayed on another network.
pub const SYMBOL_MAINNET_GENERATION_HASH_SEED: [u8; 32] = [
    0x57, 0xF7, 0xDA, 0x20, 0x50, 0x08, 0x02, 0x6C, 0x77, 0x6C, 0xB6, 0xAE, 0xD8, 0x43, 0x39, 0x3F,
    0x04, 0xCD, 0x45, 0x8E, 0x0A, 0xA2, 0xD9, 0xF1, 0xD5, 0xF3, 0x1A, 0x40, 0x20, 0x72, 0xB2, 0xD6,
];

/// Symbol testnet generation hash seed.
pub const SYMBOL_TESTNET_GENERATION_HASH_SEED: [u8; 32] = [
    0x49, 0xD6, 0xE1, 0xCE, 0x27, 0x6A, 0x85, 0xB7, 0x0E, 0xAF, 0xE5, 0x23, 0x49, 0xAA, 0xCC, 0xA3,
    0x89, 0x30, 0x2E, 0x7A, 0x97, 0x54, 0xBC, 0xF1, 0x22, 0x1E, 0x79, 0x49, 0x4F, 0xC6, 0x65, 0xA4,
];

// ---------------------------------------------------------------------------
// Epochs (unix seconds)
// ---------------------------------------------------------------------------

/// 2021-03-16 00:06:25 UTC. Symbol mainnet timestamps count milliseconds from here.
pub const SYMBOL_MAINNET_EPOCH_SECONDS: i64 = 1_615_853_185;

/// 2022-10-31 21:07:47 UTC.
pub const SYMBOL_TESTNET_EPOCH_SECONDS: i64 = 1_667_250_467;

/// 2015-03-29 00:06:25 UTC. NEM timestamps count whole seconds from here,
/// on both mainnet and testnet.
pub const NEM_EPOCH_SECONDS: i64 = 1_427_587_585;

// ---------------------------------------------------------------------------
// Entity Geometry
// ---------------------------------------------------------------------------

/// Bytes of a Symbol transaction that precede the signed region: size,
/// reserved word, signature and signer public key.
pub const SYMBOL_VERIFIABLE_HEADER_SIZE: usize = 4 + 4 + 64 + 32;

/// Offset of the first signed byte of a Symbol transaction. The reserved
/// word after the signer key is not part of the signed data.
pub const SYMBOL_SIGNED_DATA_OFFSET: usize = SYMBOL_VERIFIABLE_HEADER_SIZE + 4;

/// Length of the aggregate prefix covered by its signature: the header tail
/// (version through deadline) followed by the transactions hash.
pub const SYMBOL_AGGREGATE_SIGNED_SIZE: usize = 52;

/// Embedded transactions and block transactions are padded to this boundary.
pub const SYMBOL_ENTITY_ALIGNMENT: usize = 8;

/// Raw Symbol address length: network byte, 20-byte ripemd digest, 3-byte checksum.
pub const SYMBOL_ADDRESS_SIZE: usize = 24;

/// Text form length of a Symbol address.
pub const SYMBOL_ADDRESS_TEXT_SIZE: usize = 39;

/// Raw NEM address length: network byte, 20-byte ripemd digest, 4-byte checksum.
pub const NEM_ADDRESS_SIZE: usize = 25;

/// NEM addresses travel on the wire as their 40 ASCII characters.
pub const NEM_ADDRESS_TEXT_SIZE: usize = 40;

/// High bit that marks a Symbol id as a namespace id.
pub const NAMESPACE_FLAG: u64 = 1 << 63;

// ---------------------------------------------------------------------------
// Fee Policy
// ---------------------------------------------------------------------------

/// Default fee multiplier: fee = multiplier x serialized size.
pub const DEFAULT_FEE_MULTIPLIER: u64 = 100;

/// Runtime knobs for building transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Canonically reorder sortable arrays before serialization.
    pub autosort: bool,
    /// Fee per serialized byte.
    pub fee_multiplier: u64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            autosort: true,
            fee_multiplier: DEFAULT_FEE_MULTIPLIER,
        }
    }
}

/// Returns a human-readable name for a network identifier within a family.
pub fn network_name(family: &str, identifier: u8) -> String {
    match identifier {
        0x68 => format!("{family}:mainnet"),
        0x98 => format!("{family}:testnet"),
        other => format!("{family}:unknown(0x{other:02X})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_differ_per_network() {
        assert_ne!(SYMBOL_MAINNET_IDENTIFIER, SYMBOL_TESTNET_IDENTIFIER);
        assert_ne!(NEM_MAINNET_IDENTIFIER, NEM_TESTNET_IDENTIFIER);
    }

    #[test]
    fn seeds_differ() {
        assert_ne!(
            SYMBOL_MAINNET_GENERATION_HASH_SEED,
            SYMBOL_TESTNET_GENERATION_HASH_SEED
        );
    }

    #[test]
    fn epochs_are_ordered() {
        assert!(NEM_EPOCH_SECONDS < SYMBOL_MAINNET_EPOCH_SECONDS);
        assert!(SYMBOL_MAINNET_EPOCH_SECONDS < SYMBOL_TESTNET_EPOCH_SECONDS);
    }

    #[test]
    fn header_geometry() {
        assert_eq!(SYMBOL_VERIFIABLE_HEADER_SIZE, 104);
        assert_eq!(SYMBOL_SIGNED_DATA_OFFSET, 108);
    }

    #[test]
    fn default_options_sort_and_charge_100() {
        let options = BuildOptions::default();
        assert!(options.autosort);
        assert_eq!(options.fee_multiplier, 100);
    }

    #[test]
    fn network_names() {
        assert_eq!(network_name("symbol", 0x98), "symbol:testnet");
        assert_eq!(network_name("nem", 0x68), "nem:mainnet");
        assert_eq!(network_name("nem", 0x01), "nem:unknown(0x01)");
    }
}
