//! # Networks
//!
//! A [`Network`] pins down everything that differs between chains of the
//! same family: identifier byte, generation hash seed and epoch. The
//! [`NetworkFamily`] decides the algorithms (hash, signature flavor, address
//! scheme) and which type catalog entities are built from.

pub mod address;
pub mod id_generator;
pub mod timestamp;

use std::fmt;

use chrono::{DateTime, Utc};

pub use address::{Address, AddressError};
pub use id_generator::{
    generate_mosaic_alias_id, generate_mosaic_id, generate_namespace_id, generate_namespace_path,
};
pub use timestamp::{NetworkTimestamp, TimeResolution};

use crate::config::{
    network_name, NEM_EPOCH_SECONDS, NEM_MAINNET_IDENTIFIER, NEM_TESTNET_IDENTIFIER,
    SYMBOL_MAINNET_EPOCH_SECONDS, SYMBOL_MAINNET_GENERATION_HASH_SEED, SYMBOL_MAINNET_IDENTIFIER,
    SYMBOL_TESTNET_EPOCH_SECONDS, SYMBOL_TESTNET_GENERATION_HASH_SEED, SYMBOL_TESTNET_IDENTIFIER,
};
use crate::crypto::{Hash256, HashFunction, PublicKey, SignatureScheme};
use crate::schema::{nem, symbol, Catalog};

/// Chain family. Selects algorithms and the type catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NetworkFamily {
    Symbol,
    Nem,
}

impl NetworkFamily {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Nem => "nem",
        }
    }

    pub fn hash_function(&self) -> HashFunction {
        match self {
            Self::Symbol => HashFunction::Sha3_256,
            Self::Nem => HashFunction::Keccak256,
        }
    }

    pub fn signature_scheme(&self) -> SignatureScheme {
        match self {
            Self::Symbol => SignatureScheme::Ed25519Sha512,
            Self::Nem => SignatureScheme::Ed25519Keccak512,
        }
    }

    pub fn catalog(&self) -> &'static Catalog {
        match self {
            Self::Symbol => &symbol::CATALOG,
            Self::Nem => &nem::CATALOG,
        }
    }

    pub fn time_resolution(&self) -> TimeResolution {
        match self {
            Self::Symbol => TimeResolution::Milliseconds,
            Self::Nem => TimeResolution::Seconds,
        }
    }
}

impl fmt::Display for NetworkFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One concrete chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub name: &'static str,
    pub family: NetworkFamily,
    pub identifier: u8,
    /// Mixed into Symbol signatures and hashes. NEM has none.
    pub generation_hash_seed: Option<Hash256>,
    pub epoch: DateTime<Utc>,
}

fn epoch_at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

impl Network {
    pub fn symbol_mainnet() -> Self {
        Self {
            name: "mainnet",
            family: NetworkFamily::Symbol,
            identifier: SYMBOL_MAINNET_IDENTIFIER,
            generation_hash_seed: Some(Hash256::from_bytes(SYMBOL_MAINNET_GENERATION_HASH_SEED)),
            epoch: epoch_at(SYMBOL_MAINNET_EPOCH_SECONDS),
        }
    }

    pub fn symbol_testnet() -> Self {
        Self {
            name: "testnet",
            family: NetworkFamily::Symbol,
            identifier: SYMBOL_TESTNET_IDENTIFIER,
            generation_hash_seed: Some(Hash256::from_bytes(SYMBOL_TESTNET_GENERATION_HASH_SEED)),
            epoch: epoch_at(SYMBOL_TESTNET_EPOCH_SECONDS),
        }
    }

    pub fn nem_mainnet() -> Self {
        Self {
            name: "mainnet",
            family: NetworkFamily::Nem,
            identifier: NEM_MAINNET_IDENTIFIER,
            generation_hash_seed: None,
            epoch: epoch_at(NEM_EPOCH_SECONDS),
        }
    }

    pub fn nem_testnet() -> Self {
        Self {
            name: "testnet",
            family: NetworkFamily::Nem,
            identifier: NEM_TESTNET_IDENTIFIER,
            generation_hash_seed: None,
            epoch: epoch_at(NEM_EPOCH_SECONDS),
        }
    }

    /// Looks up a well-known network by family and name.
    pub fn find(family: NetworkFamily, name: &str) -> Option<Self> {
        match (family, name) {
            (NetworkFamily::Symbol, "mainnet") => Some(Self::symbol_mainnet()),
            (NetworkFamily::Symbol, "testnet") => Some(Self::symbol_testnet()),
            (NetworkFamily::Nem, "mainnet") => Some(Self::nem_mainnet()),
            (NetworkFamily::Nem, "testnet") => Some(Self::nem_testnet()),
            _ => None,
        }
    }

    /// Parses `family:name`, e.g. `symbol:testnet`.
    pub fn parse(text: &str) -> Option<Self> {
        let (family, name) = text.split_once(':')?;
        let family = match family {
            "symbol" => NetworkFamily::Symbol,
            "nem" => NetworkFamily::Nem,
            _ => return None,
        };
        Self::find(family, name)
    }

    pub fn public_key_to_address(&self, public_key: &PublicKey) -> Address {
        Address::from_public_key(self.family, self.identifier, public_key)
    }

    /// True when `address` belongs to this network and its checksum holds.
    pub fn is_valid_address(&self, address: &Address) -> bool {
        address.family() == self.family
            && address.network_identifier() == self.identifier
            && address.has_valid_checksum()
    }

    pub fn parse_address(&self, text: &str) -> Result<Address, AddressError> {
        Address::parse(self.family, text)
    }

    /// Network time right now.
    pub fn now(&self) -> NetworkTimestamp {
        self.timestamp_at(Utc::now())
            .unwrap_or_else(|| NetworkTimestamp::new(0, self.family.time_resolution()))
    }

    pub fn timestamp_at(&self, instant: DateTime<Utc>) -> Option<NetworkTimestamp> {
        NetworkTimestamp::from_datetime(instant, self.epoch, self.family.time_resolution())
    }

    pub fn to_datetime(&self, timestamp: &NetworkTimestamp) -> Option<DateTime<Utc>> {
        timestamp.to_datetime(self.epoch)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&network_name(self.family.name(), self.identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_networks() {
        let network = Network::parse("symbol:testnet").unwrap();
        assert_eq!(network.identifier, 0x98);
        assert!(network.generation_hash_seed.is_some());

        let network = Network::parse("nem:mainnet").unwrap();
        assert_eq!(network.family, NetworkFamily::Nem);
        assert!(network.generation_hash_seed.is_none());

        assert!(Network::parse("symbol:devnet").is_none());
        assert!(Network::parse("bitcoin:mainnet").is_none());
        assert!(Network::parse("symbol").is_none());
    }

    #[test]
    fn display_uses_family_and_name() {
        assert_eq!(Network::symbol_mainnet().to_string(), "symbol:mainnet");
        assert_eq!(Network::nem_testnet().to_string(), "nem:testnet");
    }

    #[test]
    fn epochs_match_constants() {
        assert_eq!(
            Network::symbol_mainnet().epoch.to_rfc3339(),
            "2021-03-16T00:06:25+00:00"
        );
        assert_eq!(
            Network::nem_mainnet().epoch.to_rfc3339(),
            "2015-03-29T00:06:25+00:00"
        );
    }

    #[test]
    fn address_validity_is_network_scoped() {
        let key = PublicKey::from_bytes([3u8; 32]);
        let testnet = Network::symbol_testnet();
        let address = testnet.public_key_to_address(&key);
        assert!(testnet.is_valid_address(&address));
        assert!(!Network::symbol_mainnet().is_valid_address(&address));
        assert!(!Network::nem_testnet().is_valid_address(&address));
    }

    #[test]
    fn now_is_after_epoch() {
        let network = Network::symbol_testnet();
        assert!(!network.now().is_epochal());
        assert_eq!(
            network.now().resolution(),
            TimeResolution::Milliseconds
        );
    }
}
