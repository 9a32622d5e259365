//! # Transaction Factory
//!
//! Turns descriptors into [`Transaction`], [`EmbeddedTransaction`] and
//! [`Block`] values for one network, and bytes back into them.
//!
//! The factory owns its [`RuleRegistry`], built once at construction and
//! never mutated afterwards, so a single factory can be shared by reference
//! across threads.

use tracing::debug;

use crate::codec::{DecodeError, Reader};
use crate::config::BuildOptions;
use crate::crypto::Signature;
use crate::descriptor::{Descriptor, DescriptorValue};
use crate::error::BuildError;
use crate::network::{Network, NetworkFamily};
use crate::rules::{nem_registry, symbol_registry, DescriptorProcessor, Rule, RuleRegistry};
use crate::schema::{Family, StructDef};
use crate::value::StructValue;

use super::objects::{Block, EmbeddedTransaction, Entity, Transaction};

/// Builds entities of one network from descriptors.
#[derive(Debug)]
pub struct TransactionFactory {
    network: Network,
    registry: RuleRegistry,
    options: BuildOptions,
}

impl TransactionFactory {
    pub fn new(network: Network) -> Result<Self, BuildError> {
        Self::with_overrides(network, Vec::new())
    }

    /// Registry rules in `overrides` win over anything autodetected or
    /// registered by default.
    pub fn with_overrides(
        network: Network,
        overrides: Vec<(String, Rule)>,
    ) -> Result<Self, BuildError> {
        let registry = match network.family {
            NetworkFamily::Symbol => symbol_registry(overrides)?,
            NetworkFamily::Nem => nem_registry(overrides)?,
        };
        debug!(network = %network, rules = registry.len(), "transaction factory ready");

        Ok(Self {
            network,
            registry,
            options: BuildOptions::default(),
        })
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    fn processor(&self) -> DescriptorProcessor<'_> {
        DescriptorProcessor::new(&self.registry).with_network(self.network.identifier)
    }

    /// The factory's network always wins over a `network` key in the
    /// descriptor.
    fn build(
        &self,
        family: &'static Family,
        descriptor: &Descriptor,
        autosort: bool,
    ) -> Result<StructValue, BuildError> {
        let mut working = descriptor.clone();
        if working.contains_key("network") {
            working.insert("network", u64::from(self.network.identifier));
        }

        let mut value = self.processor().create_from_factory(family, &working)?;
        if autosort {
            value.sort();
        }
        debug!(
            network = %self.network,
            type_name = value.type_name(),
            size = value.size(),
            autosort,
            "entity built"
        );
        Ok(value)
    }

    /// Builds a top-level transaction, sorted per the factory options.
    pub fn create(&self, descriptor: &Descriptor) -> Result<Transaction, BuildError> {
        self.create_with(descriptor, self.options.autosort)
    }

    pub fn create_with(
        &self,
        descriptor: &Descriptor,
        autosort: bool,
    ) -> Result<Transaction, BuildError> {
        let catalog = self.network.family.catalog();
        self.build(catalog.transactions, descriptor, autosort)
            .map(Transaction::new)
    }

    /// Builds a transaction for embedding in an aggregate (Symbol) or a
    /// multisig wrapper (NEM).
    pub fn create_embedded(
        &self,
        descriptor: &Descriptor,
    ) -> Result<EmbeddedTransaction, BuildError> {
        self.create_embedded_with(descriptor, self.options.autosort)
    }

    pub fn create_embedded_with(
        &self,
        descriptor: &Descriptor,
        autosort: bool,
    ) -> Result<EmbeddedTransaction, BuildError> {
        let catalog = self.network.family.catalog();
        self.build(catalog.embedded, descriptor, autosort)
            .map(EmbeddedTransaction::new)
    }

    pub fn create_block(&self, descriptor: &Descriptor) -> Result<Block, BuildError> {
        self.create_block_with(descriptor, self.options.autosort)
    }

    pub fn create_block_with(
        &self,
        descriptor: &Descriptor,
        autosort: bool,
    ) -> Result<Block, BuildError> {
        let family = self.block_family(descriptor)?;
        self.build(family, descriptor, autosort).map(Block::new)
    }

    fn block_family(&self, descriptor: &Descriptor) -> Result<&'static Family, BuildError> {
        self.network.family.catalog().blocks.ok_or_else(|| {
            let value = match descriptor.get("type") {
                Some(DescriptorValue::Text(name)) => name.clone(),
                Some(DescriptorValue::Int(tag)) => format!("0x{tag:X}"),
                _ => String::new(),
            };
            BuildError::UnknownDiscriminator {
                family: "Block".to_owned(),
                value,
            }
        })
    }

    /// Builds a struct of a fixed catalog type (a mosaic, a cosignature, a
    /// VRF proof) outside any family.
    pub fn create_struct(
        &self,
        def: &'static StructDef,
        descriptor: &Descriptor,
    ) -> Result<StructValue, BuildError> {
        self.processor().create_struct(def, descriptor)
    }

    fn decode(&self, family: &'static Family, bytes: &[u8]) -> Result<StructValue, BuildError> {
        let tag = Reader::new(bytes).peek_int(family.tag_offset, family.tag)?;
        let variant = family.by_tag(tag).ok_or_else(|| DecodeError::UnknownTag {
            family: family.name.to_string(),
            tag,
        })?;
        let value =
            StructValue::deserialize(self.network.family.catalog(), variant.def, bytes)?;
        Ok(value)
    }

    pub fn decode_transaction(&self, bytes: &[u8]) -> Result<Transaction, BuildError> {
        self.decode(self.network.family.catalog().transactions, bytes)
            .map(Transaction::new)
    }

    pub fn decode_embedded(&self, bytes: &[u8]) -> Result<EmbeddedTransaction, BuildError> {
        self.decode(self.network.family.catalog().embedded, bytes)
            .map(EmbeddedTransaction::new)
    }

    pub fn decode_block(&self, bytes: &[u8]) -> Result<Block, BuildError> {
        let family = self.block_family(&Descriptor::new())?;
        self.decode(family, bytes).map(Block::new)
    }

    /// Stores `signature` and returns the JSON body nodes accept for
    /// announcement.
    pub fn attach_signature(
        &self,
        transaction: &mut Transaction,
        signature: &Signature,
    ) -> Result<String, BuildError> {
        transaction.set_signature(signature)?;
        let payload = hex::encode_upper(transaction.serialize());
        Ok(serde_json::json!({ "payload": payload }).to_string())
    }

    /// NEM only: the transaction without its signature, as hashed and
    /// signed.
    pub fn to_non_verifiable_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<StructValue, BuildError> {
        if self.network.family != NetworkFamily::Nem {
            return Err(BuildError::Unsupported {
                operation: "non-verifiable projection",
                network: self.network.to_string(),
            });
        }

        let catalog = self.network.family.catalog();
        let variant = catalog
            .transactions
            .by_def(transaction.value().def())
            .and_then(|variant| catalog.embedded.by_tag(variant.tag))
            .ok_or_else(|| BuildError::UnknownType(transaction.type_name().to_owned()))?;
        Ok(transaction.value().project(variant.def))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor;
    use crate::value::Value;

    fn symbol() -> TransactionFactory {
        TransactionFactory::new(Network::symbol_testnet()).unwrap()
    }

    fn nem() -> TransactionFactory {
        TransactionFactory::new(Network::nem_testnet()).unwrap()
    }

    #[test]
    fn network_comes_from_the_factory() {
        let factory = symbol();
        let transaction = factory
            .create(&descriptor! { "type" => "transfer_transaction", "network" => "mainnet" })
            .unwrap();
        assert_eq!(transaction.value().get_unsigned("network"), Some(0x98));

        let transaction = factory
            .create(&descriptor! { "type" => "transfer_transaction" })
            .unwrap();
        assert_eq!(transaction.value().get_unsigned("network"), Some(0x98));
    }

    #[test]
    fn unknown_type_is_reported_by_name() {
        let err = symbol()
            .create(&descriptor! { "type" => "teleport_transaction" })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown Transaction discriminator: teleport_transaction"
        );
    }

    #[test]
    fn nem_has_no_blocks() {
        let err = nem()
            .create_block(&descriptor! { "type" => "normal_block" })
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownDiscriminator { .. }));
    }

    #[test]
    fn decode_round_trips_a_transfer() {
        let factory = symbol();
        let transaction = factory
            .create(&descriptor! {
                "type" => "transfer_transaction",
                "fee" => 200u64,
                "message" => "round trip",
            })
            .unwrap();
        let decoded = factory.decode_transaction(&transaction.serialize()).unwrap();
        assert_eq!(decoded, transaction);
    }

    #[test]
    fn decode_rejects_unknown_tags() {
        let factory = symbol();
        let mut bytes = factory
            .create(&descriptor! { "type" => "transfer_transaction" })
            .unwrap()
            .serialize();
        bytes[110] = 0xFF;
        bytes[111] = 0xFF;
        assert!(matches!(
            factory.decode_transaction(&bytes),
            Err(BuildError::Decode(DecodeError::UnknownTag { .. }))
        ));
    }

    #[test]
    fn attach_signature_returns_payload_json() {
        let factory = symbol();
        let mut transaction = factory
            .create(&descriptor! { "type" => "transfer_transaction" })
            .unwrap();
        let json = factory
            .attach_signature(&mut transaction, &Signature::from_bytes([0xAA; 64]))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed["payload"].as_str().unwrap(),
            hex::encode_upper(transaction.serialize())
        );
        assert_eq!(transaction.signature().unwrap(), Signature::from_bytes([0xAA; 64]));
    }

    #[test]
    fn nem_projection_drops_the_signature() {
        let factory = nem();
        let mut transaction = factory
            .create(&descriptor! {
                "type" => "mosaic_supply_change_transaction_v1",
                "fee" => 50u64,
            })
            .unwrap();
        transaction
            .set("signature", Value::Bytes(vec![7u8; 64]))
            .unwrap();

        let projected = factory.to_non_verifiable_transaction(&transaction).unwrap();
        assert!(projected.get("signature").is_none());
        assert_eq!(projected.get_unsigned("fee"), Some(50));
        assert_eq!(projected.size(), transaction.size() - 4 - 64);

        assert!(matches!(
            symbol().to_non_verifiable_transaction(&symbol().create(
                &descriptor! { "type" => "transfer_transaction" }
            ).unwrap()),
            Err(BuildError::Unsupported { .. })
        ));
    }

    #[test]
    fn autosort_can_be_disabled_per_call() {
        let factory = symbol();
        let descriptor = descriptor! {
            "type" => "transfer_transaction",
            "mosaics" => vec![
                descriptor! { "mosaic_id" => 9u64, "amount" => 1u64 },
                descriptor! { "mosaic_id" => 3u64, "amount" => 1u64 },
            ],
        };
        let sorted = factory.create(&descriptor).unwrap();
        let unsorted = factory.create_with(&descriptor, false).unwrap();
        assert_ne!(sorted.serialize(), unsorted.serialize());

        let mut resorted = unsorted;
        resorted.sort();
        assert_eq!(resorted, sorted);
    }
}
