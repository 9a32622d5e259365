//! # Facade
//!
//! One entry point per network: builds through its [`TransactionFactory`]
//! and knows how that network hashes and signs.
//!
//! | Family | Signed bytes | Hash |
//! |--------|--------------|------|
//! | Symbol | seed + payload after the verifiable header | SHA3-256 of signature, signer, seed and the signed bytes |
//! | NEM    | non-verifiable serialization | Keccak-256 of the signed bytes |
//!
//! Symbol aggregates sign only their 52-byte header remainder (which ends in
//! `transactions_hash`), never the embedded transactions or cosignatures
//! directly.

use tracing::debug;

use crate::config::{BuildOptions, SYMBOL_AGGREGATE_SIGNED_SIZE, SYMBOL_SIGNED_DATA_OFFSET};
use crate::crypto::{verify, Hash256, KeyPair, PrivateKey, PublicKey, Signature};
use crate::error::BuildError;
use crate::network::{Address, Network, NetworkFamily};
use crate::rules::Rule;
use crate::transaction::aggregate;
use crate::transaction::{
    Block, Cosignature, DetachedCosignature, EmbeddedTransaction, Entity, SigningPipeline,
    Transaction, TransactionFactory,
};

const SIGNATURE_RANGE: std::ops::Range<usize> = 8..72;
const SIGNER_RANGE: std::ops::Range<usize> = 72..104;

/// Network-aware transaction building, signing and hashing.
///
/// ```
/// use ledgerkit::{descriptor, Facade};
/// use ledgerkit::crypto::PrivateKey;
/// use ledgerkit::network::Network;
///
/// let facade = Facade::new(Network::symbol_testnet()).unwrap();
/// let key_pair = facade.key_pair(PrivateKey::from_bytes([1u8; 32]));
/// let transaction = facade
///     .factory()
///     .create(&descriptor! {
///         "type" => "transfer_transaction",
///         "signer_public_key" => key_pair.public_key(),
///         "message" => "hello",
///     })
///     .unwrap();
///
/// let signed = facade.pipeline(transaction).run(&key_pair).unwrap();
/// assert!(facade.verify_transaction(
///     &signed.transaction,
///     &signed.transaction.signature().unwrap(),
/// ));
/// ```
#[derive(Debug)]
pub struct Facade {
    factory: TransactionFactory,
}

impl Facade {
    pub fn new(network: Network) -> Result<Self, BuildError> {
        Ok(Self {
            factory: TransactionFactory::new(network)?,
        })
    }

    /// Facade whose registry applies `overrides` on top of the defaults.
    pub fn with_overrides(
        network: Network,
        overrides: Vec<(String, Rule)>,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            factory: TransactionFactory::with_overrides(network, overrides)?,
        })
    }

    pub fn with_options(network: Network, options: BuildOptions) -> Result<Self, BuildError> {
        Ok(Self {
            factory: TransactionFactory::new(network)?.with_options(options),
        })
    }

    pub fn from_factory(factory: TransactionFactory) -> Self {
        Self { factory }
    }

    pub fn network(&self) -> &Network {
        self.factory.network()
    }

    pub fn factory(&self) -> &TransactionFactory {
        &self.factory
    }

    pub fn options(&self) -> BuildOptions {
        self.factory.options()
    }

    fn family(&self) -> NetworkFamily {
        self.network().family
    }

    /// Key pair using this network's signature scheme.
    pub fn key_pair(&self, private_key: PrivateKey) -> KeyPair {
        KeyPair::new(private_key, self.family().signature_scheme())
    }

    pub fn address(&self, public_key: &PublicKey) -> Address {
        self.network().public_key_to_address(public_key)
    }

    fn unsupported(&self, operation: &'static str) -> BuildError {
        BuildError::Unsupported {
            operation,
            network: self.network().to_string(),
        }
    }

    fn generation_hash_seed(&self) -> Result<Hash256, BuildError> {
        self.network()
            .generation_hash_seed
            .ok_or_else(|| self.unsupported("signing without a generation hash seed"))
    }

    /// Part of a Symbol payload covered by signature and hash.
    fn symbol_signed_range(transaction: &Transaction, length: usize) -> std::ops::Range<usize> {
        let end = if transaction.is_aggregate() {
            SYMBOL_SIGNED_DATA_OFFSET + SYMBOL_AGGREGATE_SIGNED_SIZE
        } else {
            length
        };
        SYMBOL_SIGNED_DATA_OFFSET..end.min(length)
    }

    /// Exact bytes the signer signs.
    pub fn signing_data(&self, transaction: &Transaction) -> Result<Vec<u8>, BuildError> {
        match self.family() {
            NetworkFamily::Symbol => {
                let seed = self.generation_hash_seed()?;
                let payload = transaction.serialize();
                let range = Self::symbol_signed_range(transaction, payload.len());
                let mut data = Vec::with_capacity(Hash256::SIZE + range.len());
                data.extend_from_slice(seed.as_bytes());
                data.extend_from_slice(&payload[range]);
                Ok(data)
            }
            NetworkFamily::Nem => Ok(self
                .factory
                .to_non_verifiable_transaction(transaction)?
                .serialize()),
        }
    }

    /// Network hash of a transaction, covering its current signature.
    pub fn hash_transaction(&self, transaction: &Transaction) -> Result<Hash256, BuildError> {
        let function = self.family().hash_function();
        let hash = match self.family() {
            NetworkFamily::Symbol => {
                let seed = self.generation_hash_seed()?;
                let payload = transaction.serialize();
                let range = Self::symbol_signed_range(transaction, payload.len());
                function.digest_parts(&[
                    &payload[SIGNATURE_RANGE],
                    &payload[SIGNER_RANGE],
                    seed.as_bytes(),
                    &payload[range],
                ])
            }
            NetworkFamily::Nem => function.digest(&self.signing_data(transaction)?),
        };
        debug!(type_name = transaction.type_name(), hash = %hash, "transaction hashed");
        Ok(hash)
    }

    /// Signs without attaching.
    pub fn sign_transaction(
        &self,
        key_pair: &KeyPair,
        transaction: &Transaction,
    ) -> Result<Signature, BuildError> {
        let expected = self.family().signature_scheme();
        if key_pair.scheme() != expected {
            return Err(BuildError::invalid(
                "key_pair",
                format!("{:?} keys cannot sign for {}", key_pair.scheme(), self.network()),
            ));
        }
        Ok(key_pair.sign(&self.signing_data(transaction)?))
    }

    /// Checks `signature` against the transaction's own signer.
    pub fn verify_transaction(&self, transaction: &Transaction, signature: &Signature) -> bool {
        let (Ok(signer), Ok(data)) = (
            transaction.signer_public_key(),
            self.signing_data(transaction),
        ) else {
            return false;
        };
        verify(self.family().signature_scheme(), &signer, &data, signature)
    }

    /// Attaches `signature` and returns the JSON announcement body.
    pub fn attach_signature(
        &self,
        transaction: &mut Transaction,
        signature: &Signature,
    ) -> Result<String, BuildError> {
        self.factory.attach_signature(transaction, signature)
    }

    pub fn pipeline(&self, transaction: Transaction) -> SigningPipeline<'_> {
        SigningPipeline::new(self, transaction)
    }

    pub fn hash_embedded_transactions(&self, transactions: &[EmbeddedTransaction]) -> Hash256 {
        aggregate::hash_embedded_transactions(self.family().hash_function(), transactions)
    }

    /// Recomputes `transactions_hash` of a Symbol aggregate.
    pub fn bind_aggregate(&self, transaction: &mut Transaction) -> Result<Hash256, BuildError> {
        if self.family() != NetworkFamily::Symbol {
            return Err(self.unsupported("aggregate binding"));
        }
        aggregate::bind_aggregate(self.family().hash_function(), transaction)
    }

    fn cosignable_hash(&self, transaction: &Transaction) -> Result<Hash256, BuildError> {
        if self.family() != NetworkFamily::Symbol {
            return Err(self.unsupported("cosignature"));
        }
        self.hash_transaction(transaction)
    }

    pub fn cosign_transaction(
        &self,
        key_pair: &KeyPair,
        transaction: &Transaction,
    ) -> Result<Cosignature, BuildError> {
        let hash = self.cosignable_hash(transaction)?;
        Ok(aggregate::cosign(key_pair, &hash))
    }

    pub fn cosign_transaction_detached(
        &self,
        key_pair: &KeyPair,
        transaction: &Transaction,
    ) -> Result<DetachedCosignature, BuildError> {
        let hash = self.cosignable_hash(transaction)?;
        Ok(aggregate::cosign_detached(key_pair, &hash))
    }

    pub fn verify_cosignature(
        &self,
        transaction: &Transaction,
        cosignature: &Cosignature,
    ) -> Result<bool, BuildError> {
        let hash = self.cosignable_hash(transaction)?;
        Ok(aggregate::verify_cosignature(
            self.family().signature_scheme(),
            &hash,
            cosignature,
        ))
    }

    pub fn add_cosignature(
        &self,
        transaction: &mut Transaction,
        cosignature: &Cosignature,
    ) -> Result<(), BuildError> {
        if self.family() != NetworkFamily::Symbol {
            return Err(self.unsupported("cosignature"));
        }
        aggregate::add_cosignature(transaction, cosignature)
    }

    pub fn deserialize_transaction(&self, bytes: &[u8]) -> Result<Transaction, BuildError> {
        self.factory.decode_transaction(bytes)
    }

    pub fn deserialize_embedded(&self, bytes: &[u8]) -> Result<EmbeddedTransaction, BuildError> {
        self.factory.decode_embedded(bytes)
    }

    pub fn deserialize_block(&self, bytes: &[u8]) -> Result<Block, BuildError> {
        self.factory.decode_block(bytes)
    }
}
