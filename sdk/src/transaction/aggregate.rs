//! Aggregate binding and cosignatures.
//!
//! An aggregate commits to its embedded transactions through
//! `transactions_hash`: the Merkle root of the hashes of each embedded
//! transaction's exact serialization, in the order given. Reordering,
//! altering or removing any embedded transaction changes the root, and so
//! does adding a distinct one.
//!
//! The tree pairs an odd node with itself, as Symbol nodes do when they
//! recompute the root. A list of odd length and the same list with its last
//! transaction repeated therefore share a root: `[a, b, c]` and
//! `[a, b, c, c]` commit to the same hash.
//!
//! Cosigners sign the aggregate's *transaction hash*, which covers
//! `transactions_hash` but not the cosignatures themselves, so every
//! cosignature verifies on its own regardless of what else is attached.

use tracing::debug;

use crate::crypto::{verify, Hash256, HashFunction, KeyPair, MerkleHashBuilder, SignatureScheme};
use crate::descriptor::{Descriptor, DescriptorValue};
use crate::error::BuildError;
use crate::network::NetworkFamily;
use crate::value::Value;

use super::factory::TransactionFactory;
use super::objects::{Cosignature, DetachedCosignature, EmbeddedTransaction, Entity, Transaction};

/// Merkle root over the embedded transactions, order preserved.
pub fn hash_embedded_transactions(
    function: HashFunction,
    transactions: &[EmbeddedTransaction],
) -> Hash256 {
    let mut builder = MerkleHashBuilder::new(function);
    for transaction in transactions {
        builder.update(function.digest(&transaction.serialize()));
    }
    builder.final_hash()
}

fn require_aggregate(transaction: &Transaction) -> Result<(), BuildError> {
    if !transaction.is_aggregate() {
        return Err(BuildError::invalid(
            "transactions",
            format!("{} is not an aggregate", transaction.type_name()),
        ));
    }
    Ok(())
}

/// Recomputes and stores `transactions_hash` from the embedded transactions
/// the aggregate currently holds.
pub fn bind_aggregate(
    function: HashFunction,
    transaction: &mut Transaction,
) -> Result<Hash256, BuildError> {
    require_aggregate(transaction)?;
    let hash = hash_embedded_transactions(function, &transaction.embedded_transactions());
    transaction.set("transactions_hash", Value::Bytes(hash.to_vec()))?;
    Ok(hash)
}

/// Cosignature over `transaction_hash`.
pub fn cosign(key_pair: &KeyPair, transaction_hash: &Hash256) -> Cosignature {
    Cosignature {
        version: 0,
        signer_public_key: key_pair.public_key(),
        signature: key_pair.sign(transaction_hash.as_bytes()),
    }
}

pub fn cosign_detached(key_pair: &KeyPair, transaction_hash: &Hash256) -> DetachedCosignature {
    let cosignature = cosign(key_pair, transaction_hash);
    DetachedCosignature {
        version: cosignature.version,
        signer_public_key: cosignature.signer_public_key,
        signature: cosignature.signature,
        parent_hash: *transaction_hash,
    }
}

pub fn verify_cosignature(
    scheme: SignatureScheme,
    transaction_hash: &Hash256,
    cosignature: &Cosignature,
) -> bool {
    verify(
        scheme,
        &cosignature.signer_public_key,
        transaction_hash.as_bytes(),
        &cosignature.signature,
    )
}

/// Appends a cosignature to an aggregate.
pub fn add_cosignature(
    transaction: &mut Transaction,
    cosignature: &Cosignature,
) -> Result<(), BuildError> {
    require_aggregate(transaction)?;
    let mut cosignatures = transaction
        .value()
        .get_array("cosignatures")
        .map(<[Value]>::to_vec)
        .unwrap_or_default();
    cosignatures.push(Value::Struct(cosignature.to_value()));
    transaction.set("cosignatures", Value::Array(cosignatures))
}

/// Collects embedded transactions and wraps them in an aggregate whose
/// `transactions_hash` is bound to them.
///
/// ```
/// use ledgerkit::descriptor;
/// use ledgerkit::network::Network;
/// use ledgerkit::transaction::{AggregateAssembler, TransactionFactory};
///
/// let factory = TransactionFactory::new(Network::symbol_testnet()).unwrap();
/// let embedded = factory
///     .create_embedded(&descriptor! { "type" => "transfer_transaction", "message" => "hi" })
///     .unwrap();
///
/// let mut assembler = AggregateAssembler::complete(&factory);
/// assembler.push(embedded);
/// let aggregate = assembler.assemble(&descriptor! { "fee" => 0u64 }).unwrap();
/// assert!(aggregate.is_aggregate());
/// ```
pub struct AggregateAssembler<'f> {
    factory: &'f TransactionFactory,
    bonded: bool,
    transactions: Vec<EmbeddedTransaction>,
}

impl<'f> AggregateAssembler<'f> {
    pub fn complete(factory: &'f TransactionFactory) -> Self {
        Self {
            factory,
            bonded: false,
            transactions: Vec::new(),
        }
    }

    pub fn bonded(factory: &'f TransactionFactory) -> Self {
        Self {
            factory,
            bonded: true,
            transactions: Vec::new(),
        }
    }

    pub fn push(&mut self, transaction: EmbeddedTransaction) -> &mut Self {
        self.transactions.push(transaction);
        self
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Builds the aggregate from `header` (signer, fee, deadline and so on)
    /// plus the collected transactions.
    pub fn assemble(self, header: &Descriptor) -> Result<Transaction, BuildError> {
        let network = self.factory.network();
        if network.family != NetworkFamily::Symbol {
            return Err(BuildError::Unsupported {
                operation: "aggregate assembly",
                network: network.to_string(),
            });
        }

        let kind = if self.bonded {
            "aggregate_bonded_transaction"
        } else {
            "aggregate_complete_transaction"
        };
        let count = self.transactions.len();
        let embedded: Vec<DescriptorValue> = self
            .transactions
            .into_iter()
            .map(DescriptorValue::from)
            .collect();
        let descriptor = header
            .clone()
            .with("type", kind)
            .with("transactions", embedded);

        let mut aggregate = self.factory.create(&descriptor)?;
        let hash = bind_aggregate(network.family.hash_function(), &mut aggregate)?;
        debug!(kind, embedded = count, transactions_hash = %hash, "aggregate assembled");
        Ok(aggregate)
    }
}
