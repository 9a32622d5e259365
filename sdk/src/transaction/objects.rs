//! Typed wrappers around catalog structs.
//!
//! The factory hands out [`Transaction`], [`EmbeddedTransaction`] and
//! [`Block`] rather than bare [`StructValue`]s so the signing and aggregate
//! APIs cannot be fed the wrong kind of entity.

use crate::crypto::{ByteArrayError, Hash256, PublicKey, Signature};
use crate::descriptor::DescriptorValue;
use crate::error::BuildError;
use crate::schema::symbol;
use crate::value::{StructValue, Value};

/// Common surface of everything the factory builds.
pub trait Entity {
    fn value(&self) -> &StructValue;

    fn value_mut(&mut self) -> &mut StructValue;

    fn type_name(&self) -> &'static str {
        self.value().type_name()
    }

    fn size(&self) -> usize {
        self.value().size()
    }

    fn serialize(&self) -> Vec<u8> {
        self.value().serialize()
    }

    /// Canonically orders every sortable array.
    fn sort(&mut self) {
        self.value_mut().sort();
    }

    /// Replaces one settable field.
    fn set(&mut self, field: &str, value: Value) -> Result<(), BuildError> {
        self.value_mut().set(field, value)
    }
}

macro_rules! entity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(StructValue);

        impl $name {
            pub(crate) fn new(value: StructValue) -> Self {
                Self(value)
            }

            pub fn into_inner(self) -> StructValue {
                self.0
            }
        }

        impl Entity for $name {
            fn value(&self) -> &StructValue {
                &self.0
            }

            fn value_mut(&mut self) -> &mut StructValue {
                &mut self.0
            }
        }

        impl From<$name> for DescriptorValue {
            fn from(entity: $name) -> Self {
                DescriptorValue::Typed(Value::Struct(entity.0))
            }
        }
    };
}

entity!(
    /// A standalone, signable transaction.
    Transaction
);

entity!(
    /// A transaction nested inside an aggregate (or, on NEM, inside a
    /// multisig wrapper). Carries no fee, deadline or signature of its own.
    EmbeddedTransaction
);

entity!(
    /// A block header with its transactions.
    Block
);

fn fixed_field<T>(
    value: &StructValue,
    field: &str,
    parse: fn(&[u8]) -> Result<T, ByteArrayError>,
) -> Result<T, BuildError> {
    let bytes = value
        .get_bytes(field)
        .ok_or_else(|| BuildError::unresolved(value.type_name(), field))?;
    parse(bytes).map_err(|e| BuildError::invalid(field, e.to_string()))
}

fn unsigned_field(value: &StructValue, field: &str) -> Result<u64, BuildError> {
    value
        .get_unsigned(field)
        .ok_or_else(|| BuildError::unresolved(value.type_name(), field))
}

impl Transaction {
    pub fn signer_public_key(&self) -> Result<PublicKey, BuildError> {
        fixed_field(&self.0, "signer_public_key", PublicKey::try_from_slice)
    }

    pub fn signature(&self) -> Result<Signature, BuildError> {
        fixed_field(&self.0, "signature", Signature::try_from_slice)
    }

    pub fn set_signature(&mut self, signature: &Signature) -> Result<(), BuildError> {
        self.0.set("signature", Value::Bytes(signature.to_vec()))
    }

    pub fn fee(&self) -> Result<u64, BuildError> {
        unsigned_field(&self.0, "fee")
    }

    pub fn set_fee(&mut self, fee: u64) -> Result<(), BuildError> {
        self.0.set("fee", Value::Unsigned(fee))
    }

    pub fn deadline(&self) -> Result<u64, BuildError> {
        unsigned_field(&self.0, "deadline")
    }

    /// True for Symbol aggregate complete and bonded transactions.
    pub fn is_aggregate(&self) -> bool {
        let def = self.0.def();
        def == &symbol::AGGREGATE_COMPLETE || def == &symbol::AGGREGATE_BONDED
    }

    /// Embedded transactions of an aggregate, in wire order.
    pub fn embedded_transactions(&self) -> Vec<EmbeddedTransaction> {
        self.0
            .get_array("transactions")
            .unwrap_or(&[])
            .iter()
            .filter_map(Value::as_struct)
            .cloned()
            .map(EmbeddedTransaction::new)
            .collect()
    }

    /// Cosignatures of an aggregate, in append order.
    pub fn cosignatures(&self) -> Result<Vec<Cosignature>, BuildError> {
        self.0
            .get_array("cosignatures")
            .unwrap_or(&[])
            .iter()
            .filter_map(Value::as_struct)
            .map(Cosignature::from_value)
            .collect()
    }
}

impl EmbeddedTransaction {
    pub fn signer_public_key(&self) -> Result<PublicKey, BuildError> {
        fixed_field(&self.0, "signer_public_key", PublicKey::try_from_slice)
    }
}

impl Block {
    pub fn signer_public_key(&self) -> Result<PublicKey, BuildError> {
        fixed_field(&self.0, "signer_public_key", PublicKey::try_from_slice)
    }

    pub fn height(&self) -> Result<u64, BuildError> {
        unsigned_field(&self.0, "height")
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.0
            .get_array("transactions")
            .unwrap_or(&[])
            .iter()
            .filter_map(Value::as_struct)
            .cloned()
            .map(Transaction::new)
            .collect()
    }
}

/// A Symbol cosignature: a signer and its signature over an aggregate's
/// transaction hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cosignature {
    pub version: u64,
    pub signer_public_key: PublicKey,
    pub signature: Signature,
}

impl Cosignature {
    pub fn to_value(&self) -> StructValue {
        let mut value = StructValue::new(&symbol::CATALOG, &symbol::COSIGNATURE);
        value.set_at(0, Value::Unsigned(self.version));
        value.set_at(1, Value::Bytes(self.signer_public_key.to_vec()));
        value.set_at(2, Value::Bytes(self.signature.to_vec()));
        value
    }

    pub fn from_value(value: &StructValue) -> Result<Self, BuildError> {
        Ok(Self {
            version: unsigned_field(value, "version")?,
            signer_public_key: fixed_field(value, "signer_public_key", PublicKey::try_from_slice)?,
            signature: fixed_field(value, "signature", Signature::try_from_slice)?,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.to_value().serialize()
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, BuildError> {
        let value = StructValue::deserialize(&symbol::CATALOG, &symbol::COSIGNATURE, bytes)?;
        Self::from_value(&value)
    }
}

impl From<Cosignature> for DescriptorValue {
    fn from(cosignature: Cosignature) -> Self {
        DescriptorValue::Typed(Value::Struct(cosignature.to_value()))
    }
}

/// A cosignature shipped apart from its aggregate, tagged with the hash of
/// the aggregate it signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedCosignature {
    pub version: u64,
    pub signer_public_key: PublicKey,
    pub signature: Signature,
    pub parent_hash: Hash256,
}

impl DetachedCosignature {
    pub fn to_value(&self) -> StructValue {
        let mut value = StructValue::new(&symbol::CATALOG, &symbol::DETACHED_COSIGNATURE);
        value.set_at(0, Value::Unsigned(self.version));
        value.set_at(1, Value::Bytes(self.signer_public_key.to_vec()));
        value.set_at(2, Value::Bytes(self.signature.to_vec()));
        value.set_at(3, Value::Bytes(self.parent_hash.to_vec()));
        value
    }

    pub fn from_value(value: &StructValue) -> Result<Self, BuildError> {
        Ok(Self {
            version: unsigned_field(value, "version")?,
            signer_public_key: fixed_field(value, "signer_public_key", PublicKey::try_from_slice)?,
            signature: fixed_field(value, "signature", Signature::try_from_slice)?,
            parent_hash: fixed_field(value, "parent_hash", Hash256::try_from_slice)?,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.to_value().serialize()
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, BuildError> {
        let value =
            StructValue::deserialize(&symbol::CATALOG, &symbol::DETACHED_COSIGNATURE, bytes)?;
        Self::from_value(&value)
    }

    /// The attached form, without the parent hash.
    pub fn cosignature(&self) -> Cosignature {
        Cosignature {
            version: self.version,
            signer_public_key: self.signer_public_key,
            signature: self.signature,
        }
    }
}
