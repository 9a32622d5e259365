//! # Descriptors
//!
//! A descriptor is the loosely-typed input of the factory: an ordered map
//! from field name to a raw value. Nothing in here knows about layouts. The
//! [`DescriptorProcessor`](crate::rules::DescriptorProcessor) resolves each
//! entry against the rule registry.
//!
//! Descriptors come from three places: the [`descriptor!`](crate::descriptor!)
//! macro in code, [`Descriptor::from_json`] at the ingestion boundary, and
//! hand-built maps. The processor only ever reads them; the factory clones one
//! into a working copy before injecting the network.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::crypto::{Hash256, PublicKey, Signature};
use crate::error::BuildError;
use crate::network::Address;
use crate::value::{StructValue, Value};

/// A raw descriptor value, untyped until a rule resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorValue {
    /// Any integer; range-checked against the target field.
    Int(i128),
    /// Enum names, flag lists, hex strings, UTF-8 messages, decimal or `0x`
    /// numbers.
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<DescriptorValue>),
    Map(Descriptor),
    Address(Address),
    /// An already-built value, accepted as is.
    Typed(Value),
}

macro_rules! int_conversions {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DescriptorValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i128::from(value))
                }
            }
        )*
    };
}

int_conversions!(u8, u16, u32, u64, i8, i16, i32, i64, i128);

impl From<bool> for DescriptorValue {
    fn from(value: bool) -> Self {
        Self::Int(i128::from(value))
    }
}

impl From<&str> for DescriptorValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DescriptorValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for DescriptorValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for DescriptorValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Hash256> for DescriptorValue {
    fn from(value: Hash256) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<PublicKey> for DescriptorValue {
    fn from(value: PublicKey) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Signature> for DescriptorValue {
    fn from(value: Signature) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Address> for DescriptorValue {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<Descriptor> for DescriptorValue {
    fn from(value: Descriptor) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<DescriptorValue>> for DescriptorValue {
    fn from(value: Vec<DescriptorValue>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<Descriptor>> for DescriptorValue {
    fn from(value: Vec<Descriptor>) -> Self {
        Self::List(value.into_iter().map(Self::Map).collect())
    }
}

impl From<Value> for DescriptorValue {
    fn from(value: Value) -> Self {
        Self::Typed(value)
    }
}

impl From<StructValue> for DescriptorValue {
    fn from(value: StructValue) -> Self {
        Self::Typed(Value::Struct(value))
    }
}

impl DescriptorValue {
    fn from_json(json: &serde_json::Value) -> Result<Self, BuildError> {
        use serde_json::Value as Json;

        Ok(match json {
            Json::Bool(flag) => Self::from(*flag),
            Json::Number(number) => match (number.as_u64(), number.as_i64()) {
                (Some(unsigned), _) => Self::Int(i128::from(unsigned)),
                (None, Some(signed)) => Self::Int(i128::from(signed)),
                _ => {
                    return Err(BuildError::invalid(
                        number.to_string(),
                        "fractional numbers are not supported",
                    ))
                }
            },
            Json::String(text) => Self::Text(text.clone()),
            Json::Array(items) => Self::List(
                items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            Json::Object(_) => Self::Map(Descriptor::from_json(json)?),
            Json::Null => return Err(BuildError::invalid("null", "null values are not supported")),
        })
    }

    fn to_json_safe(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Int(value) => int_to_json(*value),
            Self::Text(text) => Json::String(text.clone()),
            Self::Bytes(bytes) => Json::String(hex::encode_upper(bytes)),
            Self::List(items) => Json::Array(items.iter().map(Self::to_json_safe).collect()),
            Self::Map(descriptor) => descriptor.to_json_safe(),
            Self::Address(address) => Json::String(address.to_string()),
            Self::Typed(value) => value_to_json(value),
        }
    }
}

fn int_to_json(value: i128) -> serde_json::Value {
    if let Ok(unsigned) = u64::try_from(value) {
        serde_json::Value::from(unsigned)
    } else if let Ok(signed) = i64::try_from(value) {
        serde_json::Value::from(signed)
    } else {
        serde_json::Value::String(value.to_string())
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::Unsigned(raw) => Json::from(*raw),
        Value::Signed(raw) => Json::from(*raw),
        Value::Bytes(bytes) => Json::String(hex::encode_upper(bytes)),
        Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Struct(inner) => Json::Object(
            inner
                .fields()
                .filter(|(field, _)| !field.kind.is_computed() && inner.is_present(field))
                .map(|(field, item)| (field.name.to_string(), value_to_json(item)))
                .collect(),
        ),
    }
}

/// Ordered field-name to value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    entries: IndexMap<String, DescriptorValue>,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry, keeping the position of a replaced key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DescriptorValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DescriptorValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&DescriptorValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<DescriptorValue> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DescriptorValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads a descriptor from a JSON object. Numbers become integers,
    /// strings stay text (rules decide whether they are names, hex or
    /// messages), nested objects become nested descriptors.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, BuildError> {
        let object = json
            .as_object()
            .ok_or_else(|| BuildError::invalid("descriptor", "expected a JSON object"))?;

        let mut descriptor = Self::new();
        for (key, value) in object {
            descriptor.insert(key.clone(), DescriptorValue::from_json(value)?);
        }
        Ok(descriptor)
    }

    /// Projection onto plain JSON: bytes as uppercase hex, addresses as
    /// text, typed structs as objects of their settable fields.
    ///
    /// This is one-way for variable-length byte fields such as `message` or
    /// metadata `value`: [`Descriptor::from_json`] reads their text back as
    /// UTF-8, so the hex digits themselves become the bytes. Fixed-size
    /// fields (keys, hashes, addresses) rebuild unchanged.
    pub fn to_json_safe(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json_safe()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<DescriptorValue>> FromIterator<(K, V)> for Descriptor {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut descriptor = Self::new();
        for (key, value) in iter {
            descriptor.insert(key, value);
        }
        descriptor
    }
}

/// Builds a [`Descriptor`] from `key => value` pairs.
///
/// ```
/// use ledgerkit::descriptor;
///
/// let descriptor = descriptor! {
///     "type" => "mosaic_supply_change_transaction",
///     "delta" => 10u64,
///     "action" => "increase",
/// };
/// assert_eq!(descriptor.len(), 3);
/// ```
#[macro_export]
macro_rules! descriptor {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut descriptor = $crate::descriptor::Descriptor::new();
        $( descriptor.insert($key, $value); )*
        descriptor
    }};
}

/// One captured build: what went in and what came out.
///
/// `descriptor` is the [`Descriptor::to_json_safe`] projection. It records
/// the build; it is not guaranteed to rebuild the same payload when a
/// variable-length byte field was set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestVector {
    pub schema_name: String,
    pub test_name: String,
    /// Uppercase hex of the serialized entity.
    pub payload: String,
    pub descriptor: serde_json::Value,
}

impl TestVector {
    pub fn new(
        schema_name: impl Into<String>,
        test_name: impl Into<String>,
        payload: &[u8],
        descriptor: &Descriptor,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            test_name: test_name.into(),
            payload: hex::encode_upper(payload),
            descriptor: descriptor.to_json_safe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn macro_preserves_insertion_order() {
        let descriptor = descriptor! {
            "type" => "transfer_transaction",
            "fee" => 100u64,
            "message" => b"hi".to_vec(),
        };
        let keys: Vec<&str> = descriptor.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["type", "fee", "message"]);
    }

    #[test]
    fn from_json_maps_shapes() {
        let descriptor = Descriptor::from_json(&json!({
            "type": "transfer_transaction",
            "fee": 18_446_744_073_709_551_615u64,
            "delta": -3,
            "mosaics": [{"mosaic_id": 1, "amount": 2}],
        }))
        .unwrap();

        assert_eq!(
            descriptor.get("fee"),
            Some(&DescriptorValue::Int(i128::from(u64::MAX)))
        );
        assert_eq!(descriptor.get("delta"), Some(&DescriptorValue::Int(-3)));
        match descriptor.get("mosaics") {
            Some(DescriptorValue::List(items)) => {
                assert!(matches!(items[0], DescriptorValue::Map(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn from_json_rejects_non_objects_and_nulls() {
        assert!(Descriptor::from_json(&json!([1, 2])).is_err());
        assert!(Descriptor::from_json(&json!({"fee": null})).is_err());
        assert!(Descriptor::from_json(&json!({"fee": 1.5})).is_err());
    }

    #[test]
    fn json_safe_projection_renders_bytes_as_upper_hex() {
        let descriptor = descriptor! {
            "signer_public_key" => vec![0xAB, 0x01],
            "nested" => descriptor! { "hash" => vec![0xFF] },
            "big" => i128::from(u64::MAX) + 1,
        };
        assert_eq!(
            descriptor.to_json_safe(),
            json!({
                "signer_public_key": "AB01",
                "nested": {"hash": "FF"},
                "big": "18446744073709551616",
            })
        );
    }

    #[test]
    fn test_vector_serializes() {
        let vector = TestVector::new(
            "TransferTransactionV1",
            "empty",
            &[0x01, 0xAB],
            &descriptor! { "fee" => 1u8 },
        );
        let json = serde_json::to_value(&vector).unwrap();
        assert_eq!(json["payload"], "01AB");
        assert_eq!(json["descriptor"]["fee"], 1);
    }
}
