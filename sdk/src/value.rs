//! # Typed Values
//!
//! A [`StructValue`] is one instance of a catalog [`StructDef`]: a slot per
//! field, in wire order. Settable fields hold whatever the descriptor
//! processor put there. Computed fields (reserved words, counts, sizes) hold
//! a placeholder and are derived by the codec on every serialization, so they
//! can never drift from the data they describe.

use std::cmp::Ordering;

use crate::codec::{self, DecodeError};
use crate::error::BuildError;
use crate::schema::{Catalog, FieldDef, FieldKind, FieldType, SortKey, StructDef, TypeDef};

/// A single field value.
///
/// Enums and flag sets are stored as their numeric wire value; fixed byte
/// arrays and byte buffers both as `Bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Bytes(Vec<u8>),
    Struct(StructValue),
    Array(Vec<Value>),
}

impl Value {
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Self::Unsigned(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_signed(&self) -> Option<i64> {
        match self {
            Self::Signed(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Unsigned(_) => "unsigned",
            Self::Signed(_) => "signed",
            Self::Bytes(_) => "bytes",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
        }
    }

    /// Fresh value for a field of type `ty`.
    pub(crate) fn default_for(catalog: &'static Catalog, ty: &FieldType) -> Self {
        match ty {
            FieldType::Array { .. } => Self::Array(Vec::new()),
            FieldType::Bytes(_) => Self::Bytes(Vec::new()),
            FieldType::Named(name) => match catalog.resolve(name) {
                TypeDef::Int { int, .. } if int.signed => Self::Signed(0),
                TypeDef::Int { .. } => Self::Unsigned(0),
                TypeDef::Fixed { size, .. } => Self::Bytes(vec![0u8; *size]),
                TypeDef::Enum(def) => Self::Unsigned(def.first_value()),
                TypeDef::Flags(_) => Self::Unsigned(0),
                TypeDef::Struct(def) => Self::Struct(StructValue::new(catalog, def)),
                TypeDef::Family(family) => match family.variants.first() {
                    Some(variant) => Self::Struct(StructValue::new(catalog, variant.def)),
                    None => Self::Array(Vec::new()),
                },
            },
        }
    }
}

/// Canonical order of two scalar values. Mixed kinds compare equal.
fn compare_scalars(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Unsigned(a), Value::Unsigned(b)) => a.cmp(b),
        (Value::Signed(a), Value::Signed(b)) => a.cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn compare_by_key(key: SortKey, left: &Value, right: &Value) -> Ordering {
    match key {
        SortKey::Value => compare_scalars(left, right),
        SortKey::Field(name) => {
            let pick = |value: &Value| value.as_struct().and_then(|s| s.get(name).cloned());
            match (pick(left), pick(right)) {
                (Some(a), Some(b)) => compare_scalars(&a, &b),
                _ => Ordering::Equal,
            }
        }
    }
}

/// An instance of a catalog struct.
#[derive(Debug, Clone)]
pub struct StructValue {
    catalog: &'static Catalog,
    def: &'static StructDef,
    values: Vec<Value>,
}

impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.def, other.def) && self.values == other.values
    }
}

impl Eq for StructValue {}

impl StructValue {
    /// Every field at its default; `defaults` of the def applied; computed
    /// fields zeroed.
    pub fn new(catalog: &'static Catalog, def: &'static StructDef) -> Self {
        let values = def
            .fields()
            .map(|field| match field.kind {
                FieldKind::Value => match def.default_for(field.name) {
                    Some(value) => Value::Unsigned(value),
                    None => Value::default_for(catalog, &field.ty),
                },
                FieldKind::Reserved(value) => Value::Unsigned(value),
                _ => Value::Unsigned(0),
            })
            .collect();

        Self {
            catalog,
            def,
            values,
        }
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn def(&self) -> &'static StructDef {
        self.def
    }

    pub fn type_name(&self) -> &'static str {
        self.def.name
    }

    /// Fields paired with their current values, in wire order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldDef, &Value)> {
        self.def.fields().zip(self.values.iter())
    }

    pub(crate) fn value_at(&self, index: usize) -> &Value {
        &self.values[index]
    }

    pub(crate) fn set_at(&mut self, index: usize, value: Value) {
        self.values[index] = value;
    }

    /// Current value of a field. Computed fields read as their placeholder.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.def
            .field(name)
            .map(|(index, _)| &self.values[index])
    }

    pub fn get_unsigned(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_unsigned)
    }

    pub fn get_signed(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_signed)
    }

    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        self.get(name).and_then(Value::as_bytes)
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructValue> {
        self.get(name).and_then(Value::as_struct)
    }

    pub fn get_array(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_array)
    }

    /// Replaces a settable field. The value must have the same shape as the
    /// field's current one.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), BuildError> {
        let (index, field) = self
            .def
            .field(name)
            .ok_or_else(|| BuildError::unresolved(self.def.name, name))?;
        if field.kind.is_computed() {
            return Err(BuildError::unresolved(self.def.name, name));
        }

        let current = &self.values[index];
        if current.kind() != value.kind() {
            return Err(BuildError::invalid(
                name,
                format!("expected {} value, got {}", current.kind(), value.kind()),
            ));
        }
        if let (Value::Bytes(old), Value::Bytes(new), FieldType::Named(_)) =
            (current, &value, field.ty)
        {
            if old.len() != new.len() {
                return Err(BuildError::invalid(
                    name,
                    format!("expected {} bytes, got {}", old.len(), new.len()),
                ));
            }
        }

        self.values[index] = value;
        Ok(())
    }

    /// True when the field's condition (if any) holds.
    pub fn is_present(&self, field: &FieldDef) -> bool {
        match field.condition {
            None => true,
            Some(condition) => self.get_unsigned(condition.field) == Some(condition.equals),
        }
    }

    /// Serialized size in bytes.
    pub fn size(&self) -> usize {
        codec::struct_size(self)
    }

    pub fn serialize(&self) -> Vec<u8> {
        codec::serialize(self)
    }

    /// Decodes exactly `bytes` as an instance of `def`.
    pub fn deserialize(
        catalog: &'static Catalog,
        def: &'static StructDef,
        bytes: &[u8],
    ) -> Result<Self, DecodeError> {
        codec::deserialize(catalog, def, bytes)
    }

    /// Puts every sortable array, at any depth, in canonical order.
    pub fn sort(&mut self) {
        for (field, value) in self.def.fields().zip(self.values.iter_mut()) {
            match value {
                Value::Struct(inner) => inner.sort(),
                Value::Array(items) => {
                    for item in items.iter_mut() {
                        if let Value::Struct(inner) = item {
                            inner.sort();
                        }
                    }
                    if let FieldType::Array {
                        sort: Some(key), ..
                    } = field.ty
                    {
                        items.sort_by(|a, b| compare_by_key(key, a, b));
                    }
                }
                _ => {}
            }
        }
    }

    /// Copies every settable field that `def` shares by name into a fresh
    /// instance of `def`.
    pub fn project(&self, def: &'static StructDef) -> Self {
        let mut projected = Self::new(self.catalog, def);
        for (index, field) in def.fields().enumerate() {
            if field.kind.is_computed() {
                continue;
            }
            if let Some(value) = self.get(field.name) {
                projected.values[index] = value.clone();
            }
        }
        projected
    }
}
