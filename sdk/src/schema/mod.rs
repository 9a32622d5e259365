//! # Type Catalogs
//!
//! Every wire layout the factory can build is described here as static data:
//! integers, fixed byte arrays, enums, structs and polymorphic families. The
//! rule registry derives its parsing rules from these tables, and the codec
//! walks them to serialize and decode.
//!
//! ```text
//! Catalog ─┬─ TypeDef::Int / Fixed / Enum / Flags      leaf types by name
//!          ├─ TypeDef::Struct ── StructDef ── [FieldDef] in wire order
//!          └─ TypeDef::Family ── Family ── Variant { tag, StructDef }
//! ```
//!
//! Fields reference types by name. A field is either a settable value or a
//! computed one (reserved constant, element count, byte size, entity size);
//! computed fields are never taken from descriptors.

pub mod nem;
pub mod symbol;

use std::fmt;

use crate::error::BuildError;
use crate::value::StructValue;

// ---------------------------------------------------------------------------
// Leaf types
// ---------------------------------------------------------------------------

/// Width and signedness of a little-endian integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntType {
    pub size: usize,
    pub signed: bool,
}

impl IntType {
    pub const U8: Self = Self::unsigned(1);
    pub const U16: Self = Self::unsigned(2);
    pub const U32: Self = Self::unsigned(4);
    pub const U64: Self = Self::unsigned(8);
    pub const I8: Self = Self::signed(1);
    pub const I16: Self = Self::signed(2);

    pub const fn unsigned(size: usize) -> Self {
        Self {
            size,
            signed: false,
        }
    }

    pub const fn signed(size: usize) -> Self {
        Self { size, signed: true }
    }

    /// Largest unsigned value the type can hold.
    pub fn max_unsigned(&self) -> u64 {
        if self.size >= 8 {
            u64::MAX
        } else {
            (1u64 << (self.size * 8)) - 1
        }
    }

    /// Inclusive signed range of the type.
    pub fn signed_range(&self) -> (i64, i64) {
        let bits = (self.size * 8).min(64) as u32;
        if bits >= 64 {
            (i64::MIN, i64::MAX)
        } else {
            (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)
        }
    }
}

/// Named values of an enum or flag set.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDef {
    pub name: &'static str,
    pub int: IntType,
    pub values: &'static [(&'static str, u64)],
}

impl EnumDef {
    pub fn value_of(&self, name: &str) -> Option<u64> {
        self.values
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| *value)
    }

    pub fn name_of(&self, value: u64) -> Option<&'static str> {
        self.values
            .iter()
            .find(|(_, candidate)| *candidate == value)
            .map(|(name, _)| *name)
    }

    /// First declared value; the default of a fresh field.
    pub fn first_value(&self) -> u64 {
        self.values.first().map_or(0, |(_, value)| *value)
    }

    /// Parses space-separated flag names (`"supply_mutable transferable"`).
    /// `"none"` and the empty string are zero.
    pub fn parse_flags(&self, text: &str) -> Option<u64> {
        text.split_whitespace()
            .filter(|name| *name != "none")
            .try_fold(0u64, |acc, name| self.value_of(name).map(|bit| acc | bit))
    }

    /// Union of every declared flag.
    pub fn all_flags(&self) -> u64 {
        self.values.iter().fold(0, |acc, (_, bit)| acc | bit)
    }

    /// Space-separated names of the flags set in `value`.
    pub fn format_flags(&self, value: u64) -> String {
        let names: Vec<&str> = self
            .values
            .iter()
            .filter(|(_, bit)| *bit != 0 && value & bit == *bit)
            .map(|(name, _)| *name)
            .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(" ")
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// How many elements (or bytes) a variable-length field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Element count stored in the named field.
    Count(&'static str),
    /// Total byte size stored in the named field.
    Bytes(&'static str),
    /// Everything up to the end of the enclosing entity.
    Fill,
}

/// Canonical ordering of array elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Order struct elements by one of their fields.
    Field(&'static str),
    /// Order scalar elements by value.
    Value,
}

/// Shape of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Named(&'static str),
    Array {
        element: &'static str,
        length: Length,
        alignment: usize,
        pad_last: bool,
        sort: Option<SortKey>,
    },
    Bytes(Length),
}

impl FieldType {
    /// Name the rule registry files this field type under.
    pub fn rule_name(&self) -> String {
        match self {
            Self::Named(name) => (*name).to_string(),
            Self::Array { element, .. } => array_rule_name(element),
            Self::Bytes(_) => BYTES_RULE_NAME.to_string(),
        }
    }
}

/// Registry name of variable-length byte buffers.
pub const BYTES_RULE_NAME: &str = "bytes";

pub fn array_rule_name(element: &str) -> String {
    format!("array[{element}]")
}

/// Where a field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Settable from a descriptor.
    Value,
    /// Constant filler.
    Reserved(u64),
    /// Element count of the named array (or byte count of a byte buffer).
    CountOf(&'static str),
    /// Serialized byte size of the named field.
    SizeOf(&'static str),
    /// Serialized size of the enclosing entity.
    EntitySize,
}

impl FieldKind {
    pub fn is_computed(&self) -> bool {
        !matches!(self, Self::Value)
    }
}

/// Field present only when an enum field holds a given value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub field: &'static str,
    pub equals: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
    pub kind: FieldKind,
    pub condition: Option<Condition>,
}

impl FieldDef {
    pub const fn when(self, field: &'static str, equals: u64) -> Self {
        Self {
            condition: Some(Condition { field, equals }),
            ..self
        }
    }
}

pub const fn field(name: &'static str, type_name: &'static str) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Named(type_name),
        kind: FieldKind::Value,
        condition: None,
    }
}

pub const fn reserved(name: &'static str, type_name: &'static str, value: u64) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Named(type_name),
        kind: FieldKind::Reserved(value),
        condition: None,
    }
}

pub const fn count_of(
    name: &'static str,
    type_name: &'static str,
    target: &'static str,
) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Named(type_name),
        kind: FieldKind::CountOf(target),
        condition: None,
    }
}

pub const fn size_of(
    name: &'static str,
    type_name: &'static str,
    target: &'static str,
) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Named(type_name),
        kind: FieldKind::SizeOf(target),
        condition: None,
    }
}

pub const fn entity_size(name: &'static str, type_name: &'static str) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Named(type_name),
        kind: FieldKind::EntitySize,
        condition: None,
    }
}

pub const fn bytes(name: &'static str, length: Length) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Bytes(length),
        kind: FieldKind::Value,
        condition: None,
    }
}

pub const fn array(name: &'static str, element: &'static str, length: Length) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Array {
            element,
            length,
            alignment: 0,
            pad_last: false,
            sort: None,
        },
        kind: FieldKind::Value,
        condition: None,
    }
}

pub const fn sorted_array(
    name: &'static str,
    element: &'static str,
    length: Length,
    key: SortKey,
) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Array {
            element,
            length,
            alignment: 0,
            pad_last: false,
            sort: Some(key),
        },
        kind: FieldKind::Value,
        condition: None,
    }
}

pub const fn aligned_array(
    name: &'static str,
    element: &'static str,
    length: Length,
    alignment: usize,
    pad_last: bool,
) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Array {
            element,
            length,
            alignment,
            pad_last,
            sort: None,
        },
        kind: FieldKind::Value,
        condition: None,
    }
}

// ---------------------------------------------------------------------------
// Structs & families
// ---------------------------------------------------------------------------

pub type Validator = fn(&StructValue) -> Result<(), BuildError>;

/// A struct layout. Fields are grouped in parts (header, body, footer) that
/// are concatenated in order.
pub struct StructDef {
    pub name: &'static str,
    pub parts: &'static [&'static [FieldDef]],
    /// Initial values for settable fields, typically `version` and `type`.
    pub defaults: &'static [(&'static str, u64)],
    /// Run after a descriptor has been applied.
    pub validator: Option<Validator>,
}

impl StructDef {
    pub fn fields(&'static self) -> impl Iterator<Item = &'static FieldDef> {
        self.parts.iter().flat_map(|part| part.iter())
    }

    pub fn field_count(&self) -> usize {
        self.parts.iter().map(|part| part.len()).sum()
    }

    /// Position and definition of the field called `name`.
    pub fn field(&'static self, name: &str) -> Option<(usize, &'static FieldDef)> {
        self.fields()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }

    pub fn default_for(&self, name: &str) -> Option<u64> {
        self.defaults
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| *value)
    }
}

impl PartialEq for StructDef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for StructDef {}

impl fmt::Debug for StructDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructDef({})", self.name)
    }
}

/// One concrete member of a polymorphic family.
#[derive(Debug)]
pub struct Variant {
    /// Discriminator text accepted in descriptors, e.g. `transfer_transaction`.
    pub name: &'static str,
    pub tag: u64,
    pub def: &'static StructDef,
}

/// A polymorphic root: concrete variants selected by a discriminator field
/// whose wire value sits at a fixed offset.
pub struct Family {
    pub name: &'static str,
    pub discriminator: &'static str,
    pub tag_offset: usize,
    pub tag: IntType,
    pub variants: &'static [Variant],
}

impl Family {
    pub fn by_name(&self, name: &str) -> Option<&'static Variant> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    pub fn by_tag(&self, tag: u64) -> Option<&'static Variant> {
        self.variants.iter().find(|variant| variant.tag == tag)
    }

    pub fn by_def(&self, def: &StructDef) -> Option<&'static Variant> {
        self.variants.iter().find(|variant| std::ptr::eq(variant.def, def))
    }

    pub fn contains(&self, def: &StructDef) -> bool {
        self.by_def(def).is_some()
    }
}

impl PartialEq for Family {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Family {}

impl fmt::Debug for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Family({})", self.name)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum TypeDef {
    Int { name: &'static str, int: IntType },
    Fixed { name: &'static str, size: usize },
    Enum(&'static EnumDef),
    Flags(&'static EnumDef),
    Struct(&'static StructDef),
    Family(&'static Family),
}

impl TypeDef {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int { name, .. } | Self::Fixed { name, .. } => name,
            Self::Enum(def) | Self::Flags(def) => def.name,
            Self::Struct(def) => def.name,
            Self::Family(family) => family.name,
        }
    }

    /// Integer layout of scalar types.
    pub fn int(&self) -> Option<IntType> {
        match self {
            Self::Int { int, .. } => Some(*int),
            Self::Enum(def) | Self::Flags(def) => Some(def.int),
            _ => None,
        }
    }
}

/// All types of one network family plus its polymorphic roots.
#[derive(Debug)]
pub struct Catalog {
    pub name: &'static str,
    pub types: &'static [TypeDef],
    pub transactions: &'static Family,
    pub embedded: &'static Family,
    pub blocks: Option<&'static Family>,
}

impl Catalog {
    pub fn find(&self, name: &str) -> Option<&'static TypeDef> {
        self.types.iter().find(|ty| ty.name() == name)
    }

    /// Like [`find`](Self::find) for names the catalog itself references.
    /// Catalog closure is checked by the registry at build time and by the
    /// catalog tests, so a miss here is a bug in the static tables.
    pub(crate) fn resolve(&self, name: &str) -> &'static TypeDef {
        self.find(name)
            .unwrap_or_else(|| panic!("catalog {} does not define `{name}`", self.name))
    }

    /// Every struct layout reachable from the catalog, family variants
    /// included.
    pub fn struct_defs(&self) -> Vec<&'static StructDef> {
        let mut defs: Vec<&'static StructDef> = Vec::new();
        let mut push = |def: &'static StructDef| {
            if !defs.iter().any(|known| std::ptr::eq(*known, def)) {
                defs.push(def);
            }
        };
        for ty in self.types {
            match ty {
                TypeDef::Struct(def) => push(def),
                TypeDef::Family(family) => family.variants.iter().for_each(|v| push(v.def)),
                _ => {}
            }
        }
        defs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FLAGS: EnumDef = EnumDef {
        name: "TestFlags",
        int: IntType::U8,
        values: &[("none", 0), ("a", 1), ("b", 2), ("c", 4)],
    };

    #[test]
    fn int_ranges() {
        assert_eq!(IntType::U8.max_unsigned(), 255);
        assert_eq!(IntType::U64.max_unsigned(), u64::MAX);
        assert_eq!(IntType::I8.signed_range(), (-128, 127));
        assert_eq!(IntType::I16.signed_range(), (-32768, 32767));
    }

    #[test]
    fn flags_parse_and_format() {
        assert_eq!(FLAGS.parse_flags("a c"), Some(5));
        assert_eq!(FLAGS.parse_flags("none"), Some(0));
        assert_eq!(FLAGS.parse_flags(""), Some(0));
        assert_eq!(FLAGS.parse_flags("a z"), None);
        assert_eq!(FLAGS.format_flags(6), "b c");
        assert_eq!(FLAGS.format_flags(0), "none");
        assert_eq!(FLAGS.all_flags(), 7);
    }

    #[test]
    fn rule_names() {
        assert_eq!(field("fee", "Amount").ty.rule_name(), "Amount");
        assert_eq!(
            array("mosaics", "UnresolvedMosaic", Length::Fill).ty.rule_name(),
            "array[UnresolvedMosaic]"
        );
        assert_eq!(bytes("message", Length::Fill).ty.rule_name(), "bytes");
    }

    #[test]
    fn conditions_attach_to_fields() {
        let def = field("duration", "BlockDuration").when("registration_type", 0);
        assert_eq!(
            def.condition,
            Some(Condition {
                field: "registration_type",
                equals: 0
            })
        );
    }
}
