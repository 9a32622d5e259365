//! Type-name to parsing-rule table.
//!
//! Rules are collected in three tiers. Autodetection derives one rule per
//! field type from the catalog; explicit parsers registered by the network
//! setup replace autodetected ones; caller overrides replace both. Within a
//! tier a second, different rule for the same name is a
//! [`BuildError::RegistryConflict`].

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::descriptor::DescriptorValue;
use crate::error::BuildError;
use crate::network::NetworkFamily;
use crate::schema::{
    array_rule_name, Catalog, EnumDef, Family, FieldType, IntType, StructDef, TypeDef,
    BYTES_RULE_NAME,
};
use crate::value::Value;

/// How a raw descriptor value becomes a typed [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Int(IntType),
    /// Fixed-size bytes from raw bytes or hex text.
    Pod { size: usize },
    /// Variable-length bytes; text is taken as UTF-8.
    Bytes,
    Enum(&'static EnumDef),
    Flags(&'static EnumDef),
    Struct(&'static StructDef),
    /// Sequence of the named element rule.
    Array(&'static str),
    /// Concrete variant picked by the family discriminator.
    Polymorphic(&'static Family),
    /// Network address, as an [`Address`](crate::network::Address), its text
    /// form or its wire bytes.
    Address(NetworkFamily),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => {
                let sign = if int.signed { "int" } else { "uint" };
                write!(f, "{sign}{}", int.size * 8)
            }
            Self::Pod { size } => write!(f, "pod[{size}]"),
            Self::Bytes => f.write_str("bytes"),
            Self::Enum(def) => write!(f, "enum {}", def.name),
            Self::Flags(def) => write!(f, "flags {}", def.name),
            Self::Struct(def) => write!(f, "struct {}", def.name),
            Self::Array(element) => write!(f, "array of {element}"),
            Self::Polymorphic(family) => write!(f, "polymorphic {}", family.name),
            Self::Address(family) => write!(f, "{family} address"),
        }
    }
}

/// Hook consulted before fixed-size rules; `None` falls through.
pub type TypeConverter = Box<dyn Fn(&DescriptorValue) -> Option<Value> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Autodetected,
    Explicit,
    Override,
}

/// Accumulates rules; [`build`](Self::build) checks that every settable
/// field of the catalog is covered.
pub struct RegistryBuilder {
    catalog: &'static Catalog,
    converter: Option<TypeConverter>,
    overrides: Vec<(String, Rule)>,
    rules: IndexMap<String, (Tier, Rule)>,
}

impl RegistryBuilder {
    pub fn new(catalog: &'static Catalog) -> Self {
        Self {
            catalog,
            converter: None,
            overrides: Vec::new(),
            rules: IndexMap::new(),
        }
    }

    pub fn with_converter(mut self, converter: TypeConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Rules that win over everything else; applied by [`build`](Self::build).
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (String, Rule)>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    fn register(&mut self, name: String, tier: Tier, rule: Rule) -> Result<(), BuildError> {
        match self.rules.get(&name) {
            Some((existing_tier, existing)) if *existing_tier == tier && *existing != rule => {
                Err(BuildError::RegistryConflict {
                    type_name: name,
                    existing: existing.to_string(),
                    incoming: rule.to_string(),
                })
            }
            Some((existing_tier, _)) if *existing_tier > tier => Ok(()),
            _ => {
                self.rules.insert(name, (tier, rule));
                Ok(())
            }
        }
    }

    fn rule_for_type(&self, name: &str) -> Result<Rule, BuildError> {
        let ty = self
            .catalog
            .find(name)
            .ok_or_else(|| BuildError::UnknownType(name.to_string()))?;
        Ok(match ty {
            TypeDef::Int { int, .. } => Rule::Int(*int),
            TypeDef::Fixed { size, .. } => Rule::Pod { size: *size },
            TypeDef::Enum(def) => Rule::Enum(def),
            TypeDef::Flags(def) => Rule::Flags(def),
            TypeDef::Struct(def) => Rule::Struct(def),
            TypeDef::Family(family) => Rule::Polymorphic(family),
        })
    }

    /// Derives a rule for every settable field of every struct in the
    /// catalog, array elements included.
    pub fn autodetect(&mut self) -> Result<&mut Self, BuildError> {
        for def in self.catalog.struct_defs() {
            for field in def.fields().filter(|field| !field.kind.is_computed()) {
                match field.ty {
                    FieldType::Named(name) => {
                        let rule = self.rule_for_type(name)?;
                        self.register(name.to_string(), Tier::Autodetected, rule)?;
                    }
                    FieldType::Array { element, .. } => {
                        let rule = self.rule_for_type(element)?;
                        self.register(element.to_string(), Tier::Autodetected, rule)?;
                        self.register(
                            array_rule_name(element),
                            Tier::Autodetected,
                            Rule::Array(element),
                        )?;
                    }
                    FieldType::Bytes(_) => {
                        self.register(BYTES_RULE_NAME.to_string(), Tier::Autodetected, Rule::Bytes)?;
                    }
                }
            }
        }
        Ok(self)
    }

    /// Fixed-size byte parser for `name`.
    pub fn add_pod_parser(&mut self, name: &str, size: usize) -> Result<&mut Self, BuildError> {
        self.register(name.to_string(), Tier::Explicit, Rule::Pod { size })?;
        Ok(self)
    }

    pub fn add_struct_parser(&mut self, def: &'static StructDef) -> Result<&mut Self, BuildError> {
        self.register(def.name.to_string(), Tier::Explicit, Rule::Struct(def))?;
        Ok(self)
    }

    /// Sequence parser over an element type that must itself have a rule.
    pub fn add_array_parser(&mut self, element: &'static str) -> Result<&mut Self, BuildError> {
        self.register(array_rule_name(element), Tier::Explicit, Rule::Array(element))?;
        Ok(self)
    }

    pub fn add_address_parser(
        &mut self,
        name: &str,
        family: NetworkFamily,
    ) -> Result<&mut Self, BuildError> {
        self.register(name.to_string(), Tier::Explicit, Rule::Address(family))?;
        Ok(self)
    }

    /// Applies overrides and checks closure: every settable field type and
    /// every array element has exactly one rule.
    pub fn build(mut self) -> Result<RuleRegistry, BuildError> {
        for (name, rule) in std::mem::take(&mut self.overrides) {
            self.register(name, Tier::Override, rule)?;
        }

        for def in self.catalog.struct_defs() {
            for field in def.fields().filter(|field| !field.kind.is_computed()) {
                let name = field.ty.rule_name();
                if !self.rules.contains_key(&name) {
                    return Err(BuildError::unresolved(def.name, field.name));
                }
            }
        }
        for (_, rule) in self.rules.values() {
            if let Rule::Array(element) = rule {
                if !self.rules.contains_key(*element) {
                    return Err(BuildError::UnknownType((*element).to_string()));
                }
            }
        }

        let rules: IndexMap<String, Rule> = self
            .rules
            .into_iter()
            .map(|(name, (_, rule))| (name, rule))
            .collect();
        debug!(catalog = self.catalog.name, rules = rules.len(), "rule registry built");

        Ok(RuleRegistry {
            catalog: self.catalog,
            converter: self.converter,
            rules,
        })
    }
}

/// Immutable, validated rule table. Shared by reference across builds.
pub struct RuleRegistry {
    catalog: &'static Catalog,
    converter: Option<TypeConverter>,
    rules: IndexMap<String, Rule>,
}

impl RuleRegistry {
    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn rule(&self, name: &str) -> Option<Rule> {
        self.rules.get(name).copied()
    }

    /// Runs the custom converter, if any.
    pub fn convert(&self, raw: &DescriptorValue) -> Option<Value> {
        self.converter.as_ref().and_then(|convert| convert(raw))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("catalog", &self.catalog.name)
            .field("rules", &self.rules.len())
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

fn symbol_converter(raw: &DescriptorValue) -> Option<Value> {
    match raw {
        DescriptorValue::Address(address) if address.family() == NetworkFamily::Symbol => {
            Some(Value::Bytes(address.wire_bytes()))
        }
        _ => None,
    }
}

fn nem_converter(raw: &DescriptorValue) -> Option<Value> {
    match raw {
        DescriptorValue::Address(address) if address.family() == NetworkFamily::Nem => {
            Some(Value::Bytes(address.wire_bytes()))
        }
        _ => None,
    }
}

/// Registry over the Symbol catalog: autodetected rules plus addresses,
/// key and hash types, the VRF proof and the address and block type arrays.
pub fn symbol_registry(overrides: Vec<(String, Rule)>) -> Result<RuleRegistry, BuildError> {
    let mut builder = RegistryBuilder::new(&crate::schema::symbol::CATALOG)
        .with_converter(Box::new(symbol_converter))
        .with_overrides(overrides);

    builder
        .autodetect()?
        .add_struct_parser(&crate::schema::symbol::VRF_PROOF)?
        .add_address_parser("UnresolvedAddress", NetworkFamily::Symbol)?
        .add_address_parser("Address", NetworkFamily::Symbol)?
        .add_pod_parser("Hash256", 32)?
        .add_pod_parser("PublicKey", 32)?
        .add_pod_parser("ProofGamma", 32)?
        .add_pod_parser("ProofVerificationHash", 16)?
        .add_pod_parser("ProofScalar", 32)?
        .add_array_parser("BlockType")?
        .add_array_parser("UnresolvedAddress")?;

    builder.build()
}

/// Registry over the NEM catalog: autodetected rules plus text addresses.
pub fn nem_registry(overrides: Vec<(String, Rule)>) -> Result<RuleRegistry, BuildError> {
    let mut builder = RegistryBuilder::new(&crate::schema::nem::CATALOG)
        .with_converter(Box::new(nem_converter))
        .with_overrides(overrides);

    builder
        .autodetect()?
        .add_address_parser("Address", NetworkFamily::Nem)?
        .add_pod_parser("Hash256", 32)?
        .add_pod_parser("PublicKey", 32)?;

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::symbol;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn registry_is_shareable() {
        assert_send_sync::<RuleRegistry>();
    }

    #[test]
    fn symbol_registry_covers_catalog() {
        let registry = symbol_registry(Vec::new()).unwrap();
        assert_eq!(registry.rule("Amount"), Some(Rule::Int(IntType::U64)));
        assert_eq!(
            registry.rule("UnresolvedAddress"),
            Some(Rule::Address(NetworkFamily::Symbol))
        );
        assert_eq!(
            registry.rule("array[UnresolvedMosaic]"),
            Some(Rule::Array("UnresolvedMosaic"))
        );
        assert_eq!(
            registry.rule("EmbeddedTransaction"),
            Some(Rule::Polymorphic(&symbol::EMBEDDED_TRANSACTIONS))
        );
        assert_eq!(registry.rule("bytes"), Some(Rule::Bytes));
        assert_eq!(registry.rule("array[BlockType]"), Some(Rule::Array("BlockType")));
    }

    #[test]
    fn nem_registry_uses_text_addresses() {
        let registry = nem_registry(Vec::new()).unwrap();
        assert_eq!(registry.rule("Address"), Some(Rule::Address(NetworkFamily::Nem)));
        assert_eq!(
            registry.rule("NonVerifiableTransaction"),
            Some(Rule::Polymorphic(&crate::schema::nem::NON_VERIFIABLE_TRANSACTIONS))
        );
    }

    #[test]
    fn explicit_rule_replaces_autodetected() {
        let mut builder = RegistryBuilder::new(&symbol::CATALOG);
        builder.autodetect().unwrap();
        assert_eq!(
            builder.rules.get("Address").map(|(_, rule)| *rule),
            Some(Rule::Pod { size: 24 })
        );
        builder
            .add_address_parser("Address", NetworkFamily::Symbol)
            .unwrap();
        let registry = builder.build().unwrap();
        assert_eq!(
            registry.rule("Address"),
            Some(Rule::Address(NetworkFamily::Symbol))
        );
    }

    #[test]
    fn same_tier_conflict_is_fatal() {
        let mut builder = RegistryBuilder::new(&symbol::CATALOG);
        builder.add_pod_parser("Hash256", 32).unwrap();
        let err = builder
            .add_address_parser("Hash256", NetworkFamily::Symbol)
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::RegistryConflict { ref type_name, .. } if type_name == "Hash256"));
    }

    #[test]
    fn same_rule_twice_is_not_a_conflict() {
        let mut builder = RegistryBuilder::new(&symbol::CATALOG);
        builder.add_pod_parser("Hash256", 32).unwrap();
        assert!(builder.add_pod_parser("Hash256", 32).is_ok());
    }

    #[test]
    fn overrides_win() {
        let registry = symbol_registry(vec![("Amount".to_string(), Rule::Pod { size: 8 })]).unwrap();
        assert_eq!(registry.rule("Amount"), Some(Rule::Pod { size: 8 }));
    }

    #[test]
    fn build_rejects_incomplete_tables() {
        let builder = RegistryBuilder::new(&symbol::CATALOG);
        assert!(matches!(
            builder.build(),
            Err(BuildError::UnresolvedField { .. })
        ));
    }

    #[test]
    fn array_over_unknown_element_is_rejected() {
        let mut builder = RegistryBuilder::new(&symbol::CATALOG);
        builder.autodetect().unwrap();
        builder.add_array_parser("Nonexistent").unwrap();
        assert!(matches!(builder.build(), Err(BuildError::UnknownType(_))));
    }
}
