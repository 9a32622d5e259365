//! Descriptor to typed struct resolution.

use tracing::trace;

use super::registry::{Rule, RuleRegistry};
use crate::descriptor::{Descriptor, DescriptorValue};
use crate::error::BuildError;
use crate::network::{Address, NetworkFamily};
use crate::schema::{EnumDef, Family, IntType, StructDef, Variant};
use crate::value::{StructValue, Value};

/// Applies registry rules to descriptors. Holds no state of its own beyond
/// an optional network identifier used for nested structs that do not name
/// one.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorProcessor<'r> {
    registry: &'r RuleRegistry,
    network: Option<u8>,
}

impl<'r> DescriptorProcessor<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            network: None,
        }
    }

    /// Fills `network` on every struct that has one and whose descriptor
    /// leaves it out.
    pub fn with_network(mut self, identifier: u8) -> Self {
        self.network = Some(identifier);
        self
    }

    /// Resolves the discriminator of `descriptor` to a variant of `family`
    /// and builds it.
    pub fn create_from_factory(
        &self,
        family: &'static Family,
        descriptor: &Descriptor,
    ) -> Result<StructValue, BuildError> {
        let variant = resolve_variant(family, descriptor)?;
        trace!(family = family.name, variant = variant.name, "discriminator resolved");
        self.populate(variant.def, descriptor, Some(family.discriminator))
    }

    /// Builds a struct of a fixed type; every descriptor key must be a
    /// settable field of `def`.
    pub fn create_struct(
        &self,
        def: &'static StructDef,
        descriptor: &Descriptor,
    ) -> Result<StructValue, BuildError> {
        self.populate(def, descriptor, None)
    }

    fn populate(
        &self,
        def: &'static StructDef,
        descriptor: &Descriptor,
        discriminator: Option<&str>,
    ) -> Result<StructValue, BuildError> {
        let mut value = StructValue::new(self.registry.catalog(), def);

        if let (Some(identifier), false) = (self.network, descriptor.contains_key("network")) {
            if def.field("network").is_some_and(|(_, field)| !field.kind.is_computed()) {
                value.set("network", Value::Unsigned(u64::from(identifier)))?;
            }
        }

        for (key, raw) in descriptor.iter() {
            if discriminator == Some(key) {
                continue;
            }
            let (_, field) = def
                .field(key)
                .filter(|(_, field)| !field.kind.is_computed())
                .ok_or_else(|| BuildError::unresolved(def.name, key))?;

            let rule_name = field.ty.rule_name();
            let rule = self
                .registry
                .rule(&rule_name)
                .ok_or_else(|| BuildError::unresolved(def.name, key))?;

            let typed = self.apply(rule, raw, key)?;
            value.set(key, typed)?;
        }

        if let Some(validate) = def.validator {
            validate(&value)?;
        }
        Ok(value)
    }

    fn apply(&self, rule: Rule, raw: &DescriptorValue, field: &str) -> Result<Value, BuildError> {
        if let DescriptorValue::Typed(value) = raw {
            return self.accept_typed(rule, value, field);
        }

        match rule {
            Rule::Int(int) => int_value(int, raw, field),
            Rule::Pod { size } => match self.registry.convert(raw) {
                Some(value) => Ok(value),
                None => pod_value(size, raw, field),
            },
            Rule::Bytes => match raw {
                DescriptorValue::Bytes(bytes) => Ok(Value::Bytes(bytes.clone())),
                DescriptorValue::Text(text) => Ok(Value::Bytes(text.as_bytes().to_vec())),
                other => Err(unexpected(field, "bytes or text", other)),
            },
            Rule::Enum(def) => enum_value(def, raw, field),
            Rule::Flags(def) => flags_value(def, raw, field),
            Rule::Struct(def) => match raw {
                DescriptorValue::Map(nested) => Ok(Value::Struct(self.create_struct(def, nested)?)),
                other => Err(unexpected(field, "a nested descriptor", other)),
            },
            Rule::Array(element) => {
                let items = match raw {
                    DescriptorValue::List(items) => items,
                    other => return Err(unexpected(field, "a list", other)),
                };
                let element_rule = self
                    .registry
                    .rule(element)
                    .ok_or_else(|| BuildError::UnknownType(element.to_string()))?;
                items
                    .iter()
                    .map(|item| self.apply(element_rule, item, field))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Rule::Polymorphic(family) => match raw {
                DescriptorValue::Map(nested) => {
                    Ok(Value::Struct(self.create_from_factory(family, nested)?))
                }
                other => Err(unexpected(field, "a nested descriptor", other)),
            },
            Rule::Address(family) => match self.registry.convert(raw) {
                Some(value) => Ok(value),
                None => address_value(family, raw, field),
            },
        }
    }

    /// Checks an already-typed value against `rule` with the same limits a
    /// raw descriptor value would face.
    fn accept_typed(&self, rule: Rule, value: &Value, field: &str) -> Result<Value, BuildError> {
        match (rule, value) {
            (Rule::Int(int), Value::Unsigned(number)) => {
                int_value(int, &DescriptorValue::Int(i128::from(*number)), field)
            }
            (Rule::Int(int), Value::Signed(number)) => {
                int_value(int, &DescriptorValue::Int(i128::from(*number)), field)
            }
            (Rule::Enum(def), Value::Unsigned(number)) => {
                enum_value(def, &DescriptorValue::Int(i128::from(*number)), field)
            }
            (Rule::Flags(def), Value::Unsigned(number)) => {
                flags_value(def, &DescriptorValue::Int(i128::from(*number)), field)
            }
            (Rule::Pod { size }, Value::Bytes(bytes)) => {
                pod_value(size, &DescriptorValue::Bytes(bytes.clone()), field)
            }
            (Rule::Bytes, Value::Bytes(bytes)) => Ok(Value::Bytes(bytes.clone())),
            (Rule::Address(family), Value::Bytes(bytes)) => {
                address_value(family, &DescriptorValue::Bytes(bytes.clone()), field)
            }
            (Rule::Struct(def), Value::Struct(inner)) if inner.def() != def => {
                Err(BuildError::invalid(
                    field,
                    format!("expected {}, found {}", def.name, inner.type_name()),
                ))
            }
            (Rule::Polymorphic(family), Value::Struct(inner)) if !family.contains(inner.def()) => {
                Err(BuildError::invalid(
                    field,
                    format!("{} is not a {} variant", inner.type_name(), family.name),
                ))
            }
            (Rule::Struct(_) | Rule::Polymorphic(_), Value::Struct(_)) => Ok(value.clone()),
            (Rule::Array(element), Value::Array(items)) => {
                let element_rule = self
                    .registry
                    .rule(element)
                    .ok_or_else(|| BuildError::UnknownType(element.to_string()))?;
                items
                    .iter()
                    .map(|item| self.accept_typed(element_rule, item, field))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            (rule, value) => Err(BuildError::invalid(
                field,
                format!("expected {rule}, found a typed {} value", value.kind()),
            )),
        }
    }
}

fn resolve_variant(
    family: &'static Family,
    descriptor: &Descriptor,
) -> Result<&'static Variant, BuildError> {
    let raw = descriptor
        .get(family.discriminator)
        .ok_or_else(|| BuildError::MissingDiscriminator {
            family: family.name.to_string(),
            key: family.discriminator.to_string(),
        })?;

    let variant = match raw {
        DescriptorValue::Text(name) => family.by_name(name),
        DescriptorValue::Int(tag) => u64::try_from(*tag).ok().and_then(|tag| family.by_tag(tag)),
        _ => None,
    };
    variant.ok_or_else(|| BuildError::UnknownDiscriminator {
        family: family.name.to_string(),
        value: match raw {
            DescriptorValue::Text(name) => name.clone(),
            DescriptorValue::Int(tag) => format!("0x{tag:X}"),
            other => format!("{other:?}"),
        },
    })
}

fn unexpected(field: &str, expected: &str, raw: &DescriptorValue) -> BuildError {
    let found = match raw {
        DescriptorValue::Int(_) => "an integer",
        DescriptorValue::Text(_) => "text",
        DescriptorValue::Bytes(_) => "bytes",
        DescriptorValue::List(_) => "a list",
        DescriptorValue::Map(_) => "a nested descriptor",
        DescriptorValue::Address(_) => "an address",
        DescriptorValue::Typed(_) => "a typed value",
    };
    BuildError::invalid(field, format!("expected {expected}, found {found}"))
}

fn parse_integer(raw: &DescriptorValue, field: &str) -> Result<i128, BuildError> {
    match raw {
        DescriptorValue::Int(value) => Ok(*value),
        DescriptorValue::Text(text) => {
            let trimmed = text.trim();
            let parsed = match trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
            {
                Some(digits) => i128::from_str_radix(digits, 16),
                None => trimmed.parse::<i128>(),
            };
            parsed.map_err(|e| BuildError::invalid(field, format!("`{text}` is not a number: {e}")))
        }
        other => Err(unexpected(field, "an integer", other)),
    }
}

fn int_value(int: IntType, raw: &DescriptorValue, field: &str) -> Result<Value, BuildError> {
    let number = parse_integer(raw, field)?;
    if int.signed {
        let (low, high) = int.signed_range();
        if number < i128::from(low) || number > i128::from(high) {
            return Err(BuildError::invalid(
                field,
                format!("{number} is outside {low}..={high}"),
            ));
        }
        Ok(Value::Signed(number as i64))
    } else {
        let max = int.max_unsigned();
        if number < 0 || number > i128::from(max) {
            return Err(BuildError::invalid(field, format!("{number} is outside 0..={max}")));
        }
        Ok(Value::Unsigned(number as u64))
    }
}

fn pod_value(size: usize, raw: &DescriptorValue, field: &str) -> Result<Value, BuildError> {
    let bytes = match raw {
        DescriptorValue::Bytes(bytes) => bytes.clone(),
        DescriptorValue::Text(text) => hex::decode(text.trim())
            .map_err(|e| BuildError::invalid(field, format!("invalid hex: {e}")))?,
        other => return Err(unexpected(field, "bytes or hex text", other)),
    };
    if bytes.len() != size {
        return Err(BuildError::invalid(
            field,
            format!("expected {size} bytes, got {}", bytes.len()),
        ));
    }
    Ok(Value::Bytes(bytes))
}

fn enum_value(def: &EnumDef, raw: &DescriptorValue, field: &str) -> Result<Value, BuildError> {
    let value = match raw {
        DescriptorValue::Text(name) => def.value_of(name),
        DescriptorValue::Int(value) => u64::try_from(*value)
            .ok()
            .filter(|value| def.name_of(*value).is_some()),
        other => return Err(unexpected(field, "an enum name", other)),
    };
    value
        .map(Value::Unsigned)
        .ok_or_else(|| BuildError::invalid(field, format!("not a {} value", def.name)))
}

fn flags_value(def: &EnumDef, raw: &DescriptorValue, field: &str) -> Result<Value, BuildError> {
    let value = match raw {
        DescriptorValue::Text(names) => def.parse_flags(names),
        DescriptorValue::Int(value) => u64::try_from(*value)
            .ok()
            .filter(|value| value & !def.all_flags() == 0),
        other => return Err(unexpected(field, "flag names", other)),
    };
    value
        .map(Value::Unsigned)
        .ok_or_else(|| BuildError::invalid(field, format!("not a {} combination", def.name)))
}

fn address_value(
    family: NetworkFamily,
    raw: &DescriptorValue,
    field: &str,
) -> Result<Value, BuildError> {
    let size = family.address_wire_size();
    let bytes = match raw {
        DescriptorValue::Address(address) if address.family() == family => address.wire_bytes(),
        DescriptorValue::Address(address) => {
            return Err(BuildError::invalid(
                field,
                format!("{} address on a {family} network", address.family()),
            ))
        }
        DescriptorValue::Text(text) if text.len() == size * 2 && family == NetworkFamily::Symbol => {
            hex::decode(text).map_err(|e| BuildError::invalid(field, format!("invalid hex: {e}")))?
        }
        DescriptorValue::Text(text) => Address::parse(family, text)
            .map_err(|e| BuildError::invalid(field, e.to_string()))?
            .wire_bytes(),
        DescriptorValue::Bytes(bytes) => bytes.clone(),
        other => return Err(unexpected(field, "an address", other)),
    };
    if bytes.len() != size {
        return Err(BuildError::invalid(
            field,
            format!("expected {size} address bytes, got {}", bytes.len()),
        ));
    }
    Ok(Value::Bytes(bytes))
}
