//! Catalog-driven serialization and size computation.

use crate::schema::{Catalog, FieldDef, FieldKind, FieldType, IntType, TypeDef};
use crate::value::{StructValue, Value};

/// Bytes needed to pad `size` up to a multiple of `alignment`.
pub(crate) fn padding(size: usize, alignment: usize) -> usize {
    if alignment == 0 {
        0
    } else {
        (alignment - size % alignment) % alignment
    }
}

/// Integer layout of a scalar field (computed fields are always scalars).
pub(crate) fn scalar_int(catalog: &Catalog, field: &FieldDef) -> IntType {
    let name = match field.ty {
        FieldType::Named(name) => name,
        _ => panic!("field `{}` is not a scalar", field.name),
    };
    catalog
        .resolve(name)
        .int()
        .unwrap_or_else(|| panic!("type `{name}` of field `{}` is not an integer", field.name))
}

/// Wire size of a fixed-size scalar type, zero for anything variable.
pub(crate) fn scalar_size(catalog: &Catalog, ty: &FieldType) -> usize {
    match ty {
        FieldType::Named(name) => match catalog.resolve(name) {
            TypeDef::Fixed { size, .. } => *size,
            other => other.int().map_or(0, |int| int.size),
        },
        _ => 0,
    }
}

pub(crate) fn serialize(value: &StructValue) -> Vec<u8> {
    let mut out = Vec::with_capacity(struct_size(value));
    write_struct(value, &mut out);
    out
}

pub(crate) fn struct_size(value: &StructValue) -> usize {
    let catalog = value.catalog();
    value
        .fields()
        .filter(|(field, _)| value.is_present(field))
        .map(|(field, field_value)| match field.kind {
            FieldKind::Value => value_size(catalog, &field.ty, field_value),
            _ => scalar_int(catalog, field).size,
        })
        .sum()
}

pub(crate) fn value_size(catalog: &'static Catalog, ty: &FieldType, value: &Value) -> usize {
    match ty {
        FieldType::Named(name) => match catalog.resolve(name) {
            TypeDef::Fixed { size, .. } => *size,
            TypeDef::Struct(_) | TypeDef::Family(_) => {
                value.as_struct().map_or(0, StructValue::size)
            }
            other => other.int().map_or(0, |int| int.size),
        },
        FieldType::Bytes(_) => value.as_bytes().map_or(0, <[u8]>::len),
        FieldType::Array {
            element,
            alignment,
            pad_last,
            ..
        } => {
            let items = value.as_array().unwrap_or(&[]);
            let element_ty = FieldType::Named(element);
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let size = value_size(catalog, &element_ty, item);
                    let is_last = index + 1 == items.len();
                    if *pad_last || !is_last {
                        size + padding(size, *alignment)
                    } else {
                        size
                    }
                })
                .sum()
        }
    }
}

fn element_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Bytes(bytes) => bytes.len(),
        _ => 0,
    }
}

fn write_scalar(int: IntType, raw: u64, out: &mut Vec<u8>) {
    out.extend_from_slice(&raw.to_le_bytes()[..int.size]);
}

fn write_struct(value: &StructValue, out: &mut Vec<u8>) {
    let catalog = value.catalog();
    for (field, field_value) in value.fields() {
        if !value.is_present(field) {
            continue;
        }

        let computed = match field.kind {
            FieldKind::Value => {
                write_value(catalog, &field.ty, field_value, out);
                continue;
            }
            FieldKind::Reserved(constant) => constant,
            FieldKind::CountOf(target) => value.get(target).map_or(0, element_count) as u64,
            FieldKind::SizeOf(target) => value.def().field(target).map_or(0, |(index, def)| {
                value_size(catalog, &def.ty, value.value_at(index))
            }) as u64,
            FieldKind::EntitySize => value.size() as u64,
        };
        write_scalar(scalar_int(catalog, field), computed, out);
    }
}

fn write_value(catalog: &'static Catalog, ty: &FieldType, value: &Value, out: &mut Vec<u8>) {
    match ty {
        FieldType::Named(name) => match catalog.resolve(name) {
            TypeDef::Fixed { size, .. } => {
                let bytes = value.as_bytes().unwrap_or(&[]);
                let start = out.len();
                out.extend_from_slice(&bytes[..bytes.len().min(*size)]);
                out.resize(start + size, 0);
            }
            TypeDef::Struct(_) | TypeDef::Family(_) => {
                if let Some(inner) = value.as_struct() {
                    write_struct(inner, out);
                }
            }
            other => {
                let raw = match value {
                    Value::Unsigned(raw) => *raw,
                    Value::Signed(raw) => *raw as u64,
                    _ => 0,
                };
                if let Some(int) = other.int() {
                    write_scalar(int, raw, out);
                }
            }
        },
        FieldType::Bytes(_) => out.extend_from_slice(value.as_bytes().unwrap_or(&[])),
        FieldType::Array {
            element,
            alignment,
            pad_last,
            ..
        } => {
            let items = value.as_array().unwrap_or(&[]);
            let element_ty = FieldType::Named(element);
            for (index, item) in items.iter().enumerate() {
                let start = out.len();
                write_value(catalog, &element_ty, item, out);
                if *pad_last || index + 1 != items.len() {
                    let pad = padding(out.len() - start, *alignment);
                    out.resize(out.len() + pad, 0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_rounds_up() {
        assert_eq!(padding(0, 8), 0);
        assert_eq!(padding(1, 8), 7);
        assert_eq!(padding(8, 8), 0);
        assert_eq!(padding(145, 8), 7);
        assert_eq!(padding(5, 0), 0);
    }

    #[test]
    fn scalars_are_little_endian_and_truncated() {
        let mut out = Vec::new();
        write_scalar(IntType::U16, 0x4154, &mut out);
        write_scalar(IntType::I8, (-2i64) as u64, &mut out);
        assert_eq!(out, vec![0x54, 0x41, 0xFE]);
    }
}
