//! Catalog-driven decoding.
//!
//! Computed fields are read, remembered and checked against what they
//! describe; they are never stored as values. Conditional fields that depend
//! on a discriminator appearing *later* in the layout (the namespace
//! registration union) are parked as raw slots and resolved once the whole
//! struct has been read.

use thiserror::Error;

use super::writer::{padding, scalar_int, scalar_size};
use crate::schema::{Catalog, FieldDef, FieldKind, FieldType, IntType, Length, StructDef, TypeDef};
use crate::value::{StructValue, Value};

/// Failures while decoding bytes into catalog structs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input: needed {needed} bytes at offset {offset}, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{count} trailing bytes after {type_name}")]
    TrailingBytes { type_name: String, count: usize },

    #[error("unknown {family} tag 0x{tag:X}")]
    UnknownTag { family: String, tag: u64 },

    #[error("{type_name}.{field}: declared size {declared}, decoded {actual}")]
    SizeMismatch {
        type_name: String,
        field: String,
        declared: u64,
        actual: u64,
    },
}

/// Little-endian cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    fn at(buffer: &'a [u8], position: usize) -> Self {
        Self { buffer, position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        if count > self.remaining() {
            return Err(DecodeError::UnexpectedEof {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.buffer[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    pub fn read_int(&mut self, int: IntType) -> Result<u64, DecodeError> {
        let bytes = self.read_bytes(int.size)?;
        let mut raw = [0u8; 8];
        raw[..int.size].copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }

    /// Reads an integer `offset` bytes ahead without moving the cursor.
    pub fn peek_int(&self, offset: usize, int: IntType) -> Result<u64, DecodeError> {
        let mut ahead = Self::at(self.buffer, self.position);
        ahead.read_bytes(offset)?;
        ahead.read_int(int)
    }
}

fn sign_extend(raw: u64, size: usize) -> i64 {
    let shift = 64 - (size * 8) as u32;
    ((raw << shift) as i64) >> shift
}

pub(crate) fn deserialize(
    catalog: &'static Catalog,
    def: &'static StructDef,
    bytes: &[u8],
) -> Result<StructValue, DecodeError> {
    let mut reader = Reader::new(bytes);
    let value = read_struct(catalog, def, &mut reader)?;
    if reader.remaining() > 0 {
        return Err(DecodeError::TrailingBytes {
            type_name: def.name.to_string(),
            count: reader.remaining(),
        });
    }
    Ok(value)
}

/// Values of computed fields read so far, keyed by field name.
struct Computed(Vec<(&'static str, u64)>);

impl Computed {
    fn get(&self, name: &str) -> u64 {
        self.0
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map_or(0, |(_, value)| *value)
    }
}

/// Where the current struct's bytes end, and whose they are.
struct Frame {
    def: &'static StructDef,
    end: Option<usize>,
}

impl Frame {
    fn mismatch(&self, field: &str, declared: usize, actual: usize) -> DecodeError {
        DecodeError::SizeMismatch {
            type_name: self.def.name.to_string(),
            field: field.to_string(),
            declared: declared as u64,
            actual: actual as u64,
        }
    }
}

fn read_struct(
    catalog: &'static Catalog,
    def: &'static StructDef,
    reader: &mut Reader<'_>,
) -> Result<StructValue, DecodeError> {
    let start = reader.position();
    let mut value = StructValue::new(catalog, def);
    let mut computed = Computed(Vec::new());
    let mut frame = Frame { def, end: None };

    let mut parked: Vec<(usize, &'static FieldDef, usize)> = Vec::new();
    let mut open_slot: Option<(&'static str, usize, usize)> = None;

    for (index, field) in def.fields().enumerate() {
        if let Some(condition) = field.condition {
            let decided = def
                .field(condition.field)
                .is_some_and(|(position, _)| position < index);
            if decided {
                if !value.is_present(field) {
                    continue;
                }
            } else {
                let size = scalar_size(catalog, &field.ty);
                let offset = match open_slot {
                    Some((owner, offset, slot_size))
                        if owner == condition.field && slot_size == size =>
                    {
                        offset
                    }
                    _ => {
                        let offset = reader.position();
                        reader.read_bytes(size)?;
                        open_slot = Some((condition.field, offset, size));
                        offset
                    }
                };
                parked.push((index, field, offset));
                continue;
            }
        }
        open_slot = None;

        match field.kind {
            FieldKind::Value => {
                let before = reader.position();
                let item = read_value(catalog, &frame, field, &field.ty, reader, &computed)?;
                let consumed = reader.position() - before;

                let declared_size = def.fields().find(|candidate| {
                    matches!(candidate.kind, FieldKind::SizeOf(target) if target == field.name)
                });
                if let Some(size_field) = declared_size {
                    let declared = computed.get(size_field.name) as usize;
                    if declared != consumed {
                        return Err(frame.mismatch(size_field.name, declared, consumed));
                    }
                }
                value.set_at(index, item);
            }
            FieldKind::Reserved(_) => {
                reader.read_int(scalar_int(catalog, field))?;
            }
            FieldKind::CountOf(_) | FieldKind::SizeOf(_) => {
                let raw = reader.read_int(scalar_int(catalog, field))?;
                computed.0.push((field.name, raw));
            }
            FieldKind::EntitySize => {
                let declared = reader.read_int(scalar_int(catalog, field))? as usize;
                let end = start.saturating_add(declared);
                if end > reader.buffer.len() {
                    return Err(DecodeError::UnexpectedEof {
                        offset: start,
                        needed: declared,
                        available: reader.buffer.len() - start,
                    });
                }
                frame.end = Some(end);
            }
        }
    }

    for (index, field, offset) in parked {
        if value.is_present(field) {
            let mut slot = Reader::at(reader.buffer, offset);
            let item = read_value(catalog, &frame, field, &field.ty, &mut slot, &computed)?;
            value.set_at(index, item);
        }
    }

    if let Some(end) = frame.end {
        if reader.position() != end {
            return Err(frame.mismatch("size", end - start, reader.position() - start));
        }
    }

    Ok(value)
}

fn read_value(
    catalog: &'static Catalog,
    frame: &Frame,
    field: &FieldDef,
    ty: &FieldType,
    reader: &mut Reader<'_>,
    computed: &Computed,
) -> Result<Value, DecodeError> {
    match ty {
        FieldType::Named(name) => match catalog.resolve(name) {
            TypeDef::Fixed { size, .. } => Ok(Value::Bytes(reader.read_bytes(*size)?.to_vec())),
            TypeDef::Struct(def) => Ok(Value::Struct(read_struct(catalog, def, reader)?)),
            TypeDef::Family(family) => {
                let tag = reader.peek_int(family.tag_offset, family.tag)?;
                let variant = family.by_tag(tag).ok_or_else(|| DecodeError::UnknownTag {
                    family: family.name.to_string(),
                    tag,
                })?;
                Ok(Value::Struct(read_struct(catalog, variant.def, reader)?))
            }
            other => {
                let int = other.int().unwrap_or(IntType::U8);
                let raw = reader.read_int(int)?;
                Ok(if int.signed {
                    Value::Signed(sign_extend(raw, int.size))
                } else {
                    Value::Unsigned(raw)
                })
            }
        },
        FieldType::Bytes(length) => {
            let count = match length {
                Length::Count(name) | Length::Bytes(name) => computed.get(name) as usize,
                Length::Fill => fill_end(frame, reader) - reader.position(),
            };
            Ok(Value::Bytes(reader.read_bytes(count)?.to_vec()))
        }
        FieldType::Array {
            element,
            length,
            alignment,
            pad_last,
            ..
        } => {
            let element_ty = FieldType::Named(element);
            let mut items = Vec::new();

            if let Length::Count(name) = length {
                let count = computed.get(name) as usize;
                for index in 0..count {
                    let before = reader.position();
                    items.push(read_value(catalog, frame, field, &element_ty, reader, computed)?);
                    if *pad_last || index + 1 != count {
                        reader.read_bytes(padding(reader.position() - before, *alignment))?;
                    }
                }
                return Ok(Value::Array(items));
            }

            let end = match length {
                Length::Bytes(name) => reader.position().saturating_add(computed.get(name) as usize),
                _ => fill_end(frame, reader),
            };
            if end > reader.buffer.len() {
                return Err(DecodeError::UnexpectedEof {
                    offset: reader.position(),
                    needed: end - reader.position(),
                    available: reader.remaining(),
                });
            }

            let begin = reader.position();
            while reader.position() < end {
                let before = reader.position();
                items.push(read_value(catalog, frame, field, &element_ty, reader, computed)?);
                let pad = padding(reader.position() - before, *alignment);
                let pad = if *pad_last {
                    pad
                } else {
                    pad.min(end.saturating_sub(reader.position()))
                };
                reader.read_bytes(pad)?;
            }
            if reader.position() != end {
                return Err(frame.mismatch(field.name, end - begin, reader.position() - begin));
            }
            Ok(Value::Array(items))
        }
    }
}

fn fill_end(frame: &Frame, reader: &Reader<'_>) -> usize {
    frame
        .end
        .unwrap_or(reader.buffer.len())
        .max(reader.position())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_reads_little_endian() {
        let mut reader = Reader::new(&[0x54, 0x41, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(reader.read_int(IntType::U16).unwrap(), 0x4154);
        assert_eq!(reader.peek_int(0, IntType::U8).unwrap(), 0x01);
        assert_eq!(reader.read_int(IntType::U32).unwrap(), 0x0403_0201);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn reader_reports_eof() {
        let mut reader = Reader::new(&[1, 2]);
        assert_eq!(
            reader.read_int(IntType::U32).unwrap_err(),
            DecodeError::UnexpectedEof {
                offset: 0,
                needed: 4,
                available: 2
            }
        );
    }

    #[test]
    fn sign_extension() {
        assert_eq!(sign_extend(0xFE, 1), -2);
        assert_eq!(sign_extend(0x7F, 1), 127);
        assert_eq!(sign_extend(0xFFFF, 2), -1);
        assert_eq!(sign_extend(u64::MAX, 8), -1);
    }
}
