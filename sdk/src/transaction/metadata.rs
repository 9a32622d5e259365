//! Metadata value updates.
//!
//! Metadata transactions never carry the new value itself. They carry the
//! byte-wise XOR of old and new (padded to the longer of the two) plus the
//! signed length difference, and the chain applies that delta to whatever it
//! has stored. A wrong delta silently corrupts the stored value, so it is
//! checked here before anything is signed.

use crate::descriptor::Descriptor;
use crate::error::BuildError;
use crate::value::StructValue;

/// XOR of `old` and `new`, as long as the longer input. The tail of the
/// longer input is copied through unchanged.
pub fn metadata_update_value(old: &[u8], new: &[u8]) -> Vec<u8> {
    let (longer, shorter) = if new.len() >= old.len() {
        (new, old)
    } else {
        (old, new)
    };

    let mut result = longer.to_vec();
    for (byte, other) in result.iter_mut().zip(shorter) {
        *byte ^= other;
    }
    result
}

/// Checks that `declared` is exactly `new_len - old_len`.
pub fn validate_size_delta(declared: i64, old_len: usize, new_len: usize) -> Result<(), BuildError> {
    let actual = new_len as i64 - old_len as i64;
    if declared != actual {
        return Err(BuildError::SizeInconsistency { declared, actual });
    }
    Ok(())
}

/// A consistent `(value, value_size_delta)` pair for a metadata descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataUpdate {
    pub value: Vec<u8>,
    pub value_size_delta: i16,
}

impl MetadataUpdate {
    pub fn new(old: &[u8], new: &[u8]) -> Result<Self, BuildError> {
        let delta = new.len() as i64 - old.len() as i64;
        let value_size_delta = i16::try_from(delta).map_err(|_| {
            BuildError::invalid("value_size_delta", format!("{delta} does not fit in int16"))
        })?;
        let value = metadata_update_value(old, new);
        if value.len() > usize::from(u16::MAX) {
            return Err(BuildError::invalid(
                "value",
                format!("{} bytes exceed the uint16 size field", value.len()),
            ));
        }

        Ok(Self {
            value,
            value_size_delta,
        })
    }

    /// Writes `value` and `value_size_delta` into a descriptor.
    pub fn apply_to(&self, descriptor: &mut Descriptor) {
        descriptor.insert("value", self.value.clone());
        descriptor.insert("value_size_delta", self.value_size_delta);
    }
}

/// Validator of every metadata transaction layout: the delta can never
/// remove more bytes than the update carries.
pub fn validate_metadata_value(value: &StructValue) -> Result<(), BuildError> {
    let delta = value.get_signed("value_size_delta").unwrap_or(0);
    let length = value.get_bytes("value").map_or(0, <[u8]>::len) as i64;
    if delta.abs() > length {
        return Err(BuildError::SizeInconsistency {
            declared: delta,
            actual: length,
        });
    }
    Ok(())
}
