//! Errors raised while turning descriptors into entities.
//!
//! Decoding failures live next to the reader in [`crate::codec`]; key and
//! address problems live next to their types. Everything that can go wrong
//! between "here is a descriptor" and "here are signed bytes" is a
//! [`BuildError`].

use thiserror::Error;

use crate::codec::DecodeError;
use crate::transaction::pipeline::BuildStage;

/// Failures of the registry, the descriptor processor, the factory and the
/// signing pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The discriminator value does not name any variant of the family.
    #[error("unknown {family} discriminator: {value}")]
    UnknownDiscriminator { family: String, value: String },

    /// A polymorphic descriptor arrived without its discriminator key.
    #[error("{family} descriptor is missing its `{key}` discriminator")]
    MissingDiscriminator { family: String, key: String },

    /// A descriptor key (or a declared field) has no settable counterpart or
    /// no registered rule.
    #[error("cannot resolve field `{field}` of {type_name}")]
    UnresolvedField { type_name: String, field: String },

    /// A rule refused the supplied value.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },

    /// A declared size delta disagrees with the data it describes.
    #[error("size inconsistency: declared {declared}, actual {actual}")]
    SizeInconsistency { declared: i64, actual: i64 },

    /// Two registrations of equal precedence disagree about a type name.
    #[error("conflicting rules for `{type_name}`: {existing} vs {incoming}")]
    RegistryConflict {
        type_name: String,
        existing: String,
        incoming: String,
    },

    /// A type name is not part of the catalog.
    #[error("type `{0}` is not defined in the catalog")]
    UnknownType(String),

    /// A signing pipeline step ran before its predecessor.
    #[error("pipeline step out of order: expected stage {expected:?}, found {actual:?}")]
    OutOfOrder {
        expected: BuildStage,
        actual: BuildStage,
    },

    /// `multiplier x size` does not fit in a fee field.
    #[error("fee overflow: {multiplier} x {size} bytes")]
    FeeOverflow { multiplier: u64, size: usize },

    /// The operation has no meaning for the selected network family.
    #[error("{operation} is not supported on {network}")]
    Unsupported {
        operation: &'static str,
        network: String,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl BuildError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolved(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnresolvedField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = BuildError::UnknownDiscriminator {
            family: "Transaction".into(),
            value: "teleport_transaction".into(),
        };
        assert_eq!(
            err.to_string(),
            "unknown Transaction discriminator: teleport_transaction"
        );

        let err = BuildError::unresolved("TransferTransaction", "size");
        assert_eq!(
            err.to_string(),
            "cannot resolve field `size` of TransferTransaction"
        );
    }

    #[test]
    fn out_of_order_reports_both_stages() {
        let err = BuildError::OutOfOrder {
            expected: BuildStage::Signed,
            actual: BuildStage::FeeSet,
        };
        let text = err.to_string();
        assert!(text.contains("Signed"));
        assert!(text.contains("FeeSet"));
    }

    #[test]
    fn decode_errors_convert() {
        let err: BuildError = DecodeError::UnexpectedEof {
            offset: 4,
            needed: 8,
            available: 2,
        }
        .into();
        assert!(matches!(err, BuildError::Decode(_)));
    }
}
