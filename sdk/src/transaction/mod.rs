//! # Transactions
//!
//! Everything past the descriptor processor: the [`TransactionFactory`]
//! that owns a network's registry, typed entity wrappers, aggregate binding,
//! metadata deltas and the ordered [`SigningPipeline`].

pub mod aggregate;
pub mod factory;
pub mod metadata;
pub mod objects;
pub mod pipeline;

pub use aggregate::{
    add_cosignature, bind_aggregate, cosign, cosign_detached, hash_embedded_transactions,
    verify_cosignature, AggregateAssembler,
};
pub use factory::TransactionFactory;
pub use metadata::{metadata_update_value, validate_size_delta, MetadataUpdate};
pub use objects::{Block, Cosignature, DetachedCosignature, EmbeddedTransaction, Entity, Transaction};
pub use pipeline::{BuildStage, SignedTransaction, SigningPipeline};
