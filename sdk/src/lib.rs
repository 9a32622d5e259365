// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ledgerkit
//!
//! A schema-driven transaction builder for the Symbol and NEM chains. You
//! describe what you want as a plain key/value descriptor; ledgerkit turns it
//! into exactly the bytes a node will accept, then signs and hashes them the
//! way that chain expects.
//!
//! ## Architecture
//!
//! - **schema**: Static type catalogs: every struct, enum and polymorphic
//!   family of each chain, field by field, in wire order.
//! - **value**: Typed instances of catalog structs.
//! - **codec**: Little-endian serialization driven by the catalog. Sizes,
//!   counts and padding are always derived, never trusted.
//! - **rules**: The registry that maps type names to parsing rules, and the
//!   processor that applies them to descriptors.
//! - **descriptor**: The loosely typed input model (and its JSON form).
//! - **transaction**: Factory, typed entities, aggregates, metadata and the
//!   ordered signing pipeline.
//! - **facade**: Per-network hashing and signing on top of the factory.
//! - **crypto** / **network**: Keys, hashes, addresses, ids and timestamps.
//! - **config**: Chain constants and build options.
//!
//! ## Ground Rules
//!
//! 1. Same descriptor, same bytes. Always.
//! 2. A field the catalog cannot resolve is an error, never a silent default.
//! 3. Fee, then signature, then hash. The pipeline enforces the order.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod descriptor;
pub mod error;
pub mod facade;
pub mod network;
pub mod rules;
pub mod schema;
pub mod transaction;
pub mod value;

pub use config::BuildOptions;
pub use descriptor::{Descriptor, DescriptorValue, TestVector};
pub use error::BuildError;
pub use facade::Facade;
pub use network::{Address, Network, NetworkFamily};
pub use transaction::{
    Block, Cosignature, EmbeddedTransaction, Entity, SignedTransaction, Transaction,
    TransactionFactory,
};
pub use value::{StructValue, Value};
