//! # Rule Registry & Descriptor Processor
//!
//! The registry maps every field type name of a catalog to one parsing
//! [`Rule`]; the processor walks a descriptor and applies those rules,
//! recursing for nested structs, arrays and polymorphic fields.
//!
//! ```text
//! Descriptor ──► DescriptorProcessor ──► StructValue
//!                      │
//!                      └── RuleRegistry: "Amount" → Int(u64)
//!                                        "UnresolvedAddress" → Address(symbol)
//!                                        "array[UnresolvedMosaic]" → Array(..)
//!                                        "EmbeddedTransaction" → Polymorphic(..)
//! ```

pub mod processor;
pub mod registry;

pub use processor::DescriptorProcessor;
pub use registry::{nem_registry, symbol_registry, RegistryBuilder, Rule, RuleRegistry, TypeConverter};
