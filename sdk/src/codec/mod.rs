//! Little-endian binary codec driven by the type catalogs.
//!
//! There is no per-type code here: the writer and reader walk
//! [`StructDef`](crate::schema::StructDef) field lists and derive every
//! computed field (reserved words, counts, sizes) on the fly.

mod reader;
mod writer;

pub use reader::{DecodeError, Reader};

pub(crate) use reader::deserialize;
pub(crate) use writer::{serialize, struct_size};
