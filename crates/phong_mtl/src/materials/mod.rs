//! Phong material libraries
//!
//! [`MtlParser`] turns `.mtl` text into a [`MaterialCollection`],
//! [`MtlWriter`] turns it back into canonical text, and [`MtlFile`] ties a
//! collection to the path it came from.

mod collection;
mod mtl_file;
mod mtl_parser;
mod mtl_writer;
mod phong;

#[cfg(test)]
mod tests;

pub use collection::{Iter, MaterialCollection, MaterialHandle, DEFAULT_MAX_NAME_LEN};
pub use mtl_file::MtlFile;
pub use mtl_parser::{DuplicatePolicy, MtlParser, ParseOptions};
pub use mtl_writer::{MtlWriter, WriteOptions};
pub use phong::{Color, Material};
