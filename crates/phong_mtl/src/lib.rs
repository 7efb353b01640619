//! # Phong MTL
//!
//! Reader and writer for Wavefront `.mtl` material libraries restricted to the
//! classic Phong parameters: `newmtl`, `Ka`, `Kd`, `Ks`, `Ns`, `Tr` and `d`.
//!
//! ## Features
//!
//! - **Tolerant parsing**: unknown directives, comments and malformed lines are skipped
//! - **Name-keyed collections**: stable handles, insert-or-get-existing semantics
//! - **Canonical output**: deterministic, re-parseable text in name order
//! - **Configurable**: parse and write options loadable from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use phong_mtl::prelude::*;
//!
//! fn main() -> Result<(), MtlError> {
//!     let mut file = MtlFile::open("scene.mtl")?;
//!
//!     let (handle, _) = file.materials_mut().insert("Glass", Material::default())?;
//!     if let Some(glass) = file.materials_mut().get_mut(handle) {
//!         glass.transparency = 0.8;
//!     }
//!
//!     file.save(None)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod foundation;
pub mod materials;

mod error;

pub use error::{MtlError, Result};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        MtlError,
        config::{CodecConfig, Config, ConfigError},
        materials::{
            Color, DuplicatePolicy, Material, MaterialCollection, MaterialHandle,
            MtlFile, MtlParser, MtlWriter, ParseOptions, WriteOptions,
        },
    };
}
