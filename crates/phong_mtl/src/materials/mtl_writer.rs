//! MTL file writer
//!
//! Emits one canonical block per material, in collection order:
//!
//! ```text
//! newmtl <name>
//! Ka <r> <g> <b>
//! Kd <r> <g> <b>
//! Ks <r> <g> <b>
//! Ns <shininess>
//! Tr <transparency>
//!
//! ```
//!
//! Transparency is always written as `Tr`, so writing a parsed file again
//! produces identical text.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::collection::MaterialCollection;
use super::phong::Material;
use crate::{MtlError, Result};

/// Writer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Fixed number of decimals for every number
    ///
    /// `None` writes the shortest text that reads back as the same `f32`.
    pub precision: Option<usize>,
}

/// MTL file writer
#[derive(Debug, Clone, Copy, Default)]
pub struct MtlWriter {
    options: WriteOptions,
}

impl MtlWriter {
    /// Create a writer with the given options
    pub const fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Options this writer was built with
    pub const fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Render a collection to MTL text
    pub fn to_string(&self, materials: &MaterialCollection) -> String {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        if self.write_materials(materials, &mut out).is_err() {
            return String::new();
        }
        // Names and numbers are always valid UTF-8
        String::from_utf8(out).unwrap_or_default()
    }

    /// Write a collection to any writer
    ///
    /// # Errors
    /// [`MtlError::Write`] if the underlying writer fails.
    pub fn write_to<W: Write>(&self, materials: &MaterialCollection, writer: W) -> Result<()> {
        self.write_materials(materials, writer)
            .map_err(|source| MtlError::Write {
                path: MtlError::stream_path("writer"),
                source,
            })
    }

    /// Write a collection to a file, replacing any existing content
    ///
    /// # Errors
    /// [`MtlError::InvalidInput`] for an empty path, [`MtlError::Write`] if the
    /// file cannot be created or written.
    pub fn save(&self, materials: &MaterialCollection, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(MtlError::InvalidInput("empty path".to_string()));
        }

        let to_write_error = |source: std::io::Error| MtlError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(to_write_error)?;
        let mut writer = BufWriter::new(file);
        self.write_materials(materials, &mut writer).map_err(to_write_error)?;
        writer.flush().map_err(to_write_error)?;

        log::debug!("Saved {} materials to {}", materials.len(), path.display());
        Ok(())
    }

    fn write_materials<W: Write>(&self, materials: &MaterialCollection, mut writer: W) -> std::io::Result<()> {
        for (name, material) in materials {
            self.write_material(&mut writer, name, material)?;
        }
        Ok(())
    }

    fn write_material<W: Write>(&self, writer: &mut W, name: &str, material: &Material) -> std::io::Result<()> {
        writeln!(writer, "newmtl {name}")?;
        match self.options.precision {
            Some(p) => {
                writeln!(writer, "Ka {:.p$}", material.ambient, p = p)?;
                writeln!(writer, "Kd {:.p$}", material.diffuse, p = p)?;
                writeln!(writer, "Ks {:.p$}", material.specular, p = p)?;
                writeln!(writer, "Ns {:.p$}", material.shininess, p = p)?;
                writeln!(writer, "Tr {:.p$}", material.transparency, p = p)?;
            }
            None => {
                writeln!(writer, "Ka {}", material.ambient)?;
                writeln!(writer, "Kd {}", material.diffuse)?;
                writeln!(writer, "Ks {}", material.specular)?;
                writeln!(writer, "Ns {}", material.shininess)?;
                writeln!(writer, "Tr {}", material.transparency)?;
            }
        }
        writeln!(writer)
    }
}
