//! Material library bound to a location on disk

use std::path::{Path, PathBuf};

use super::collection::MaterialCollection;
use super::mtl_parser::MtlParser;
use super::mtl_writer::MtlWriter;
use crate::config::CodecConfig;
use crate::{MtlError, Result};

/// A material collection together with the path it was loaded from
///
/// Changes stay in memory until [`MtlFile::save`] is called.
#[derive(Debug, Clone, Default)]
pub struct MtlFile {
    materials: MaterialCollection,
    path: Option<PathBuf>,
    config: CodecConfig,
}

impl MtlFile {
    /// Create an empty library with no associated path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty library using the given codec settings
    ///
    /// The collection accepts names up to the parser's `max_name_len`, so
    /// everything inserted reads back unchanged with the same settings.
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            materials: MaterialCollection::with_name_limit(config.parse.max_name_len),
            path: None,
            config,
        }
    }

    /// Open and parse an MTL file with default settings
    ///
    /// # Errors
    /// [`MtlError::Open`] if the file cannot be read, [`MtlError::InvalidInput`]
    /// for an empty path. Malformed content is not an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, CodecConfig::default())
    }

    /// Open and parse an MTL file with the given codec settings
    ///
    /// # Errors
    /// Same as [`MtlFile::open`].
    pub fn open_with_config(path: impl AsRef<Path>, config: CodecConfig) -> Result<Self> {
        let path = path.as_ref();
        let materials = MtlParser::new(config.parse).parse_file(path)?;
        log::debug!("Opened {} ({} materials)", path.display(), materials.len());

        Ok(Self {
            materials,
            path: Some(path.to_path_buf()),
            config,
        })
    }

    /// Save to `path`, or to the associated path when `None`
    ///
    /// Saving to an explicit path does not change the associated path; use
    /// [`MtlFile::save_as`] for that.
    ///
    /// # Errors
    /// [`MtlError::NoSavePath`] when no path is available,
    /// [`MtlError::Write`] if the destination cannot be written.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let target = path.or(self.path.as_deref()).ok_or(MtlError::NoSavePath)?;
        MtlWriter::new(self.config.write).save(&self.materials, target)
    }

    /// Save to `path` and make it the associated path
    ///
    /// # Errors
    /// Same as [`MtlFile::save`]; the associated path is only updated on success.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.save(Some(&path))?;
        self.path = Some(path);
        Ok(())
    }

    /// Render the library as MTL text
    pub fn to_text(&self) -> String {
        MtlWriter::new(self.config.write).to_string(&self.materials)
    }

    /// Path used by `save(None)`
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the path used by `save(None)`
    pub fn set_path(&mut self, path: Option<PathBuf>) {
        self.path = path;
    }

    /// Codec settings used for saving
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Materials in this library
    pub const fn materials(&self) -> &MaterialCollection {
        &self.materials
    }

    /// Mutable access to the materials
    pub fn materials_mut(&mut self) -> &mut MaterialCollection {
        &mut self.materials
    }

    /// Take the materials, dropping the path association
    pub fn into_materials(self) -> MaterialCollection {
        self.materials
    }
}
