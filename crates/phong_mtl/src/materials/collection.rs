//! Name-keyed material storage
//!
//! Materials live in a slot map so a [`MaterialHandle`] stays valid while
//! other entries are added. A sorted name index gives lookup by name and a
//! deterministic, alphabetical iteration order.
//!
//! Names are checked on insert: they must be non-empty, free of whitespace
//! and within the collection's length limit, which is exactly what a
//! `newmtl` line can carry.

use std::collections::BTreeMap;

use slotmap::new_key_type;

use super::phong::Material;
use crate::foundation::collections::HandleMap;
use crate::{MtlError, Result};

/// Longest material name accepted by default, in bytes
pub const DEFAULT_MAX_NAME_LEN: usize = 255;

new_key_type! {
    /// Stable reference to a material inside one [`MaterialCollection`]
    ///
    /// A handle from one collection must not be used with another. Handles
    /// to removed materials resolve to `None`.
    pub struct MaterialHandle;
}

/// Slot contents; the name is kept next to the material for handle lookups
#[derive(Debug, Clone)]
struct Entry {
    name: String,
    material: Material,
}

/// Collection of materials keyed by unique name
#[derive(Debug, Clone)]
pub struct MaterialCollection {
    /// Material storage
    materials: HandleMap<MaterialHandle, Entry>,
    /// Sorted name -> handle index
    names: BTreeMap<String, MaterialHandle>,
    /// Longest accepted name in bytes, `None` for no limit
    max_name_len: Option<usize>,
}

impl Default for MaterialCollection {
    fn default() -> Self {
        Self::with_name_limit(Some(DEFAULT_MAX_NAME_LEN))
    }
}

impl MaterialCollection {
    /// Create an empty collection accepting names up to [`DEFAULT_MAX_NAME_LEN`] bytes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection with a custom name length limit
    pub fn with_name_limit(max_name_len: Option<usize>) -> Self {
        Self {
            materials: HandleMap::with_key(),
            names: BTreeMap::new(),
            max_name_len,
        }
    }

    /// Longest accepted name in bytes
    pub const fn name_limit(&self) -> Option<usize> {
        self.max_name_len
    }

    /// Check that `name` can be stored and written as a `newmtl` line
    ///
    /// # Errors
    /// [`MtlError::InvalidInput`] if the name is empty, contains whitespace
    /// or is longer than the collection's limit.
    pub fn validate_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(MtlError::InvalidInput("material name is empty".to_string()));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(MtlError::InvalidInput(format!(
                "material name {name:?} contains whitespace"
            )));
        }
        if let Some(max) = self.max_name_len {
            if name.len() > max {
                return Err(MtlError::InvalidInput(format!(
                    "material name is {} bytes, limit is {max}",
                    name.len()
                )));
            }
        }
        Ok(())
    }

    /// Insert a material unless the name is already taken
    ///
    /// Never overwrites: for an existing name the existing handle is
    /// returned together with `false` and `material` is dropped.
    ///
    /// # Errors
    /// [`MtlError::InvalidInput`] if the name fails [`MaterialCollection::validate_name`].
    pub fn insert(&mut self, name: impl Into<String>, material: Material) -> Result<(MaterialHandle, bool)> {
        let name = name.into();
        if let Some(&handle) = self.names.get(&name) {
            return Ok((handle, false));
        }
        self.validate_name(&name)?;

        let handle = self.materials.insert(Entry {
            name: name.clone(),
            material,
        });
        self.names.insert(name, handle);
        Ok((handle, true))
    }

    /// Handle of the named material, if present
    pub fn find(&self, name: &str) -> Option<MaterialHandle> {
        self.names.get(name).copied()
    }

    /// Whether a material with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Material behind a handle
    pub fn get(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle).map(|entry| &entry.material)
    }

    /// Mutable material behind a handle
    pub fn get_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle).map(|entry| &mut entry.material)
    }

    /// Named material, failing with [`MtlError::NotFound`] when absent
    pub fn at(&self, name: &str) -> Result<&Material> {
        self.find(name)
            .and_then(|handle| self.get(handle))
            .ok_or_else(|| MtlError::NotFound(name.to_string()))
    }

    /// Mutable named material, failing with [`MtlError::NotFound`] when absent
    pub fn at_mut(&mut self, name: &str) -> Result<&mut Material> {
        match self.names.get(name) {
            Some(&handle) => self
                .materials
                .get_mut(handle)
                .map(|entry| &mut entry.material)
                .ok_or_else(|| MtlError::NotFound(name.to_string())),
            None => Err(MtlError::NotFound(name.to_string())),
        }
    }

    /// Name of the material behind a handle
    pub fn name_of(&self, handle: MaterialHandle) -> Option<&str> {
        self.materials.get(handle).map(|entry| entry.name.as_str())
    }

    /// Remove a material by name
    pub fn remove(&mut self, name: &str) -> Option<Material> {
        let handle = self.names.remove(name)?;
        self.materials.remove(handle).map(|entry| entry.material)
    }

    /// Remove all materials
    pub fn clear(&mut self) {
        self.names.clear();
        self.materials.clear();
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Material names in iteration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.keys().map(String::as_str)
    }

    /// Iterate `(name, material)` pairs in name order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            names: self.names.iter(),
            materials: &self.materials,
        }
    }

    /// Iterate `(name, material)` pairs in name order with mutable materials
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Material)> + '_ {
        // Slot order differs from name order
        let mut ordered: Vec<(&str, &mut Material)> = self
            .materials
            .values_mut()
            .map(|Entry { name, material }| (name.as_str(), material))
            .collect();
        ordered.sort_unstable_by(|a, b| a.0.cmp(b.0));
        ordered.into_iter()
    }
}

/// Iterator over `(name, material)` pairs of a [`MaterialCollection`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    names: std::collections::btree_map::Iter<'a, String, MaterialHandle>,
    materials: &'a HandleMap<MaterialHandle, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Material);

    fn next(&mut self) -> Option<Self::Item> {
        let (name, &handle) = self.names.next()?;
        // Index and storage are updated together, so every indexed handle resolves
        self.materials.get(handle).map(|entry| (name.as_str(), &entry.material))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.names.size_hint().1)
    }
}

impl<'a> IntoIterator for &'a MaterialCollection {
    type Item = (&'a str, &'a Material);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Equal when both hold the same names mapped to equal materials
///
/// The name limit is a setting, not content, and is not compared.
impl PartialEq for MaterialCollection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}
