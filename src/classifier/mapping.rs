use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ClassifierError;

/// One persisted mapping entry: the human-readable names for a class index,
/// plus how many dataset rows carried that label when the mapping was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    pub scientific_name: String,
    pub count: u64,
}

/// A resolved label for one class index.
///
/// Produced by [`SpeciesMapping::resolve`], which is total: indices absent
/// from the mapping get the synthetic `"Species {id}"` / `"Unknown"` label
/// instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesLabel {
    pub species_id: usize,
    pub common_name: String,
    pub scientific_name: String,
}

/// The class-index-to-species lookup, built offline from the survey dataset
/// and loaded read-only for the process lifetime.
///
/// Persisted as a JSON object keyed by string-encoded integer ID, e.g.
/// `{"0": {"name": "...", "scientific_name": "...", "count": 123}}`.
/// `BTreeMap` keeps serialization deterministic: rebuilding from an unchanged
/// dataset writes byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesMapping {
    entries: BTreeMap<u32, SpeciesRecord>,
}

impl SpeciesMapping {
    /// A mapping with no entries; every index resolves to the synthetic label.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<u32, SpeciesRecord>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let file = File::open(path).map_err(|e| {
            ClassifierError::Mapping(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let entries = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ClassifierError::Mapping(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Self { entries })
    }

    /// Writes the mapping, overwriting any existing file at `path`.
    pub fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        let file = File::create(path).map_err(|e| {
            ClassifierError::Mapping(format!("Failed to create {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.entries).map_err(|e| {
            ClassifierError::Mapping(format!("Failed to write {}: {}", path.display(), e))
        })?;
        writer.flush().map_err(|e| {
            ClassifierError::Mapping(format!("Failed to write {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, species_id: usize) -> Option<&SpeciesRecord> {
        u32::try_from(species_id)
            .ok()
            .and_then(|id| self.entries.get(&id))
    }

    /// Resolves a class index to its display names. Total over all indices.
    pub fn resolve(&self, species_id: usize) -> SpeciesLabel {
        match self.get(species_id) {
            Some(record) => SpeciesLabel {
                species_id,
                common_name: record.name.clone(),
                scientific_name: record.scientific_name.clone(),
            },
            None => SpeciesLabel {
                species_id,
                common_name: format!("Species {}", species_id),
                scientific_name: "Unknown".to_string(),
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &SpeciesRecord)> {
        self.entries.iter().map(|(&id, record)| (id as usize, record))
    }
}
