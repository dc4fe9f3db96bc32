//! Offline mapping builder: aggregates the labeled survey dataset into the
//! class-index-to-species table the predictor resolves labels through.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;

use log::info;

use super::error::ClassifierError;
use super::mapping::{SpeciesMapping, SpeciesRecord};

const COMMON_NAME_COLUMN: &str = "common_name";
const SCIENTIFIC_NAME_COLUMN: &str = "scientific_name";

struct ClassStats {
    count: u64,
    first_seen: usize,
    scientific_name: Option<String>,
}

/// Builds the species mapping from a CSV dataset.
///
/// Classes are ordered by descending row count, ties broken by first
/// encounter in the dataset, and assigned sequential IDs from 0. This
/// ordering must match whatever ordering the classifier's training pipeline
/// used; the builder cannot verify that on its own, so the predictor
/// cross-checks class counts at load time instead.
///
/// The scientific name for a class is the first non-empty value seen for it;
/// a class with no scientific name anywhere in the dataset gets `"Unknown"`.
/// Rows with an empty common name are skipped.
pub fn build_mapping(dataset: &Path) -> Result<SpeciesMapping, ClassifierError> {
    let mut reader = csv::Reader::from_path(dataset).map_err(|e| {
        ClassifierError::Data(format!("Failed to read {}: {}", dataset.display(), e))
    })?;

    let headers = reader
        .headers()
        .map_err(|e| ClassifierError::Data(format!("Failed to read headers: {}", e)))?
        .clone();
    let name_idx = column_index(&headers, COMMON_NAME_COLUMN)?;
    let scientific_idx = column_index(&headers, SCIENTIFIC_NAME_COLUMN)?;

    let mut stats: HashMap<String, ClassStats> = HashMap::new();
    for (row, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| ClassifierError::Data(format!("Row {}: {}", row + 2, e)))?;
        let name = record.get(name_idx).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let scientific = record.get(scientific_idx).unwrap_or("").trim();

        let entry = stats.entry(name.to_string()).or_insert_with(|| ClassStats {
            count: 0,
            first_seen: row,
            scientific_name: None,
        });
        entry.count += 1;
        if entry.scientific_name.is_none() && !scientific.is_empty() {
            entry.scientific_name = Some(scientific.to_string());
        }
    }

    if stats.is_empty() {
        return Err(ClassifierError::Data(format!(
            "{} contains no labeled rows",
            dataset.display()
        )));
    }

    let mut classes: Vec<(String, ClassStats)> = stats.into_iter().collect();
    classes.sort_by(|a, b| {
        b.1.count
            .cmp(&a.1.count)
            .then(a.1.first_seen.cmp(&b.1.first_seen))
    });

    let entries: BTreeMap<u32, SpeciesRecord> = classes
        .into_iter()
        .enumerate()
        .map(|(id, (name, class))| {
            (
                id as u32,
                SpeciesRecord {
                    name,
                    scientific_name: class
                        .scientific_name
                        .unwrap_or_else(|| "Unknown".to_string()),
                    count: class.count,
                },
            )
        })
        .collect();

    info!("Created mapping for {} species", entries.len());
    Ok(SpeciesMapping::from_entries(entries))
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize, ClassifierError> {
    headers.iter().position(|h| h == column).ok_or_else(|| {
        ClassifierError::Data(format!("Dataset is missing required column: {}", column))
    })
}
