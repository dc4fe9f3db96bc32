use std::fs;
use std::path::PathBuf;

use dendro::{build_mapping, ClassifierError, SpeciesMapping};

fn write_dataset(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("tree_species_dataset.csv");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_frequency_ordering_and_unknown_scientific_name() {
    let dir = tempfile::tempdir().unwrap();
    // B: 5 rows, scientific name always missing. A: 3 rows with "Sa".
    let path = write_dataset(
        &dir,
        "common_name,scientific_name\n\
         A,Sa\nB,\nA,Sa\nB,\nB,\nA,Sa\nB,\nB,\n",
    );

    let mapping = build_mapping(&path).unwrap();
    let b = mapping.get(0).unwrap();
    assert_eq!(b.name, "B");
    assert_eq!(b.count, 5);
    assert_eq!(b.scientific_name, "Unknown");

    let a = mapping.get(1).unwrap();
    assert_eq!(a.name, "A");
    assert_eq!(a.count, 3);
    assert_eq!(a.scientific_name, "Sa");
}

#[test]
fn test_build_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(
        &dir,
        "common_name,scientific_name\n\
         Gambel Oak,Quercus gambelii\nPinyon Pine,Pinus edulis\nPinyon Pine,Pinus edulis\n",
    );
    let output = dir.path().join("species_mapping.json");

    let built = build_mapping(&dataset).unwrap();
    built.save(&output).unwrap();
    let loaded = SpeciesMapping::load(&output).unwrap();

    assert_eq!(loaded, built);
    assert_eq!(loaded.resolve(0).common_name, "Pinyon Pine");
    assert_eq!(loaded.resolve(1).common_name, "Gambel Oak");
}

#[test]
fn test_rebuild_writes_identical_file() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(
        &dir,
        "common_name,scientific_name\n\
         Elm,Ulmus\nAsh,Fraxinus\nElm,Ulmus\nFir,\nAsh,Fraxinus\nElm,\n",
    );
    let output = dir.path().join("species_mapping.json");

    build_mapping(&dataset).unwrap().save(&output).unwrap();
    let first = fs::read(&output).unwrap();

    // save() overwrites the existing file
    build_mapping(&dataset).unwrap().save(&output).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_required_column_is_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(&dir, "species,scientific_name\nOak,Quercus\n");
    let result = build_mapping(&path);
    assert!(matches!(result, Err(ClassifierError::Data(_))));
}

#[test]
fn test_unreadable_dataset_is_data_error() {
    let result = build_mapping(std::path::Path::new("/nonexistent/tree_species_dataset.csv"));
    assert!(matches!(result, Err(ClassifierError::Data(_))));
}

#[test]
fn test_ids_are_dense_from_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(
        &dir,
        "common_name,scientific_name\n\
         A,Sa\nB,Sb\nC,Sc\nD,Sd\nB,Sb\nC,Sc\nC,Sc\n",
    );
    let mapping = build_mapping(&path).unwrap();
    assert_eq!(mapping.len(), 4);
    for id in 0..4 {
        assert!(mapping.get(id).is_some(), "missing id {}", id);
    }
    assert!(mapping.get(4).is_none());
}
