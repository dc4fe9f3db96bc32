use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};

use dendro::{
    build_mapping, FeatureVector, ModelReport, RuntimeConfig, SampleOutcome, SpeciesClassifier,
    SpeciesMapping,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict tree species from field measurements
    Predict {
        /// Path to the ONNX model artifact
        #[arg(long, default_value = "tree_species_model.onnx")]
        model: PathBuf,

        /// Path to the species mapping file
        #[arg(long, default_value = "species_mapping.json")]
        mapping: PathBuf,

        /// Latitude of the observation
        #[arg(long)]
        latitude: Option<f32>,

        /// Longitude of the observation
        #[arg(long)]
        longitude: Option<f32>,

        /// Trunk diameter at breast height, in centimeters
        #[arg(long)]
        diameter: Option<f32>,

        /// Tree height, in meters
        #[arg(long)]
        height: Option<f32>,
    },

    /// Print diagnostic information about a model artifact
    Inspect {
        /// Path to the ONNX model artifact
        #[arg(long, default_value = "tree_species_model.onnx")]
        model: PathBuf,
    },

    /// Build the species mapping file from a labeled dataset
    BuildMapping {
        /// Path to the survey dataset (CSV with common_name and scientific_name columns)
        #[arg(long, default_value = "tree_species_dataset.csv")]
        dataset: PathBuf,

        /// Where to write the mapping (overwritten if present)
        #[arg(long, default_value = "species_mapping.json")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Predict {
            model,
            mapping,
            latitude,
            longitude,
            diameter,
            height,
        } => run_predict(model, mapping, latitude, longitude, diameter, height),
        Command::Inspect { model } => run_inspect(model),
        Command::BuildMapping { dataset, output } => run_build_mapping(dataset, output),
    }
}

fn run_predict(
    model_path: PathBuf,
    mapping_path: PathBuf,
    latitude: Option<f32>,
    longitude: Option<f32>,
    diameter: Option<f32>,
    height: Option<f32>,
) -> anyhow::Result<()> {
    let builder = SpeciesClassifier::builder()
        .with_model_file(&model_path)
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;
    info!("Model loaded successfully");

    // Mapping failures degrade to ID-only labels; only a model failure is fatal.
    let mapping = match SpeciesMapping::load(&mapping_path) {
        Ok(mapping) => {
            info!("Species mapping loaded ({} species)", mapping.len());
            mapping
        }
        Err(e) => {
            warn!("Species mapping not found, will show IDs only: {}", e);
            SpeciesMapping::empty()
        }
    };

    let classifier = builder.with_mapping(mapping).build()?;

    match (latitude, longitude, diameter, height) {
        (Some(latitude), Some(longitude), Some(diameter), Some(height)) => {
            predict_once(&classifier, latitude, longitude, diameter, height);
            Ok(())
        }
        (None, None, None, None) => run_interactive(&classifier),
        _ => anyhow::bail!(
            "Either pass all of --latitude, --longitude, --diameter and --height, or none for interactive mode"
        ),
    }
}

/// One prediction attempt. Failures are reported and swallowed so the
/// session stays usable.
fn predict_once(
    classifier: &SpeciesClassifier,
    latitude: f32,
    longitude: f32,
    diameter: f32,
    height: f32,
) {
    let features = match FeatureVector::new(latitude, longitude, diameter, height) {
        Ok(features) => features,
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            return;
        }
    };

    match classifier.predict(&features) {
        Ok(prediction) => {
            println!();
            println!(
                "Predicted tree species: {} ({})",
                prediction.common_name, prediction.scientific_name
            );
            println!("Confidence: {:.2}%", prediction.confidence_pct);
            println!();
            println!("Top {} predictions:", prediction.ranked.len());
            println!(
                "  {:>4}  {:<28} {:<30} {:>11}",
                "ID", "Common name", "Scientific name", "Probability"
            );
            for entry in &prediction.ranked {
                println!(
                    "  {:>4}  {:<28} {:<30} {:>10.2}%",
                    entry.species_id,
                    entry.common_name,
                    entry.scientific_name,
                    entry.probability_pct
                );
            }
            println!();
            println!("Input used for prediction:");
            println!("  {}", prediction.features);
        }
        Err(e) => {
            eprintln!("Prediction failed: {}", e);
        }
    }
}

/// Prompt loop: four values per round, defaults from the original survey
/// form, `q` or end-of-input to quit.
fn run_interactive(classifier: &SpeciesClassifier) -> anyhow::Result<()> {
    let info = classifier.info();
    println!("Tree Intelligence Assistant");
    println!(
        "Model expects {} numerical features, {} output classes ({} mapped to names)",
        info.num_features
            .map_or_else(|| "?".to_string(), |n| n.to_string()),
        info.num_classes,
        info.mapped_species
    );
    println!("Press Enter to accept a default value, or q to quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!();
        let latitude = match prompt(&mut lines, "Latitude", 35.0)? {
            Some(value) => value,
            None => break,
        };
        let longitude = match prompt(&mut lines, "Longitude", -106.0)? {
            Some(value) => value,
            None => break,
        };
        let diameter = match prompt(&mut lines, "Diameter (cm)", 20.0)? {
            Some(value) => value,
            None => break,
        };
        let height = match prompt(&mut lines, "Height (m)", 10.0)? {
            Some(value) => value,
            None => break,
        };

        predict_once(classifier, latitude, longitude, diameter, height);
    }

    Ok(())
}

/// Reads one numeric value. `Ok(None)` means the user quit.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
    default: f32,
) -> anyhow::Result<Option<f32>> {
    loop {
        print!("{} [{}]: ", label, default);
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(None),
        };
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        if trimmed.is_empty() {
            return Ok(Some(default));
        }
        match trimmed.parse::<f32>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => eprintln!("Not a number: {}", trimmed),
        }
    }
}

fn run_inspect(model_path: PathBuf) -> anyhow::Result<()> {
    let report = dendro::inspect_model(&model_path, &RuntimeConfig::default())
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;
    render_report(&report);
    Ok(())
}

fn render_report(report: &ModelReport) {
    println!("=== MODEL ANALYSIS ===");
    println!("Model: {}", report.model_path);
    println!("Graph inputs: {}", report.inputs.len());
    for spec in &report.inputs {
        println!("  {}: {:?}", spec.name, spec.dimensions);
    }
    println!("Graph outputs: {}", report.outputs.len());
    for spec in &report.outputs {
        println!("  {}: {:?}", spec.name, spec.dimensions);
    }
    match report.declared_features {
        Some(n) => println!("Input feature count: {}", n),
        None => println!("Input feature count: not declared"),
    }
    match report.declared_classes {
        Some(n) => println!("Output class count: {}", n),
        None => println!("Output class count: not declared"),
    }

    println!();
    println!("=== TEST PREDICTION ===");
    match &report.sample {
        SampleOutcome::Completed(run) => {
            println!("Test prediction shape: {:?}", run.output_shape);
            println!("Sample prediction: {:?}...", run.leading_values);
        }
        SampleOutcome::SkippedUnboundInput => {
            println!("Input shape is not fully defined, skipping test prediction");
        }
        SampleOutcome::Failed(reason) => {
            println!("Test prediction failed: {}", reason);
        }
    }
}

fn run_build_mapping(dataset: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let mapping = build_mapping(&dataset)
        .with_context(|| format!("Failed to build mapping from {}", dataset.display()))?;
    mapping
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Species mapping for {} species saved to {}",
        mapping.len(),
        output.display()
    );

    println!();
    println!("Sample species mapping:");
    for (id, record) in mapping.iter().take(10) {
        println!(
            "ID {}: {} ({}) - {} trees",
            id, record.name, record.scientific_name, record.count
        );
    }
    Ok(())
}
