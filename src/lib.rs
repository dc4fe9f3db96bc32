//! Tree species identification from field measurements, backed by an ONNX classifier.
//!
//! The classifier maps four numeric observations (latitude, longitude, trunk
//! diameter in cm, height in m) to a probability distribution over tree
//! species, and resolves class indices to human-readable names through a
//! species mapping built offline from a labeled survey dataset.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use dendro::{FeatureVector, SpeciesClassifier, SpeciesMapping};
//!
//! let mapping = SpeciesMapping::load(Path::new("species_mapping.json"))?;
//! let classifier = SpeciesClassifier::builder()
//!     .with_model_file(Path::new("tree_species_model.onnx"))?
//!     .with_mapping(mapping)
//!     .build()?;
//!
//! let features = FeatureVector::new(35.0, -106.0, 20.0, 10.0)?;
//! let prediction = classifier.predict(&features)?;
//! println!(
//!     "{} ({}): {:.2}%",
//!     prediction.common_name, prediction.scientific_name, prediction.confidence_pct
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The model and mapping are loaded once and held read-only; every prediction
//! is a pure function of the four inputs and that loaded state.

pub mod classifier;
pub mod inspector;
mod runtime;

pub use classifier::{
    build_mapping, ClassifierError, ClassifierInfo, FeatureVector, Prediction, RankedEntry,
    SpeciesClassifier, SpeciesClassifierBuilder, SpeciesLabel, SpeciesMapping, SpeciesModel,
    SpeciesRecord,
};
pub use inspector::{inspect_model, ModelReport, SampleOutcome, SampleRun, TensorSpec};
pub use runtime::{create_session_builder, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}
