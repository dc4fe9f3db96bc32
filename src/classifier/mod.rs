pub mod dataset;
mod error;
mod features;
mod mapping;
mod model;
pub mod ranking;
mod species;

pub use dataset::build_mapping;
pub use error::ClassifierError;
pub use features::FeatureVector;
pub use mapping::{SpeciesLabel, SpeciesMapping, SpeciesRecord};
pub use model::SpeciesModel;
pub(crate) use model::concrete_dim;
pub use species::{
    ClassifierInfo, Prediction, RankedEntry, SpeciesClassifier, SpeciesClassifierBuilder, TOP_K,
};
