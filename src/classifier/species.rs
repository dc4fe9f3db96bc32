use std::path::Path;

use log::warn;

use super::error::ClassifierError;
use super::features::FeatureVector;
use super::mapping::SpeciesMapping;
use super::model::SpeciesModel;
use super::ranking;
use crate::runtime::RuntimeConfig;

/// How many ranked classes a prediction retains for display.
pub const TOP_K: usize = 10;

/// Information about the classifier's loaded state.
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Declared input feature count, if the graph declares one
    pub num_features: Option<usize>,
    /// Output class count, read from the graph
    pub num_classes: usize,
    /// Number of species the loaded mapping can name
    pub mapped_species: usize,
}

/// One row of the ranked probability table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub species_id: usize,
    pub common_name: String,
    pub scientific_name: String,
    pub probability_pct: f32,
}

/// The result of one prediction: the winning species, its confidence, and
/// the top-ranked classes. Derived entirely from one probability vector and
/// the loaded mapping; nothing here outlives the request that produced it.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub species_id: usize,
    pub common_name: String,
    pub scientific_name: String,
    /// `max(probabilities) * 100`, in `[0, 100]` for softmax output
    pub confidence_pct: f32,
    /// Descending by probability, ties by ascending index, at most [`TOP_K`] rows
    pub ranked: Vec<RankedEntry>,
    /// The inputs this prediction was made from
    pub features: FeatureVector,
}

impl Prediction {
    /// Derives a full prediction from a raw probability vector.
    ///
    /// This is the whole post-processing step: argmax with first-index
    /// tie-break, confidence as a percentage, and the stable top-K ranking
    /// with every index resolved through the mapping.
    pub fn from_probabilities(
        probabilities: &[f32],
        mapping: &SpeciesMapping,
        features: FeatureVector,
    ) -> Result<Self, ClassifierError> {
        let species_id = ranking::argmax(probabilities).ok_or_else(|| {
            ClassifierError::Prediction("Model returned an empty probability vector".to_string())
        })?;
        let confidence_pct = probabilities[species_id] * 100.0;

        let ranked = ranking::rank_top_k(probabilities, TOP_K)
            .into_iter()
            .map(|(id, probability)| {
                let label = mapping.resolve(id);
                RankedEntry {
                    species_id: id,
                    common_name: label.common_name,
                    scientific_name: label.scientific_name,
                    probability_pct: probability * 100.0,
                }
            })
            .collect();

        let label = mapping.resolve(species_id);
        Ok(Self {
            species_id,
            common_name: label.common_name,
            scientific_name: label.scientific_name,
            confidence_pct,
            ranked,
            features,
        })
    }
}

/// The session context for interactive prediction: one loaded model and one
/// loaded mapping, both immutable for the process lifetime.
#[derive(Debug)]
pub struct SpeciesClassifier {
    model: SpeciesModel,
    mapping: SpeciesMapping,
}

impl SpeciesClassifier {
    /// Creates a new builder for fluent construction.
    pub fn builder() -> SpeciesClassifierBuilder {
        SpeciesClassifierBuilder::new()
    }

    /// Returns information about the classifier's loaded state.
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            model_path: self.model.model_path().to_string(),
            num_features: self.model.num_features(),
            num_classes: self.model.num_classes(),
            mapped_species: self.mapping.len(),
        }
    }

    /// Predicts the species for one observation.
    ///
    /// # Errors
    /// `Prediction` if the inference call fails for any reason; the
    /// classifier itself stays usable for subsequent attempts.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        let probabilities = self.model.predict(features)?;
        Prediction::from_probabilities(&probabilities, &self.mapping, features.clone())
    }
}

/// A builder for constructing a [`SpeciesClassifier`] with a fluent interface.
///
/// The model is mandatory and load failures are fatal; the mapping is
/// optional and defaults to the empty mapping, which degrades labels to
/// `"Species {id}"`.
#[derive(Debug, Default)]
pub struct SpeciesClassifierBuilder {
    model: Option<SpeciesModel>,
    mapping: Option<SpeciesMapping>,
    runtime_config: RuntimeConfig,
}

impl SpeciesClassifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration for ONNX session construction.
    /// Must be called before [`with_model_file`](Self::with_model_file).
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads the model artifact.
    ///
    /// # Errors
    /// `Model` if a model is already set or the artifact fails to load.
    pub fn with_model_file(mut self, path: &Path) -> Result<Self, ClassifierError> {
        if self.model.is_some() {
            return Err(ClassifierError::Model("Model already set".to_string()));
        }
        self.model = Some(SpeciesModel::load(path, &self.runtime_config)?);
        Ok(self)
    }

    /// Sets the species mapping to resolve class indices through.
    pub fn with_mapping(mut self, mapping: SpeciesMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Builds the classifier.
    ///
    /// A non-empty mapping whose class count disagrees with the model's
    /// declared output count is accepted with a warning: IDs still resolve,
    /// but the names may be systematically misaligned with the training
    /// pipeline's ordering.
    ///
    /// # Errors
    /// `Model` if no model file was set.
    pub fn build(self) -> Result<SpeciesClassifier, ClassifierError> {
        let model = self
            .model
            .ok_or_else(|| ClassifierError::Model("A model file must be set".to_string()))?;
        let mapping = self.mapping.unwrap_or_else(SpeciesMapping::empty);

        if !mapping.is_empty() && mapping.len() != model.num_classes() {
            warn!(
                "Species mapping covers {} classes but the model declares {}; labels may be misaligned",
                mapping.len(),
                model.num_classes()
            );
        }

        Ok(SpeciesClassifier { model, mapping })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::mapping::SpeciesRecord;
    use std::collections::BTreeMap;

    fn mapping_with(id: u32, name: &str, scientific: &str) -> SpeciesMapping {
        let mut entries = BTreeMap::new();
        entries.insert(
            id,
            SpeciesRecord {
                name: name.to_string(),
                scientific_name: scientific.to_string(),
                count: 1,
            },
        );
        SpeciesMapping::from_entries(entries)
    }

    #[test]
    fn test_prediction_resolves_winner() {
        let mut probs = vec![0.01; 96];
        probs[7] = 0.42;
        let features = FeatureVector::new(35.0, -106.0, 20.0, 10.0).unwrap();
        let prediction = Prediction::from_probabilities(
            &probs,
            &mapping_with(7, "Pinyon Pine", "Pinus edulis"),
            features,
        )
        .unwrap();

        assert_eq!(prediction.species_id, 7);
        assert_eq!(prediction.common_name, "Pinyon Pine");
        assert_eq!(prediction.scientific_name, "Pinus edulis");
        assert!((prediction.confidence_pct - 42.0).abs() < 1e-4);
        assert_eq!(prediction.ranked[0].species_id, 7);
    }

    #[test]
    fn test_prediction_empty_probabilities() {
        let features = FeatureVector::new(0.0, 0.0, 0.0, 0.0).unwrap();
        let result = Prediction::from_probabilities(&[], &SpeciesMapping::empty(), features);
        assert!(matches!(result, Err(ClassifierError::Prediction(_))));
    }

    #[test]
    fn test_build_without_model_fails() {
        let result = SpeciesClassifier::builder()
            .with_mapping(SpeciesMapping::empty())
            .build();
        assert!(matches!(result, Err(ClassifierError::Model(_))));
    }
}
