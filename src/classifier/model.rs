use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::info;
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;

use super::error::ClassifierError;
use super::features::FeatureVector;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// The loaded species classifier artifact: an ONNX session plus the shape
/// information read from its graph at load time.
///
/// The model is opaque; this type only knows its contract: a single
/// `[batch, features]` float input and a `[batch, classes]` probability
/// output. The output class count is read from the graph, never hardcoded.
#[derive(Debug)]
pub struct SpeciesModel {
    model_path: String,
    session: Arc<Session>,
    input_name: String,
    num_features: Option<usize>,
    num_classes: usize,
}

impl SpeciesModel {
    /// Loads the model artifact and reads its declared shapes.
    ///
    /// # Errors
    /// - `Model` if the file is missing or ONNX Runtime rejects it
    /// - `Model` if the graph has no input or output tensors
    /// - `Model` if the output class count is not declared in the graph
    pub fn load(path: &Path, config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::Model(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let session = create_session_builder(config)?.commit_from_file(path)?;

        if session.inputs.is_empty() {
            return Err(ClassifierError::Model(
                "Model must have at least 1 input tensor".to_string(),
            ));
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::Model(
                "Model must have at least 1 output tensor".to_string(),
            ));
        }

        let input_name = session.inputs[0].name.clone();
        let input_dims = session.inputs[0]
            .input_type
            .tensor_dimensions()
            .ok_or_else(|| {
                ClassifierError::Model("Model input is not a tensor".to_string())
            })?;
        let num_features = concrete_dim(input_dims, 1);

        let output_dims = session.outputs[0]
            .output_type
            .tensor_dimensions()
            .ok_or_else(|| {
                ClassifierError::Model("Model output is not a tensor".to_string())
            })?;
        let num_classes = concrete_dim(output_dims, 1).ok_or_else(|| {
            ClassifierError::Model(
                "Model output class count is not declared in the graph".to_string(),
            )
        })?;

        info!(
            "Model loaded: {} ({} features -> {} classes)",
            path.display(),
            num_features.map_or_else(|| "?".to_string(), |n| n.to_string()),
            num_classes
        );

        Ok(Self {
            model_path: path.display().to_string(),
            session: Arc::new(session),
            input_name,
            num_features,
            num_classes,
        })
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Declared input feature count, `None` when the graph leaves it unbound.
    pub fn num_features(&self) -> Option<usize> {
        self.num_features
    }

    /// Output class count, read from the graph at load time.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Runs one forward pass and returns the probability vector for the
    /// single observation in the batch.
    ///
    /// # Errors
    /// Any failure here is a `Prediction` error: it spoils the attempt but
    /// never the session.
    pub fn predict(&self, features: &FeatureVector) -> Result<Vec<f32>, ClassifierError> {
        if let Some(expected) = self.num_features {
            if expected != 4 {
                return Err(ClassifierError::Prediction(format!(
                    "Model expects {} input features, but observations carry 4",
                    expected
                )));
            }
        }

        let input_array = Array2::from_shape_vec((1, 4), features.as_array().to_vec())
            .map_err(|e| {
                ClassifierError::Prediction(format!("Failed to create input array: {}", e))
            })?;
        let input_dyn = input_array.into_dyn();
        let input_values = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(&input_values).map_err(|e| {
                ClassifierError::Prediction(format!("Failed to create input tensor: {}", e))
            })?,
        );

        let outputs = self.session.run(input_tensors).map_err(|e| {
            ClassifierError::Prediction(format!("Failed to run model: {}", e))
        })?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::Prediction(format!("Failed to extract output tensor: {}", e))
        })?;

        if output_tensor.ndim() != 2 {
            return Err(ClassifierError::Prediction(format!(
                "Expected a [batch, classes] output, got rank {}",
                output_tensor.ndim()
            )));
        }
        let probabilities: Vec<f32> = output_tensor
            .slice(ndarray::s![0, ..])
            .iter()
            .copied()
            .collect();
        if probabilities.is_empty() {
            return Err(ClassifierError::Prediction(
                "Model returned an empty probability vector".to_string(),
            ));
        }
        Ok(probabilities)
    }
}

/// Resolves one axis of a declared tensor shape to a concrete size.
/// Dynamic dimensions (negative or zero in the ONNX graph) come back as `None`.
pub(crate) fn concrete_dim(dims: &[i64], axis: usize) -> Option<usize> {
    dims.get(axis)
        .and_then(|&d| usize::try_from(d).ok())
        .filter(|&d| d > 0)
}
