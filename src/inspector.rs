//! Diagnostic inspection of a model artifact: declared shapes plus one
//! sanity forward pass on random input. Purely descriptive; the interactive
//! predictor never depends on anything here.

use std::collections::HashMap;
use std::path::Path;

use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use rand::Rng;

use crate::classifier::ClassifierError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// How many leading output values the sample run reports.
const SAMPLE_VALUES: usize = 5;

/// One graph tensor: its name and declared dimensions as they appear in the
/// ONNX graph (dynamic dimensions are negative).
#[derive(Debug, Clone)]
pub struct TensorSpec {
    pub name: String,
    pub dimensions: Vec<i64>,
}

/// The result of the sanity forward pass.
#[derive(Debug, Clone)]
pub struct SampleRun {
    pub output_shape: Vec<usize>,
    pub leading_values: Vec<f32>,
}

/// Whether the sanity forward pass ran, and why not if it didn't.
/// A skipped or failed pass is diagnostic output, never a fatal error.
#[derive(Debug, Clone)]
pub enum SampleOutcome {
    Completed(SampleRun),
    /// The graph leaves the input feature width unbound, so no synthetic
    /// input can be shaped for it.
    SkippedUnboundInput,
    Failed(String),
}

/// Everything the inspector reports about one model artifact.
#[derive(Debug, Clone)]
pub struct ModelReport {
    pub model_path: String,
    pub inputs: Vec<TensorSpec>,
    pub outputs: Vec<TensorSpec>,
    /// Input feature count, when the graph declares it
    pub declared_features: Option<usize>,
    /// Output class count, when the graph declares it
    pub declared_classes: Option<usize>,
    pub sample: SampleOutcome,
}

/// Loads the artifact and builds its diagnostic report.
///
/// # Errors
/// `Model` if the artifact is missing or corrupt. Shape problems and sample
/// failures are reported inside the [`ModelReport`] instead of failing.
pub fn inspect_model(path: &Path, config: &RuntimeConfig) -> Result<ModelReport, ClassifierError> {
    if !path.exists() {
        return Err(ClassifierError::Model(format!(
            "Model file not found: {}",
            path.display()
        )));
    }
    let session = create_session_builder(config)?.commit_from_file(path)?;

    let inputs: Vec<TensorSpec> = session
        .inputs
        .iter()
        .map(|input| TensorSpec {
            name: input.name.clone(),
            dimensions: input
                .input_type
                .tensor_dimensions()
                .cloned()
                .unwrap_or_default(),
        })
        .collect();
    let outputs: Vec<TensorSpec> = session
        .outputs
        .iter()
        .map(|output| TensorSpec {
            name: output.name.clone(),
            dimensions: output
                .output_type
                .tensor_dimensions()
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    let declared_features = inputs
        .first()
        .and_then(|spec| crate::classifier::concrete_dim(&spec.dimensions, 1));
    let declared_classes = outputs
        .first()
        .and_then(|spec| crate::classifier::concrete_dim(&spec.dimensions, 1));

    let sample = match (inputs.first(), declared_features) {
        (Some(input), Some(num_features)) => {
            match run_sample(&session, &input.name, num_features) {
                Ok(run) => SampleOutcome::Completed(run),
                Err(e) => SampleOutcome::Failed(e.to_string()),
            }
        }
        _ => SampleOutcome::SkippedUnboundInput,
    };

    Ok(ModelReport {
        model_path: path.display().to_string(),
        inputs,
        outputs,
        declared_features,
        declared_classes,
        sample,
    })
}

/// One forward pass on uniform-random input of the declared feature width.
fn run_sample(
    session: &Session,
    input_name: &str,
    num_features: usize,
) -> Result<SampleRun, ClassifierError> {
    let mut rng = rand::thread_rng();
    let values: Vec<f32> = (0..num_features).map(|_| rng.gen()).collect();

    let input_array = Array2::from_shape_vec((1, num_features), values).map_err(|e| {
        ClassifierError::Prediction(format!("Failed to create sample input: {}", e))
    })?;
    let input_dyn = input_array.into_dyn();
    let input_values = input_dyn.as_standard_layout();

    let mut input_tensors = HashMap::new();
    input_tensors.insert(
        input_name,
        Tensor::from_array(&input_values).map_err(|e| {
            ClassifierError::Prediction(format!("Failed to create sample tensor: {}", e))
        })?,
    );

    let outputs = session.run(input_tensors).map_err(|e| {
        ClassifierError::Prediction(format!("Failed to run model: {}", e))
    })?;
    let output_tensor = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
        ClassifierError::Prediction(format!("Failed to extract output tensor: {}", e))
    })?;

    Ok(SampleRun {
        output_shape: output_tensor.shape().to_vec(),
        leading_values: output_tensor.iter().copied().take(SAMPLE_VALUES).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_missing_file_is_model_error() {
        let result = inspect_model(
            Path::new("/nonexistent/tree_species_model.onnx"),
            &RuntimeConfig::default(),
        );
        assert!(matches!(result, Err(ClassifierError::Model(_))));
    }
}
