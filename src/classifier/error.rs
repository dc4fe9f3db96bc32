use ort::Error as OrtError;
use thiserror::Error;

/// The closed set of failures the classifier can report.
///
/// The variants separate fatal-at-startup conditions from recoverable
/// per-attempt ones, so callers never have to string-match messages:
/// a `Model` error at load time ends the session, a `Mapping` error degrades
/// to ID-only labels, and a `Prediction` error spoils one attempt only.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The model artifact is missing, corrupt, or structurally unusable.
    #[error("Model error: {0}")]
    Model(String),
    /// The species mapping file could not be read or parsed.
    #[error("Mapping error: {0}")]
    Mapping(String),
    /// A single inference attempt failed.
    #[error("Prediction error: {0}")]
    Prediction(String),
    /// The builder's dataset is missing, unreadable, or lacks required columns.
    #[error("Data error: {0}")]
    Data(String),
    /// Invalid user-supplied input parameters.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::Model(err.to_string())
    }
}
