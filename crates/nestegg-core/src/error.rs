use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Unrecognized compounding frequency: {label}")]
    InvalidFrequency { label: String },

    #[error("Invalid term: {reason}")]
    InvalidTerm { reason: String },

    #[error("Invalid retirement horizon: {reason}")]
    InvalidHorizon { reason: String },

    #[error("Invalid bond parameters: {field}: {reason}")]
    InvalidBondParameters { field: String, reason: String },

    #[error("Prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error("Invalid strategy: {reason}")]
    InvalidStrategy { reason: String },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProjectionError {
    fn from(e: serde_json::Error) -> Self {
        ProjectionError::SerializationError(e.to_string())
    }
}
