// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Empty or whitespace-only text. Raised by the shells, never by the core.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    #[error("Artifact loading failed ({artifact}): {reason}")]
    ArtifactLoad { artifact: String, reason: String },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Feedback sink failed: {0}")]
    FeedbackSink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyzerError {
    pub fn artifact(artifact: impl Into<String>, reason: impl ToString) -> Self {
        Self::ArtifactLoad {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
