use crate::domain::audio::{EncodingError, ResolveError};
use crate::domain::synthesis::ModelError;

/// Client input defects, caught before any fetch or inference
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingField(&'static str),
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Unsupported output_format '{0}' (expected wav or mp3)")]
    UnsupportedFormat(String),
}

/// A failed job, tagged with the stage that failed
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    AudioPrompt(#[from] ResolveError),
    #[error("TTS generation failed: {0}")]
    Synthesis(#[from] ModelError),
    #[error("Failed to encode audio: {0}")]
    Encoding(#[from] EncodingError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JobError {
    pub fn stage(&self) -> &'static str {
        match self {
            JobError::Validation(_) => "validation",
            JobError::AudioPrompt(_) => "audio_prompt",
            JobError::Synthesis(_) => "synthesis",
            JobError::Encoding(_) => "encoding",
            JobError::Internal(_) => "internal",
        }
    }
}
