use crate::domain::audio::{ReferenceAudio, SynthesizedAudio};
use async_trait::async_trait;

/// Everything the model needs for one generation call
#[derive(Debug, Clone)]
pub struct SynthesisInput {
    pub text: String,
    pub reference_audio: Option<ReferenceAudio>,
    pub exaggeration: f32,
    pub cfg_weight: f32,
}

/// Repository for TTS synthesis operations.
/// Abstracts the loaded inference engine so the pipeline can run against a
/// real model or a test double.
///
/// Implementations must not retry failed generations; the caller serializes
/// calls and decides what a failure means for the job.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Generate speech for the given input
    ///
    /// Returns a mono waveform and its sample rate
    ///
    /// # Errors
    /// Returns the engine's error message if generation fails
    async fn synthesize(&self, input: &SynthesisInput) -> Result<SynthesizedAudio, String>;

    /// Report whether the engine is loaded and able to take calls
    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }
}
