/// Failures while turning an `audio_prompt` field into usable reference audio
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("Failed to download audio prompt: {0}")]
    Fetch(String),
    #[error("Failed to decode base64 audio_prompt: {0}")]
    Decode(String),
    #[error("Unsupported audio prompt: {0}")]
    UnsupportedAudio(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct EncodingError(pub String);

impl EncodingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
