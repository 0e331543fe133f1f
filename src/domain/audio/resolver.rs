use super::error::ResolveError;
use super::model::ReferenceAudio;
use super::probe::inspect_audio;
use crate::infrastructure::repositories::AudioFetcher;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Url;
use std::sync::Arc;

/// Where an `audio_prompt` value points
#[derive(Debug, Clone, PartialEq)]
pub enum AudioPromptSource {
    /// Remote clip to download
    Url(Url),
    /// Base64 payload, optionally in data URL form
    Inline(String),
}

impl AudioPromptSource {
    /// Anything that parses as an absolute http(s) URL with a host is remote,
    /// everything else is treated as inline data.
    pub fn classify(field: &str) -> Self {
        let field = field.trim();
        match Url::parse(field) {
            Ok(url)
                if matches!(url.scheme(), "http" | "https")
                    && url.host_str().is_some_and(|host| !host.is_empty()) =>
            {
                AudioPromptSource::Url(url)
            }
            _ => AudioPromptSource::Inline(field.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AudioPromptSource::Url(_) => "url",
            AudioPromptSource::Inline(_) => "base64",
        }
    }
}

/// Materializes reference audio for voice cloning
pub struct AudioSourceResolver {
    fetcher: Arc<dyn AudioFetcher>,
    max_bytes: usize,
}

impl AudioSourceResolver {
    pub fn new(fetcher: Arc<dyn AudioFetcher>, max_bytes: usize) -> Self {
        Self { fetcher, max_bytes }
    }

    /// Resolve a raw `audio_prompt` value to probed reference audio
    pub async fn resolve(&self, field: &str) -> Result<ReferenceAudio, ResolveError> {
        self.resolve_source(AudioPromptSource::classify(field)).await
    }

    pub async fn resolve_source(
        &self,
        source: AudioPromptSource,
    ) -> Result<ReferenceAudio, ResolveError> {
        let kind = source.kind();
        let bytes = match source {
            AudioPromptSource::Url(url) => {
                tracing::info!(url = %url, "Downloading audio prompt");
                self.fetcher
                    .fetch(url.as_str(), self.max_bytes)
                    .await
                    .map_err(ResolveError::Fetch)?
            }
            AudioPromptSource::Inline(data) => decode_inline(&data, self.max_bytes)?,
        };

        let reference = tokio::task::spawn_blocking(move || probe_reference(bytes))
            .await
            .map_err(|e| ResolveError::UnsupportedAudio(format!("probe task failed: {}", e)))??;

        tracing::info!(
            source = kind,
            size_bytes = reference.bytes.len(),
            sample_rate = reference.sample_rate,
            channels = reference.channels,
            duration_secs = reference.duration_secs,
            "Audio prompt resolved"
        );

        Ok(reference)
    }
}

/// Decode an inline base64 payload, accepting `data:<mime>;base64,` prefixes
/// and embedded whitespace.
pub fn decode_inline(data: &str, max_bytes: usize) -> Result<Vec<u8>, ResolveError> {
    let data = data.trim();
    let payload = if data.starts_with("data:") {
        data.split_once(',')
            .map(|(_, payload)| payload)
            .ok_or_else(|| ResolveError::Decode("invalid data URL format".to_string()))?
    } else {
        data
    };

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if compact.is_empty() {
        return Err(ResolveError::Decode("payload is empty".to_string()));
    }

    // Upper bound of the decoded size, checked before allocating
    let estimated = compact.len() / 4 * 3;
    if estimated > max_bytes.saturating_add(3) {
        return Err(ResolveError::Decode(format!(
            "payload exceeds {} bytes",
            max_bytes
        )));
    }

    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| ResolveError::Decode(e.to_string()))?;

    if bytes.len() > max_bytes {
        return Err(ResolveError::Decode(format!(
            "payload exceeds {} bytes",
            max_bytes
        )));
    }

    Ok(bytes)
}

fn probe_reference(bytes: Vec<u8>) -> Result<ReferenceAudio, ResolveError> {
    let info = inspect_audio(&bytes).map_err(ResolveError::UnsupportedAudio)?;
    Ok(ReferenceAudio {
        sample_rate: info.sample_rate,
        channels: info.channels,
        duration_secs: info.duration_secs,
        bytes,
    })
}
