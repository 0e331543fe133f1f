use super::tts_repository::{SynthesisInput, TtsRepository};
use crate::domain::audio::probe::{decode_audio, decode_wav};
use crate::domain::audio::SynthesizedAudio;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    text: &'a str,
    exaggeration: f32,
    cfg_weight: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_prompt: Option<String>,
}

/// Engine binding for a model served by a co-located inference process.
///
/// `POST {base_url}/generate` takes the generation parameters as JSON and
/// answers with a WAV body; `GET {base_url}/health` is 2xx once the model is
/// loaded.
///
/// `/generate` carries no client-side deadline: the synthesis slot stays held
/// until the engine has answered. `health_timeout` bounds connecting and the
/// health probe only.
pub struct HttpTtsRepository {
    client: Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpTtsRepository {
    pub fn new(base_url: &str, health_timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .connect_timeout(health_timeout)
            .build()
            .map_err(|e| format!("Failed to build engine HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            health_timeout,
        })
    }

    async fn call_engine(&self, input: &SynthesisInput) -> Result<Vec<u8>, String> {
        let request = GenerateRequest {
            text: &input.text,
            exaggeration: input.exaggeration,
            cfg_weight: input.cfg_weight,
            audio_prompt: input
                .reference_audio
                .as_ref()
                .map(|reference| BASE64.encode(&reference.bytes)),
        };

        tracing::info!(
            text_length = input.text.len(),
            text_preview = %input.text.chars().take(100).collect::<String>(),
            exaggeration = input.exaggeration,
            cfg_weight = input.cfg_weight,
            voice_clone = input.reference_audio.is_some(),
            "Calling inference engine"
        );

        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Inference engine request failed");
                format!("engine request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Inference engine returned an error");
            return Err(if body.trim().is_empty() {
                format!("engine returned {}", status)
            } else {
                body.trim().to_string()
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read engine response: {}", e))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for HttpTtsRepository {
    async fn synthesize(&self, input: &SynthesisInput) -> Result<SynthesizedAudio, String> {
        let start_time = std::time::Instant::now();

        let wav = self.call_engine(input).await?;
        let wav_size = wav.len();

        let decoded = tokio::task::spawn_blocking(move || {
            decode_wav(&wav).or_else(|_| decode_audio(&wav))
        })
            .await
            .map_err(|e| format!("engine output decode task failed: {}", e))?
            .map_err(|e| format!("engine returned undecodable audio: {}", e))?;

        let sample_rate = decoded.sample_rate;
        let audio = SynthesizedAudio::new(decoded.into_mono(), sample_rate);

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "engine",
            latency_ms = duration.as_millis(),
            latency_secs = duration.as_secs_f64(),
            characters_count = input.text.len(),
            audio_size_bytes = wav_size,
            sample_rate = audio.sample_rate,
            audio_duration_secs = format!("{:.2}", audio.duration_secs()),
            "TTS synthesis completed"
        );

        Ok(audio)
    }

    async fn health_check(&self) -> Result<(), String> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| format!("engine unreachable: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("engine not ready: {}", response.status()))
        }
    }
}
