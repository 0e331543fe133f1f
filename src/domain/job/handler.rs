use super::dto::{JobOutput, JobResult};
use super::error::JobError;
use super::validator::{validate, SynthesisRequest};
use crate::domain::audio::{
    AudioSourceResolver, EncodedArtifact, OutputEncoder, OutputFormat, SynthesizedAudio,
};
use crate::domain::delivery::DeliveryStrategy;
use crate::domain::synthesis::SynthesisInvoker;
use crate::infrastructure::repositories::SynthesisInput;
use serde_json::Value;
use std::time::Instant;
use tracing::Instrument;

/// Runs one job end to end and always produces a `JobResult`.
///
/// Stages run in order: validation, audio prompt resolution (only when an
/// `audio_prompt` is present), synthesis, encoding, delivery. The first
/// failing stage ends the job with an error result; delivery cannot fail.
pub struct JobHandler {
    resolver: AudioSourceResolver,
    invoker: SynthesisInvoker,
    encoder: OutputEncoder,
    delivery: DeliveryStrategy,
}

impl JobHandler {
    pub fn new(
        resolver: AudioSourceResolver,
        invoker: SynthesisInvoker,
        encoder: OutputEncoder,
        delivery: DeliveryStrategy,
    ) -> Self {
        Self {
            resolver,
            invoker,
            encoder,
            delivery,
        }
    }

    pub async fn handle(&self, job_id: &str, input: &Value) -> JobResult {
        let span = tracing::info_span!("job", job_id = %job_id);

        async move {
            let start_time = Instant::now();
            tracing::info!("Job received");

            match self.run(job_id, input).await {
                Ok(output) => {
                    tracing::info!(
                        latency_ms = start_time.elapsed().as_millis(),
                        duration_secs = format!("{:.2}", output.duration),
                        format = %output.format,
                        "Job completed"
                    );
                    JobResult::Success(output)
                }
                Err(e) => {
                    tracing::warn!(
                        stage = e.stage(),
                        error = %e,
                        latency_ms = start_time.elapsed().as_millis(),
                        "Job failed"
                    );
                    JobResult::error(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    pub async fn health_check(&self) -> Result<(), String> {
        self.invoker.health_check().await
    }

    pub fn storage_configured(&self) -> bool {
        self.delivery.storage_configured()
    }

    async fn run(&self, job_id: &str, input: &Value) -> Result<JobOutput, JobError> {
        let request = validate(input)?;

        tracing::info!(
            text_length = request.text.len(),
            text_preview = %preview(&request.text),
            exaggeration = request.exaggeration,
            cfg_weight = request.cfg_weight,
            output_format = %request.output_format,
            force_inline = request.force_inline,
            voice_clone = request.audio_prompt.is_some(),
            "Job validated"
        );

        let SynthesisRequest {
            text,
            audio_prompt,
            exaggeration,
            cfg_weight,
            output_format,
            force_inline,
        } = request;

        let reference_audio = match audio_prompt {
            Some(source) => Some(self.resolver.resolve_source(source).await?),
            None => None,
        };

        let audio = self
            .invoker
            .synthesize(SynthesisInput {
                text,
                reference_audio,
                exaggeration,
                cfg_weight,
            })
            .await?;

        let artifact = self.encode(audio, output_format).await?;
        let duration = artifact.duration_secs;
        let sample_rate = artifact.sample_rate;
        let format = artifact.format;

        let delivered = self.delivery.deliver(artifact, force_inline, job_id).await;

        Ok(JobOutput {
            audio: delivered.into(),
            duration,
            sample_rate,
            format,
        })
    }

    async fn encode(
        &self,
        audio: SynthesizedAudio,
        format: OutputFormat,
    ) -> Result<EncodedArtifact, JobError> {
        let encoder = self.encoder.clone();
        let artifact = tokio::task::spawn_blocking(move || encoder.encode(&audio, format))
            .await
            .map_err(|e| JobError::Internal(format!("encoding task failed: {}", e)))??;
        Ok(artifact)
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(100).collect();
    if text.chars().count() > 100 {
        preview.push_str("...");
    }
    preview
}
