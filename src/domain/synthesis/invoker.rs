use super::error::ModelError;
use crate::domain::audio::SynthesizedAudio;
use crate::infrastructure::repositories::{SynthesisInput, TtsRepository};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Owns the loaded model and runs generation calls one at a time.
///
/// The accelerator behind the model cannot run overlapping calls, so every
/// call takes `gate` first. tokio's mutex queues waiters in FIFO order.
/// Once a call has the lock it runs in its own task holding the guard: if
/// the job that asked for it is cancelled the call still finishes and only
/// its result is dropped.
pub struct SynthesisInvoker {
    engine: Arc<dyn TtsRepository>,
    gate: Arc<Mutex<()>>,
}

impl SynthesisInvoker {
    pub fn new(engine: Arc<dyn TtsRepository>) -> Self {
        Self {
            engine,
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub async fn synthesize(&self, input: SynthesisInput) -> Result<SynthesizedAudio, ModelError> {
        let queued_at = std::time::Instant::now();
        let guard = self.gate.clone().lock_owned().await;

        tracing::debug!(
            queue_wait_ms = queued_at.elapsed().as_millis(),
            "Acquired synthesis slot"
        );

        let engine = self.engine.clone();
        let call = tokio::spawn(async move {
            let _guard = guard;
            engine.synthesize(&input).await
        });

        let audio = call
            .await
            .map_err(|e| ModelError::new(format!("synthesis task aborted: {}", e)))?
            .map_err(ModelError::new)?;

        if audio.sample_rate == 0 {
            return Err(ModelError::new("model reported a zero sample rate"));
        }
        if audio.samples.is_empty() {
            return Err(ModelError::new("model returned no audio"));
        }

        Ok(audio)
    }

    pub async fn health_check(&self) -> Result<(), String> {
        self.engine.health_check().await
    }
}
