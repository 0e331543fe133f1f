use crate::domain::audio::OutputFormat;
use crate::domain::delivery::DeliveryResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Job as handed over by the host runtime
#[derive(Debug, Serialize, Deserialize)]
pub struct JobEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub input: Value,
}

/// Where the audio ended up, flattened into the job output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AudioPayload {
    Url { audio_url: String },
    Inline { audio: String },
}

impl From<DeliveryResult> for AudioPayload {
    fn from(result: DeliveryResult) -> Self {
        match result {
            DeliveryResult::Inline { audio } => AudioPayload::Inline { audio },
            uploaded => AudioPayload::Url {
                audio_url: uploaded.public_url().unwrap_or_default().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOutput {
    #[serde(flatten)]
    pub audio: AudioPayload,
    pub duration: f64,
    pub sample_rate: u32,
    pub format: OutputFormat,
}

/// Outcome of one job: success fields or a single `error`, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobResult {
    Success(JobOutput),
    Error { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Error,
}

impl JobResult {
    pub fn error(message: impl Into<String>) -> Self {
        JobResult::Error {
            error: message.into(),
        }
    }

    pub fn status(&self) -> JobStatus {
        match self {
            JobResult::Success(_) => JobStatus::Success,
            JobResult::Error { .. } => JobStatus::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == JobStatus::Success
    }
}

/// Response body for POST /runsync
#[derive(Debug, Serialize)]
pub struct RunSyncResponse {
    pub id: String,
    pub status: &'static str,
    pub output: JobResult,
}

impl RunSyncResponse {
    pub fn new(id: String, output: JobResult) -> Self {
        let status = if output.is_success() {
            "COMPLETED"
        } else {
            "FAILED"
        };
        Self { id, status, output }
    }
}
