use crate::domain::audio::EncodedArtifact;
use crate::infrastructure::repositories::StorageRepository;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;
use std::time::Duration;

const KEY_PREFIX: &str = "tts";

/// How the finished audio reached the caller
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryResult {
    Uploaded {
        url: String,
        cdn_url: Option<String>,
    },
    Inline {
        /// Base64 of the encoded artifact
        audio: String,
    },
}

impl DeliveryResult {
    /// Link handed to the caller: the CDN link when there is one
    pub fn public_url(&self) -> Option<&str> {
        match self {
            DeliveryResult::Uploaded { url, cdn_url } => Some(cdn_url.as_deref().unwrap_or(url)),
            DeliveryResult::Inline { .. } => None,
        }
    }
}

/// Chooses between uploading and inlining.
///
/// | storage | force_inline | action |
/// |---------|--------------|--------|
/// | none    | any          | inline |
/// | set     | true         | inline |
/// | set     | false        | upload, inline if the upload fails |
pub struct DeliveryStrategy {
    storage: Option<Arc<dyn StorageRepository>>,
    cdn_url: Option<String>,
    upload_timeout: Duration,
}

impl DeliveryStrategy {
    pub fn new(
        storage: Option<Arc<dyn StorageRepository>>,
        cdn_url: Option<String>,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            cdn_url: cdn_url.map(|url| url.trim_end_matches('/').to_string()),
            upload_timeout,
        }
    }

    /// Inline-only delivery
    pub fn inline_only() -> Self {
        Self::new(None, None, Duration::from_secs(0))
    }

    pub fn storage_configured(&self) -> bool {
        self.storage.is_some()
    }

    /// Never fails: an upload problem is logged and the artifact goes inline
    pub async fn deliver(
        &self,
        artifact: EncodedArtifact,
        force_inline: bool,
        job_id: &str,
    ) -> DeliveryResult {
        let storage = match (&self.storage, force_inline) {
            (Some(storage), false) => storage,
            (Some(_), true) => {
                tracing::info!(job_id = job_id, "Inline delivery requested, skipping upload");
                return Self::inline(&artifact);
            }
            (None, _) => return Self::inline(&artifact),
        };

        let key = object_key(job_id, artifact.format.as_str());
        let content_type = artifact.format.content_type();

        let upload = storage.put_object(&key, artifact.bytes.clone(), content_type);
        let outcome = match tokio::time::timeout(self.upload_timeout, upload).await {
            Ok(result) => result,
            Err(_) => Err(format!(
                "upload timed out after {}s",
                self.upload_timeout.as_secs()
            )),
        };

        match outcome {
            Ok(url) => {
                let cdn_url = self.cdn_url.as_ref().map(|base| format!("{}/{}", base, key));
                tracing::info!(
                    job_id = job_id,
                    key = %key,
                    url = %url,
                    cdn_url = ?cdn_url,
                    "Audio uploaded"
                );
                DeliveryResult::Uploaded { url, cdn_url }
            }
            Err(e) => {
                tracing::warn!(
                    job_id = job_id,
                    key = %key,
                    error = %e,
                    "Upload failed, falling back to inline audio"
                );
                Self::inline(&artifact)
            }
        }
    }

    fn inline(artifact: &EncodedArtifact) -> DeliveryResult {
        DeliveryResult::Inline {
            audio: BASE64.encode(&artifact.bytes),
        }
    }
}

/// `tts/<job id>.<ext>`, with the job id reduced to `[A-Za-z0-9_-]`
pub fn object_key(job_id: &str, extension: &str) -> String {
    let mut safe: String = job_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe.is_empty() {
        safe.push_str("job");
    }
    format!("{}/{}.{}", KEY_PREFIX, safe, extension)
}
