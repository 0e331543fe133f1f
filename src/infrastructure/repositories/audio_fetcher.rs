use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Downloads remote reference audio
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Fetch `url` into memory, failing once more than `max_bytes` arrive
    async fn fetch(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>, String>;
}

/// reqwest-backed fetcher with a whole-request timeout
pub struct HttpAudioFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpAudioFetcher {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build fetch HTTP client: {}", e))?;

        Ok(Self { client, timeout })
    }

    fn describe(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("timed out after {:?}", self.timeout)
        } else {
            e.to_string()
        }
    }
}

#[async_trait]
impl AudioFetcher for HttpAudioFetcher {
    async fn fetch(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.describe(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        if let Some(length) = response.content_length() {
            if length > max_bytes as u64 {
                return Err(format!(
                    "response of {} bytes exceeds limit of {} bytes",
                    length, max_bytes
                ));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.describe(&e))? {
            if body.len() + chunk.len() > max_bytes {
                return Err(format!("response exceeds limit of {} bytes", max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(
            size_bytes = body.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "Audio prompt downloaded"
        );

        Ok(body)
    }
}
