use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Inference engine
    pub model_url: String,
    pub model_health_timeout_secs: u64,
    // Reference audio
    pub audio_prompt_timeout_secs: u64,
    pub audio_prompt_max_bytes: usize,
    // Encoding
    pub ffmpeg_path: String,
    pub mp3_bitrate_kbps: u32,
    // Delivery
    pub upload_timeout_secs: u64,
    pub storage: Option<StorageConfig>,
}

/// S3-compatible bucket settings (R2 naming, as deployed)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub region: String,
    /// Public base URL used to build CDN links, e.g. https://cdn.example.com
    pub cdn_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            model_url: env::var("MODEL_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8001".to_string()),
            model_health_timeout_secs: env::var("MODEL_HEALTH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            audio_prompt_timeout_secs: env::var("AUDIO_PROMPT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            audio_prompt_max_bytes: env::var("AUDIO_PROMPT_MAX_BYTES")
                .unwrap_or_else(|_| (20 * 1024 * 1024).to_string())
                .parse()?,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            mp3_bitrate_kbps: env::var("MP3_BITRATE_KBPS")
                .unwrap_or_else(|_| "128".to_string())
                .parse()?,
            upload_timeout_secs: env::var("UPLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
            storage: StorageConfig::from_env(),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Bounds connecting to the engine and its health probe, never generation
    pub fn model_health_timeout(&self) -> Duration {
        Duration::from_secs(self.model_health_timeout_secs)
    }

    pub fn audio_prompt_timeout(&self) -> Duration {
        Duration::from_secs(self.audio_prompt_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

impl StorageConfig {
    /// Storage is configured only when the endpoint and both credentials are set
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = non_empty("R2_ENDPOINT")?;
        let access_key_id = non_empty("R2_ACCESS_KEY_ID")?;
        let secret_access_key = non_empty("R2_SECRET_ACCESS_KEY")?;

        Some(StorageConfig {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_key_id,
            secret_access_key,
            bucket: non_empty("R2_BUCKET").unwrap_or_else(|| "cdn".to_string()),
            region: non_empty("R2_REGION").unwrap_or_else(|| "auto".to_string()),
            cdn_url: non_empty("CDN_URL").map(|url| url.trim_end_matches('/').to_string()),
        })
    }
}
