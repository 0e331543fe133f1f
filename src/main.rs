use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use chatterbox_worker::domain::audio::{AudioSourceResolver, OutputEncoder};
use chatterbox_worker::domain::delivery::DeliveryStrategy;
use chatterbox_worker::domain::job::JobHandler;
use chatterbox_worker::domain::synthesis::SynthesisInvoker;
use chatterbox_worker::infrastructure::config::{Config, LogFormat};
use chatterbox_worker::infrastructure::http::start_http_server;
use chatterbox_worker::infrastructure::repositories::{
    HttpAudioFetcher, HttpTtsRepository, S3StorageRepository, StorageRepository, TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Chatterbox worker on {}:{}",
        config.host,
        config.port
    );

    // Inference engine
    tracing::info!(model_url = %config.model_url, "Connecting to inference engine");
    let engine = HttpTtsRepository::new(&config.model_url, config.model_health_timeout())?;

    // The engine may still be loading weights; readiness is reported on /health/ready
    match engine.health_check().await {
        Ok(()) => tracing::info!("Inference engine ready"),
        Err(e) => tracing::warn!(error = %e, "Inference engine not ready yet"),
    }

    // Object storage
    let storage: Option<Arc<dyn StorageRepository>> = match &config.storage {
        Some(storage_config) => {
            let repo = S3StorageRepository::from_config(storage_config).await;
            Some(Arc::new(repo))
        }
        None => {
            tracing::warn!("R2 credentials not configured, audio will be returned inline");
            None
        }
    };
    let cdn_url = config.storage.as_ref().and_then(|s| s.cdn_url.clone());

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let engine: Arc<dyn TtsRepository> = Arc::new(engine);
    let fetcher = Arc::new(HttpAudioFetcher::new(config.audio_prompt_timeout())?);

    // 2. Instantiate pipeline stages
    tracing::info!("Instantiating pipeline...");
    let resolver = AudioSourceResolver::new(fetcher, config.audio_prompt_max_bytes);
    let invoker = SynthesisInvoker::new(engine);
    let encoder = OutputEncoder::new(config.ffmpeg_path.clone(), config.mp3_bitrate_kbps);
    let delivery = DeliveryStrategy::new(storage, cdn_url, config.upload_timeout());

    // 3. Instantiate the job handler
    let job_handler = Arc::new(JobHandler::new(resolver, invoker, encoder, delivery));

    if config.is_development() {
        tracing::debug!(
            model_health_timeout_secs = config.model_health_timeout_secs,
            audio_prompt_max_bytes = config.audio_prompt_max_bytes,
            upload_timeout_secs = config.upload_timeout_secs,
            storage_configured = job_handler.storage_configured(),
            "Effective configuration"
        );
    }

    // Start HTTP server with all routes
    start_http_server(config, job_handler).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "chatterbox_worker=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "chatterbox_worker=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
