use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, job::JobController};
use crate::domain::job::JobHandler;
use crate::infrastructure::config::Config;

mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the worker router: health probes plus the synchronous job endpoint
pub fn build_router(job_handler: Arc<JobHandler>) -> Router {
    let job_controller = Arc::new(JobController::new(job_handler.clone()));

    let job_routes = Router::new()
        .route("/runsync", post(JobController::run_sync))
        .with_state(job_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(job_handler)
        .merge(job_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    job_handler: Arc<JobHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(job_handler);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
