use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    domain::job::{JobEnvelope, JobHandler, RunSyncResponse},
    error::AppResult,
    infrastructure::http::RequestId,
};

pub struct JobController {
    job_handler: Arc<JobHandler>,
}

impl JobController {
    pub fn new(job_handler: Arc<JobHandler>) -> Self {
        Self { job_handler }
    }

    /// POST /runsync - Run one job and wait for its result
    ///
    /// Job failures are reported inside `output` with a 200; only bodies that
    /// are not a job envelope are rejected.
    pub async fn run_sync(
        State(controller): State<Arc<JobController>>,
        Extension(request_id): Extension<RequestId>,
        payload: Result<Json<JobEnvelope>, JsonRejection>,
    ) -> AppResult<Json<RunSyncResponse>> {
        let Json(envelope) = payload?;

        let job_id = envelope
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(request_id.0);

        let output = controller
            .job_handler
            .handle(&job_id, &envelope.input)
            .await;

        Ok(Json(RunSyncResponse::new(job_id, output)))
    }
}
