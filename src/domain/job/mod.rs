pub mod dto;
pub mod error;
pub mod handler;
pub mod validator;

pub use dto::{JobEnvelope, JobOutput, JobResult, RunSyncResponse};
pub use error::{JobError, ValidationError};
pub use handler::JobHandler;
pub use validator::{validate, SynthesisRequest};
