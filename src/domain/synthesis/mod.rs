pub mod error;
pub mod invoker;

pub use error::ModelError;
pub use invoker::SynthesisInvoker;
