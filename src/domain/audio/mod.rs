pub mod encoder;
pub mod error;
pub mod model;
pub mod probe;
pub mod resolver;

pub use encoder::OutputEncoder;
pub use error::{EncodingError, ResolveError};
pub use model::{EncodedArtifact, OutputFormat, ReferenceAudio, SynthesizedAudio};
pub use resolver::{AudioPromptSource, AudioSourceResolver};
