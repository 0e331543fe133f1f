pub mod audio_fetcher;
pub mod http_tts_repository;
pub mod s3_storage_repository;
pub mod storage_repository;
pub mod tts_repository;

pub use audio_fetcher::{AudioFetcher, HttpAudioFetcher};
pub use http_tts_repository::HttpTtsRepository;
pub use s3_storage_repository::S3StorageRepository;
pub use storage_repository::StorageRepository;
pub use tts_repository::{SynthesisInput, TtsRepository};
