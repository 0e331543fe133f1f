pub mod audio;
pub mod delivery;
pub mod job;
pub mod synthesis;
