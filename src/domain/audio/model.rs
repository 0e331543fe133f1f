use serde::{Deserialize, Serialize};

/// Container formats a job can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Wav,
    Mp3,
}

impl OutputFormat {
    /// Get the format name as used in job payloads and file extensions
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Mp3 => "mp3",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "audio/wav",
            OutputFormat::Mp3 => "audio/mpeg",
        }
    }

    /// Parse a payload value, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "wav" => Some(OutputFormat::Wav),
            "mp3" => Some(OutputFormat::Mp3),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference clip used for voice cloning, after it has been fetched or decoded
/// and probed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceAudio {
    /// Container bytes exactly as received
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_secs: f32,
}

/// Raw mono waveform returned by the model
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    /// Samples as f32 in range [-1, 1]
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SynthesizedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration derived from the sample count, never from an encoded stream
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Encoded audio ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedArtifact {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub duration_secs: f64,
    pub sample_rate: u32,
}
