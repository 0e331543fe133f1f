use super::error::EncodingError;
use super::model::{EncodedArtifact, OutputFormat, SynthesizedAudio};
use std::io::Cursor;
use std::process::Command;

/// Full-scale value used for 16-bit quantization, in both directions
pub const PCM16_SCALE: f32 = i16::MAX as f32;

pub const DEFAULT_MP3_BITRATE_KBPS: u32 = 128;

/// Converts raw model output into the requested container.
///
/// WAV is mono 16-bit PCM: samples are clamped to [-1, 1], scaled by
/// `PCM16_SCALE` and rounded to nearest. MP3 is produced by piping that WAV
/// through ffmpeg's libmp3lame at a constant bitrate.
#[derive(Debug, Clone)]
pub struct OutputEncoder {
    ffmpeg_path: String,
    mp3_bitrate_kbps: u32,
}

impl Default for OutputEncoder {
    fn default() -> Self {
        Self::new("ffmpeg".to_string(), DEFAULT_MP3_BITRATE_KBPS)
    }
}

impl OutputEncoder {
    pub fn new(ffmpeg_path: String, mp3_bitrate_kbps: u32) -> Self {
        Self {
            ffmpeg_path,
            mp3_bitrate_kbps,
        }
    }

    /// Encode a waveform. Blocking: run it on a blocking thread.
    pub fn encode(
        &self,
        audio: &SynthesizedAudio,
        format: OutputFormat,
    ) -> Result<EncodedArtifact, EncodingError> {
        if audio.sample_rate == 0 {
            return Err(EncodingError::new("sample rate must be positive"));
        }
        if audio.samples.is_empty() {
            return Err(EncodingError::new("waveform is empty"));
        }

        let start_time = std::time::Instant::now();
        let wav = encode_wav(&audio.samples, audio.sample_rate)?;
        let bytes = match format {
            OutputFormat::Wav => wav,
            OutputFormat::Mp3 => self.wav_to_mp3(&wav)?,
        };

        tracing::debug!(
            format = %format,
            audio_size_bytes = bytes.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "Audio encoded"
        );

        Ok(EncodedArtifact {
            bytes,
            format,
            duration_secs: audio.duration_secs(),
            sample_rate: audio.sample_rate,
        })
    }

    fn wav_to_mp3(&self, wav: &[u8]) -> Result<Vec<u8>, EncodingError> {
        let wav_file = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .map_err(|e| EncodingError::new(format!("failed to create temp wav: {}", e)))?;
        std::fs::write(wav_file.path(), wav)
            .map_err(|e| EncodingError::new(format!("failed to write temp wav: {}", e)))?;

        let mp3_file = tempfile::Builder::new()
            .suffix(".mp3")
            .tempfile()
            .map_err(|e| EncodingError::new(format!("failed to create temp mp3: {}", e)))?;

        let output = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(wav_file.path())
            .arg("-ac")
            .arg("1")
            .arg("-codec:a")
            .arg("libmp3lame")
            .arg("-b:a")
            .arg(format!("{}k", self.mp3_bitrate_kbps))
            .arg(mp3_file.path())
            .output()
            .map_err(|e| EncodingError::new(format!("failed to run ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncodingError::new(format!(
                "ffmpeg failed: {}",
                stderr.trim()
            )));
        }

        let mp3 = std::fs::read(mp3_file.path())
            .map_err(|e| EncodingError::new(format!("failed to read mp3: {}", e)))?;
        if mp3.is_empty() {
            return Err(EncodingError::new("ffmpeg produced no output"));
        }
        Ok(mp3)
    }
}

/// Quantize one sample to 16-bit PCM
pub fn quantize_pcm16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * PCM16_SCALE).round() as i16
}

/// Write mono 16-bit PCM WAV into memory
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    // WAV header (44 bytes) + 2 bytes per sample
    let mut cursor = Cursor::new(Vec::<u8>::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| EncodingError::new(format!("wav header error: {}", e)))?;
        for &sample in samples {
            writer
                .write_sample(quantize_pcm16(sample))
                .map_err(|e| EncodingError::new(format!("wav sample error: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| EncodingError::new(format!("wav finalize error: {}", e)))?;
    }

    Ok(cursor.into_inner())
}
