//! Container probing and decoding.
//!
//! Reference clips arrive as arbitrary container bytes (wav, mp3, flac, ogg)
//! and go through symphonia so a clip the engine could not read is rejected
//! before it reaches the model. Engine output is WAV and is read with hound on
//! the same 16-bit scale the encoder writes with, so it re-encodes losslessly.

use std::io::Cursor;

use super::encoder::PCM16_SCALE;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Interleaved PCM decoded from a container
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedAudio {
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f32 / self.sample_rate as f32
    }

    /// Average channels down to one
    pub fn into_mono(self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples;
        }
        self.samples
            .chunks(self.channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    }
}

/// Stream parameters of a container, read without keeping its samples
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInfo {
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_secs: f32,
}

fn open_container(bytes: &[u8]) -> Result<Box<dyn FormatReader>, String> {
    let cursor = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| format!("failed to probe audio format: {}", e))?;

    Ok(probed.format)
}

/// Check that a container holds decodable audio and read its parameters.
///
/// Only packets up to the first one that decodes are run through the codec.
/// Duration comes from the track header, or from packet durations when the
/// header has no frame count.
pub fn inspect_audio(bytes: &[u8]) -> Result<AudioInfo, String> {
    let mut format = open_container(bytes)?;

    let track = format
        .default_track()
        .ok_or_else(|| "no audio tracks found".to_string())?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| "unknown sample rate".to_string())?;
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    let header_frames = track.codec_params.n_frames;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| format!("failed to create decoder: {}", e))?;

    let mut packet_frames: u64 = 0;
    let mut decodable = false;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(format!("decode error: {}", e)),
        };

        if packet.track_id() != track_id {
            continue;
        }
        packet_frames += packet.dur;

        if !decodable {
            match decoder.decode(&packet) {
                Ok(decoded) if decoded.frames() > 0 => {
                    channels = decoded.spec().channels.count();
                    decodable = true;
                }
                Ok(_) | Err(SymphoniaError::DecodeError(_)) => {}
                Err(e) => return Err(format!("decode error: {}", e)),
            }
        }

        if decodable && header_frames.is_some() {
            break;
        }
    }

    if !decodable {
        return Err("no audio frames decoded".to_string());
    }

    let frames = header_frames.unwrap_or(packet_frames);
    Ok(AudioInfo {
        sample_rate,
        channels,
        duration_secs: frames as f32 / sample_rate as f32,
    })
}

/// Decode a whole in-memory container to f32 samples.
///
/// Corrupt packets in the middle of a stream are skipped; anything that stops
/// the container from being probed or a decoder from being built is an error.
pub fn decode_audio(bytes: &[u8]) -> Result<DecodedAudio, String> {
    let mut format = open_container(bytes)?;

    let track = format
        .default_track()
        .ok_or_else(|| "no audio tracks found".to_string())?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| "unknown sample rate".to_string())?;
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| format!("failed to create decoder: {}", e))?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(format!("decode error: {}", e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(format!("decode error: {}", e)),
        };

        let spec = *decoded.spec();
        channels = spec.channels.count();
        let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sample_buf.samples());
    }

    if samples.is_empty() {
        return Err("no audio frames decoded".to_string());
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Read a WAV container with hound.
///
/// 16-bit integer samples are divided by `PCM16_SCALE`, the inverse of
/// `quantize_pcm16`. Other integer depths use their own full-scale value.
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio, String> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| format!("failed to read wav header: {}", e))?;
    let spec = reader.spec();

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, _) => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("wav sample error: {}", e))?,
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|s| s as f32 / PCM16_SCALE))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("wav sample error: {}", e))?,
        (hound::SampleFormat::Int, bits) => {
            let scale = ((1i64 << (bits - 1)) - 1) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| format!("wav sample error: {}", e))?
        }
    };

    if samples.is_empty() {
        return Err("no audio frames decoded".to_string());
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels as usize,
    })
}
