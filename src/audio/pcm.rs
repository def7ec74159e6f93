//! Raw little-endian signed 16-bit PCM decoding.

use serde::{Deserialize, Serialize};

use crate::assets::artifact::EncodedArtifact;
use crate::audio::buffer::AudioBuffer;
use crate::foundation::error::{MediaError, MediaResult};

/// Sample rate of generated voice-over audio.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
/// Channel count of generated voice-over audio.
pub const DEFAULT_CHANNELS: u16 = 1;
/// Largest interleaved channel count accepted.
pub const MAX_CHANNELS: u16 = 32;

const I16_CEIL: f32 = 32_768.0;

/// Shape of an untagged PCM stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

/// Decode interleaved s16le PCM into planar normalized samples.
///
/// A trailing partial frame is dropped. Empty input, or input shorter than one frame, fails.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_pcm(bytes: &[u8], sample_rate: u32, channel_count: u16) -> MediaResult<AudioBuffer> {
    if bytes.is_empty() {
        return Err(MediaError::decode("pcm payload is empty"));
    }
    if sample_rate == 0 {
        return Err(MediaError::decode("sample rate must be > 0"));
    }
    if channel_count == 0 || channel_count > MAX_CHANNELS {
        return Err(MediaError::decode(format!(
            "channel count must be within 1..={MAX_CHANNELS} (got {channel_count})"
        )));
    }

    let channels = usize::from(channel_count);
    let frame_bytes = 2 * channels;
    let frames = bytes.len() / frame_bytes;
    if frames == 0 {
        return Err(MediaError::decode(format!(
            "pcm payload of {} bytes holds no complete {channel_count}-channel frame",
            bytes.len()
        )));
    }
    let dropped = bytes.len() - frames * frame_bytes;
    if dropped > 0 {
        tracing::debug!(dropped, "truncating incomplete trailing pcm frame");
    }

    let mut planar: Vec<Vec<f32>> = Vec::new();
    planar
        .try_reserve_exact(channels)
        .map_err(|e| MediaError::decode(format!("failed to allocate audio buffer: {e}")))?;
    for _ in 0..channels {
        let mut ch = Vec::new();
        ch.try_reserve_exact(frames).map_err(|e| {
            MediaError::decode(format!(
                "failed to allocate audio buffer of {frames} frames: {e}"
            ))
        })?;
        planar.push(ch);
    }

    for frame in bytes[..frames * frame_bytes].chunks_exact(frame_bytes) {
        for (ch, pair) in planar.iter_mut().zip(frame.chunks_exact(2)) {
            let v = i16::from_le_bytes([pair[0], pair[1]]);
            ch.push(f32::from(v) / I16_CEIL);
        }
    }

    AudioBuffer::from_planar(sample_rate, planar)
}

/// Decode a base64 voice-over artifact with the default mono 24 kHz format.
pub fn decode_audio(artifact: &EncodedArtifact) -> MediaResult<AudioBuffer> {
    decode_audio_with(artifact, PcmFormat::default())
}

/// Decode a base64 PCM artifact with an explicit format.
///
/// Every failure, including malformed base64, surfaces as [`MediaError::Decode`].
pub fn decode_audio_with(artifact: &EncodedArtifact, format: PcmFormat) -> MediaResult<AudioBuffer> {
    let bytes = artifact.to_bytes().map_err(MediaError::into_decode)?;
    decode_pcm(&bytes, format.sample_rate, format.channels)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/pcm.rs"]
mod tests;
