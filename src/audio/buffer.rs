//! Decoded, immutable sample data.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::foundation::error::{MediaError, MediaResult};

/// Planar `f32` samples in `[-1, 1)` plus their sample rate.
///
/// Channels are reference counted so a playing voice and the caller can share one buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Arc<[f32]>>,
}

impl AudioBuffer {
    /// Build from planar channel data.
    ///
    /// All channels must have the same non-zero length.
    pub fn from_planar(sample_rate: u32, channels: Vec<Vec<f32>>) -> MediaResult<Self> {
        if sample_rate == 0 {
            return Err(MediaError::decode("sample rate must be > 0"));
        }
        let Some(first) = channels.first() else {
            return Err(MediaError::decode("audio buffer needs at least one channel"));
        };
        let frames = first.len();
        if frames == 0 {
            return Err(MediaError::decode("audio buffer has no frames"));
        }
        if channels.iter().any(|c| c.len() != frames) {
            return Err(MediaError::decode("audio channels differ in length"));
        }
        Ok(Self {
            sample_rate,
            channels: channels.into_iter().map(Arc::from).collect(),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(|c| &c[..])
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Interpolated sample of `channel` at fractional frame `pos`.
    ///
    /// Channels beyond the buffer's count reuse the last channel, so mono plays on every output
    /// channel.
    pub(crate) fn sample_lerp(&self, channel: usize, pos: f64) -> f32 {
        let Some(data) = self
            .channels
            .get(channel)
            .or_else(|| self.channels.last())
        else {
            return 0.0;
        };
        if !pos.is_finite() || pos < 0.0 {
            return 0.0;
        }
        let i0 = pos.floor() as usize;
        if i0 >= data.len() {
            return 0.0;
        }
        let i1 = (i0 + 1).min(data.len() - 1);
        let frac = (pos - i0 as f64) as f32;
        let v0 = data[i0];
        let v1 = data[i1];
        v0 + ((v1 - v0) * frac)
    }

    /// Encode as a 16-bit PCM WAV file in memory.
    pub fn to_wav_bytes(&self) -> MediaResult<Vec<u8>> {
        let channels = u16::try_from(self.channel_count())
            .map_err(|_| MediaError::validation("too many channels for WAV"))?;
        let spec = WavSpec {
            channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec)
                .map_err(|e| MediaError::validation(format!("failed to start WAV: {e}")))?;
            for frame in 0..self.frames() {
                for ch in &self.channels {
                    writer
                        .write_sample(to_i16(ch[frame]))
                        .map_err(|e| MediaError::validation(format!("failed to write WAV: {e}")))?;
                }
            }
            writer
                .finalize()
                .map_err(|e| MediaError::validation(format!("failed to finalize WAV: {e}")))?;
        }
        Ok(cursor.into_inner())
    }

    /// Write a 16-bit PCM WAV file, creating parent directories.
    pub fn write_wav(&self, path: &Path) -> MediaResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                MediaError::validation(format!(
                    "failed to create WAV output directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
        let bytes = self.to_wav_bytes()?;
        std::fs::write(path, bytes).map_err(|e| {
            MediaError::validation(format!("failed to write WAV '{}': {e}", path.display()))
        })
    }
}

fn to_i16(s: f32) -> i16 {
    (s * 32768.0).round().clamp(-32768.0, 32767.0) as i16
}

#[cfg(test)]
#[path = "../../tests/unit/audio/buffer.rs"]
mod tests;
