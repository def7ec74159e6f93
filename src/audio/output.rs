//! Output devices a [`PlaybackController`](crate::audio::playback::PlaybackController) drives.

use std::sync::Arc;

use crate::audio::playback::Voice;
use crate::foundation::error::MediaResult;

/// Interleaved `f32` stream shape a device consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// A sink that renders at most one [`Voice`] at a time.
pub trait OutputDevice {
    fn format(&self) -> DeviceFormat;

    /// Start rendering `voice`, replacing whatever was attached.
    fn attach(&mut self, voice: Arc<Voice>) -> MediaResult<()>;

    /// Stop rendering; the device outputs silence afterwards.
    fn detach(&mut self);
}

/// Offline device: samples are produced only when pulled.
///
/// Used for headless playback and for driving the controller deterministically in tests.
#[derive(Debug)]
pub struct MemoryOutput {
    format: DeviceFormat,
    voice: Option<Arc<Voice>>,
    frames_pulled: u64,
}

impl MemoryOutput {
    pub fn new(format: DeviceFormat) -> Self {
        Self {
            format,
            voice: None,
            frames_pulled: 0,
        }
    }

    /// Whether a voice is attached.
    pub fn is_attached(&self) -> bool {
        self.voice.is_some()
    }

    /// Total frames produced so far, silence included.
    pub fn frames_pulled(&self) -> u64 {
        self.frames_pulled
    }

    /// Render `frames` interleaved frames.
    pub fn pull(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames * usize::from(self.format.channels)];
        if let Some(voice) = &self.voice {
            voice.render(&mut out, self.format);
        }
        self.frames_pulled += frames as u64;
        out
    }
}

impl OutputDevice for MemoryOutput {
    fn format(&self) -> DeviceFormat {
        self.format
    }

    fn attach(&mut self, voice: Arc<Voice>) -> MediaResult<()> {
        self.voice = Some(voice);
        Ok(())
    }

    fn detach(&mut self) {
        self.voice = None;
    }
}
