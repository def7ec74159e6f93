//! Realtime output through the system's default audio device.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};
use parking_lot::Mutex;

use crate::audio::output::{DeviceFormat, OutputDevice};
use crate::audio::playback::Voice;
use crate::foundation::error::{MediaError, MediaResult};

type VoiceSlot = Arc<Mutex<Option<Arc<Voice>>>>;

/// CPAL output stream that pulls from the attached voice on the audio thread.
pub struct CpalOutput {
    /// Keeps the audio thread alive.
    _stream: Stream,
    slot: VoiceSlot,
    format: DeviceFormat,
}

impl std::fmt::Debug for CpalOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpalOutput")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl CpalOutput {
    /// Open the default output device at its preferred rate and channel count.
    pub fn open_default() -> MediaResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| MediaError::playback("no audio output device found"))?;
        let preferred = device
            .default_output_config()
            .map_err(|e| MediaError::playback(format!("no default output config: {e}")))?;
        Self::open(&device, preferred.sample_rate().0, preferred.channels())
    }

    /// Open `device` with an explicit f32 stream format.
    pub fn open(device: &cpal::Device, sample_rate: u32, channels: u16) -> MediaResult<Self> {
        tracing::info!(
            device = device
                .name()
                .unwrap_or_else(|_| "unknown".to_string())
                .as_str(),
            sample_rate,
            channels,
            "using audio output device"
        );

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };
        let format = DeviceFormat {
            sample_rate,
            channels,
        };

        let slot: VoiceSlot = Arc::new(Mutex::new(None));
        let slot_cb = Arc::clone(&slot);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    match slot_cb.lock().as_ref() {
                        Some(voice) => {
                            voice.render(data, format);
                        }
                        None => data.fill(0.0),
                    }
                },
                move |err| {
                    tracing::error!(error = %err, "audio output stream error");
                },
                None,
            )
            .map_err(|e| MediaError::playback(format!("failed to build output stream: {e}")))?;
        stream
            .play()
            .map_err(|e| MediaError::playback(format!("failed to start output stream: {e}")))?;

        Ok(Self {
            _stream: stream,
            slot,
            format,
        })
    }
}

impl OutputDevice for CpalOutput {
    fn format(&self) -> DeviceFormat {
        self.format
    }

    fn attach(&mut self, voice: Arc<Voice>) -> MediaResult<()> {
        *self.slot.lock() = Some(voice);
        Ok(())
    }

    fn detach(&mut self) {
        *self.slot.lock() = None;
    }
}
