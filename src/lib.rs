#![forbid(unsafe_code)]
//! Post-processing for generated media.
//!
//! Images: decode an encoded artifact, center-crop to an aspect ratio, apply a composed tone
//! filter, draw a text overlay and re-encode ([`ImageCompositor`]). Audio: decode raw s16le PCM
//! into an [`AudioBuffer`] and play it through a [`PlaybackController`] that allows one audible
//! session at a time.

pub mod assets;
pub mod audio;
pub mod compose;
pub mod config;
pub mod foundation;
pub mod session;

pub use assets::artifact::{EncodedArtifact, decode, encode};
pub use assets::color::OverlayColor;
pub use assets::decode::{RawImage, decode_image};
pub use assets::fonts::FontBook;
pub use audio::buffer::AudioBuffer;
#[cfg(feature = "cpal")]
pub use audio::cpal_output::CpalOutput;
pub use audio::output::{DeviceFormat, MemoryOutput, OutputDevice};
pub use audio::pcm::{PcmFormat, decode_audio, decode_audio_with, decode_pcm};
pub use audio::playback::{
    Completion, PlaybackController, PlaybackSession, PlaybackState, SessionEnd, Voice,
};
pub use compose::compositor::{CompositorOpts, ImageCompositor};
pub use compose::crop::crop_rect;
pub use compose::encode::{EncodeOptions, OutputFormat};
pub use compose::filters::{ColorMatrix, filter_matrix};
pub use compose::options::{AspectRatio, EditOptions, FontWeightKind, OverlayPosition, TextOverlay};
pub use compose::overlay::overlay_origin;
pub use config::EngineConfig;
pub use foundation::core::{PixelRect, Size};
pub use foundation::error::{MediaError, MediaResult};
pub use session::edit_session::{EditSession, PreviewRequest, PreviewTicket};
