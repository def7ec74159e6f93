pub mod buffer;
#[cfg(feature = "cpal")]
pub mod cpal_output;
pub mod output;
pub mod pcm;
pub mod playback;
