//! Engine configuration: JSON file plus `POSTMEDIA_*` environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::fonts::FontBook;
use crate::audio::pcm::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE, MAX_CHANNELS, PcmFormat};
use crate::compose::compositor::{CompositorOpts, DEFAULT_MAX_SURFACE_PIXELS};
use crate::compose::encode::{EncodeOptions, OutputFormat};
use crate::foundation::error::{MediaError, MediaResult};

pub const ENV_SAMPLE_RATE: &str = "POSTMEDIA_SAMPLE_RATE";
pub const ENV_FONT_DIR: &str = "POSTMEDIA_FONT_DIR";
pub const ENV_IMAGE_FORMAT: &str = "POSTMEDIA_IMAGE_FORMAT";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ImageConfig {
    pub format: OutputFormat,
    /// `None` keeps the codec default.
    pub jpeg_quality: Option<u8>,
    pub max_surface_pixels: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            jpeg_quality: None,
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FontsConfig {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
    /// Borrow an installed family when no font file or directory yields one.
    pub system_fallback: bool,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            dirs: Vec::new(),
            system_fallback: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EngineConfig {
    pub audio: AudioConfig,
    pub image: ImageConfig,
    pub fonts: FontsConfig,
}

impl EngineConfig {
    pub fn from_json(s: &str) -> MediaResult<Self> {
        serde_json::from_str(s).map_err(|e| MediaError::serde(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> MediaResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            MediaError::validation(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json(&s)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|k| std::env::var(k).ok());
    }

    /// Apply overrides from `lookup`. Unparseable values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(rate) = lookup(ENV_SAMPLE_RATE)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            self.audio.sample_rate = rate;
        }
        if let Some(dir) = lookup(ENV_FONT_DIR).filter(|v| !v.trim().is_empty()) {
            let dir = PathBuf::from(dir);
            if !self.fonts.dirs.contains(&dir) {
                self.fonts.dirs.push(dir);
            }
        }
        if let Some(format) = lookup(ENV_IMAGE_FORMAT).and_then(|v| OutputFormat::parse(&v)) {
            self.image.format = format;
        }
    }

    pub fn validate(&self) -> MediaResult<()> {
        if self.audio.sample_rate == 0 {
            return Err(MediaError::validation("audio.sample_rate must be > 0"));
        }
        if self.audio.channels == 0 || self.audio.channels > MAX_CHANNELS {
            return Err(MediaError::validation(format!(
                "audio.channels must be within 1..={MAX_CHANNELS}"
            )));
        }
        if let Some(q) = self.image.jpeg_quality
            && !(1..=100).contains(&q)
        {
            return Err(MediaError::validation(
                "image.jpeg_quality must be within 1..=100",
            ));
        }
        if self.image.max_surface_pixels == 0 {
            return Err(MediaError::validation(
                "image.max_surface_pixels must be > 0",
            ));
        }
        Ok(())
    }

    pub fn pcm_format(&self) -> PcmFormat {
        PcmFormat {
            sample_rate: self.audio.sample_rate,
            channels: self.audio.channels,
        }
    }

    pub fn compositor_opts(&self) -> CompositorOpts {
        CompositorOpts {
            encode: EncodeOptions {
                format: self.image.format,
                jpeg_quality: self.image.jpeg_quality,
            },
            max_surface_pixels: self.image.max_surface_pixels,
        }
    }

    /// Register every configured font file and directory.
    pub fn load_fonts(&self) -> MediaResult<FontBook> {
        let mut book = if self.fonts.system_fallback {
            FontBook::new()
        } else {
            FontBook::without_system_fonts()
        };
        for f in &self.fonts.files {
            book.register_file(f)?;
        }
        for d in &self.fonts.dirs {
            let n = book.register_dir(d)?;
            tracing::debug!(dir = %d.display(), count = n, "registered font directory");
        }
        Ok(book)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
