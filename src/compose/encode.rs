//! Lossy (or lossless) re-encoding of the composed surface.

use std::io::Cursor;

use image::ImageEncoder;
use serde::{Deserialize, Serialize};

use crate::assets::decode::RawImage;
use crate::foundation::error::{MediaError, MediaResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// Container format of the composed artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Baseline JPEG; alpha is dropped.
    #[default]
    Jpeg,
    /// PNG with alpha.
    Png,
}

impl OutputFormat {
    /// MIME type for data URIs.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Parse `jpeg`, `jpg` or `png`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Encoder settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub format: OutputFormat,
    /// JPEG quality 1..=100; `None` keeps the codec default.
    pub jpeg_quality: Option<u8>,
}

/// Encode a premultiplied raster.
pub fn encode_raw(img: &RawImage, opts: EncodeOptions) -> MediaResult<Vec<u8>> {
    let mut rgba = img.rgba8_premul.clone();
    unpremultiply_rgba8_in_place(&mut rgba);

    let mut out = Cursor::new(Vec::new());
    match opts.format {
        OutputFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            let encoder = match opts.jpeg_quality {
                Some(q) => {
                    if !(1..=100).contains(&q) {
                        return Err(MediaError::composition(format!(
                            "jpeg quality must be within 1..=100 (got {q})"
                        )));
                    }
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, q)
                }
                None => image::codecs::jpeg::JpegEncoder::new(&mut out),
            };
            encoder
                .write_image(&rgb, img.width, img.height, image::ExtendedColorType::Rgb8)
                .map_err(|e| MediaError::composition(format!("jpeg encode failed: {e}")))?;
        }
        OutputFormat::Png => {
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(&rgba, img.width, img.height, image::ExtendedColorType::Rgba8)
                .map_err(|e| MediaError::composition(format!("png encode failed: {e}")))?;
        }
    }
    Ok(out.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/encode.rs"]
mod tests;
