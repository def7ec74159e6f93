use anyhow::Context;

use crate::foundation::core::Size;
use crate::foundation::error::{MediaError, MediaResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster in premultiplied RGBA8 form.
///
/// Owned by a single composition call and rebuilt from the encoded artifact each time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

impl RawImage {
    /// Build from straight (non-premultiplied) RGBA8 pixels.
    pub fn from_rgba8_straight(width: u32, height: u32, mut rgba: Vec<u8>) -> MediaResult<Self> {
        let expected = Size { width, height }
            .rgba8_len()
            .ok_or_else(|| MediaError::decode("image buffer size overflow"))?;
        if rgba.len() != expected {
            return Err(MediaError::decode(format!(
                "rgba8 buffer length {} does not match {width}x{height}",
                rgba.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: rgba,
        })
    }

    /// Pixel dimensions.
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

/// Decode any raster format the `image` crate recognizes.
pub fn decode_image(bytes: &[u8]) -> MediaResult<RawImage> {
    if bytes.is_empty() {
        return Err(MediaError::decode("image payload is empty"));
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(MediaError::decode("decoded image has zero area"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(RawImage {
        width,
        height,
        rgba8_premul,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
