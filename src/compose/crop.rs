use crate::assets::decode::RawImage;
use crate::compose::options::AspectRatio;
use crate::compose::surface::Surface;
use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::{MediaError, MediaResult};

/// Centered crop rectangle reaching `aspect` without scaling.
///
/// Integer cross-multiplication decides which axis is trimmed so exact ratios never crop.
/// The kept extent is floored and the discarded margin split evenly, the odd pixel going to the
/// far edge.
pub fn crop_rect(src: Size, aspect: AspectRatio) -> PixelRect {
    let Some((tw, th)) = aspect.terms() else {
        return PixelRect::full(src);
    };
    let (sw, sh) = (u64::from(src.width), u64::from(src.height));
    let (tw, th) = (u64::from(tw), u64::from(th));

    if tw * sh > th * sw {
        let height = (sw * th / tw).clamp(1, sh) as u32;
        PixelRect {
            x: 0,
            y: (src.height - height) / 2,
            width: src.width,
            height,
        }
    } else {
        let width = (sh * tw / th).clamp(1, sw) as u32;
        PixelRect {
            x: (src.width - width) / 2,
            y: 0,
            width,
            height: src.height,
        }
    }
}

/// Copy `rect` out of `src` into a freshly allocated surface.
pub(crate) fn crop_to_surface(
    src: &RawImage,
    rect: PixelRect,
    max_pixels: u64,
) -> MediaResult<Surface> {
    if !rect.fits_within(src.size()) {
        return Err(MediaError::composition(format!(
            "crop {rect:?} exceeds source {}x{}",
            src.width, src.height
        )));
    }
    let mut surface = Surface::new(rect.size(), max_pixels)?;

    let src_stride = src.width as usize * 4;
    let row_len = rect.width as usize * 4;
    let x0 = rect.x as usize * 4;
    let dst = surface.data_mut();
    for row in 0..rect.height as usize {
        let sy = rect.y as usize + row;
        let s = sy * src_stride + x0;
        let d = row * row_len;
        dst[d..d + row_len].copy_from_slice(&src.rgba8_premul[s..s + row_len]);
    }
    Ok(surface)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/crop.rs"]
mod tests;
