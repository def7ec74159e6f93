//! Tone and color filters.
//!
//! Brightness, contrast, grayscale and sepia are each a 4x5 color matrix (CSS filter
//! semantics). They are composed in that order into one matrix and applied in a single pass, with
//! clamping only on the final result.

use crate::compose::options::EditOptions;

/// Row-major 4x5 matrix over straight RGBA in `[0, 1]`, column 5 is the offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix(pub [f32; 20]);

impl ColorMatrix {
    /// No-op matrix.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    /// `brightness(p%)`: scale color channels.
    pub fn brightness(percent: f32) -> Self {
        let b = percent / 100.0;
        Self::rgb_linear(b, 0.0)
    }

    /// `contrast(p%)`: scale color channels around mid-gray.
    pub fn contrast(percent: f32) -> Self {
        let c = percent / 100.0;
        Self::rgb_linear(c, 0.5 - 0.5 * c)
    }

    /// `grayscale(p%)`: blend towards Rec.709 luma.
    pub fn grayscale(percent: f32) -> Self {
        let g = 1.0 - (percent / 100.0).clamp(0.0, 1.0);
        Self::rgb3x3([
            0.2126 + 0.7874 * g,
            0.7152 - 0.7152 * g,
            0.0722 - 0.0722 * g,
            0.2126 - 0.2126 * g,
            0.7152 + 0.2848 * g,
            0.0722 - 0.0722 * g,
            0.2126 - 0.2126 * g,
            0.7152 - 0.7152 * g,
            0.0722 + 0.9278 * g,
        ])
    }

    /// `sepia(p%)`: blend towards the classic sepia tone matrix.
    pub fn sepia(percent: f32) -> Self {
        let s = 1.0 - (percent / 100.0).clamp(0.0, 1.0);
        Self::rgb3x3([
            0.393 + 0.607 * s,
            0.769 - 0.769 * s,
            0.189 - 0.189 * s,
            0.349 - 0.349 * s,
            0.686 + 0.314 * s,
            0.168 - 0.168 * s,
            0.272 - 0.272 * s,
            0.534 - 0.534 * s,
            0.131 + 0.869 * s,
        ])
    }

    fn rgb_linear(scale: f32, offset: f32) -> Self {
        Self([
            scale, 0.0, 0.0, 0.0, offset, //
            0.0, scale, 0.0, 0.0, offset, //
            0.0, 0.0, scale, 0.0, offset, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }

    fn rgb3x3(m: [f32; 9]) -> Self {
        Self([
            m[0], m[1], m[2], 0.0, 0.0, //
            m[3], m[4], m[5], 0.0, 0.0, //
            m[6], m[7], m[8], 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Matrix equivalent to applying `self` first, then `next`.
    pub fn then(self, next: Self) -> Self {
        let a = &self.0;
        let b = &next.0;
        let mut out = [0.0f32; 20];
        for row in 0..4 {
            for col in 0..5 {
                let mut v = 0.0f32;
                for k in 0..4 {
                    v += b[row * 5 + k] * a[k * 5 + col];
                }
                if col == 4 {
                    v += b[row * 5 + 4];
                }
                out[row * 5 + col] = v;
            }
        }
        Self(out)
    }
}

/// Composed filter matrix for `options`, `None` when every filter is at identity.
pub fn filter_matrix(options: &EditOptions) -> Option<ColorMatrix> {
    if options.has_identity_filters() {
        return None;
    }
    Some(
        ColorMatrix::brightness(options.brightness)
            .then(ColorMatrix::contrast(options.contrast))
            .then(ColorMatrix::grayscale(options.grayscale))
            .then(ColorMatrix::sepia(options.sepia)),
    )
}

/// Apply a color matrix to premultiplied RGBA8 pixels.
pub(crate) fn apply_color_matrix_premul(data: &mut [u8], m: &ColorMatrix) {
    let m = &m.0;
    for px in data.chunks_exact_mut(4) {
        let pa = f32::from(px[3]) / 255.0;
        if pa <= 0.0 {
            continue;
        }

        let inv_a = 1.0 / pa;
        let r = f32::from(px[0]) / 255.0 * inv_a;
        let g = f32::from(px[1]) / 255.0 * inv_a;
        let b = f32::from(px[2]) / 255.0 * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        px[0] = (out_r * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[1] = (out_g * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[2] = (out_b * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/filters.rs"]
mod tests;
