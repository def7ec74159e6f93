//! Soft edges for drop shadows.
//!
//! A shadow is one flat color, so only its coverage is blurred: an 8-bit [`AlphaMask`] goes
//! through two 1-D passes and is tinted afterwards. Samples outside the mask count as empty, which
//! matches a shadow fading out into transparent surroundings.

use crate::foundation::error::{MediaError, MediaResult};

/// Single-channel coverage buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AlphaMask {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
}

impl AlphaMask {
    /// Empty mask, failing instead of aborting when memory is short.
    pub(crate) fn new(width: u32, height: u32) -> MediaResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| MediaError::composition("shadow mask size overflow"))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            MediaError::composition(format!("failed to allocate {width}x{height} shadow mask: {e}"))
        })?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[cfg(test)]
    pub(crate) fn at(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub(crate) fn set(&mut self, x: u32, y: u32, v: u8) {
        let w = self.width as usize;
        self.data[y as usize * w + x as usize] = v;
    }

    /// Gaussian blur with `radius` taps each side.
    pub(crate) fn blurred(&self, radius: u32, sigma: f32) -> MediaResult<Self> {
        if radius == 0 || self.data.is_empty() {
            return Ok(self.clone());
        }
        let taps = gaussian_taps(radius, sigma)?;
        let (w, h) = (self.width as usize, self.height as usize);

        let mut rows = Self::new(self.width, self.height)?;
        convolve_lines(&self.data, &mut rows.data, h, w, w, 1, &taps);
        let mut out = Self::new(self.width, self.height)?;
        convolve_lines(&rows.data, &mut out.data, w, h, 1, w, &taps);
        Ok(out)
    }
}

/// Q16 Gaussian taps summing to exactly 65536.
///
/// Each tap is the difference of consecutive rounded cumulative sums, so rounding error never
/// accumulates.
pub(crate) fn gaussian_taps(radius: u32, sigma: f32) -> MediaResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(MediaError::composition(format!(
            "shadow blur sigma must be finite and > 0 (got {sigma})"
        )));
    }
    let r = i64::from(radius);
    let two_s2 = 2.0 * f64::from(sigma).powi(2);
    let raw: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / two_s2).exp())
        .collect();
    let total: f64 = raw.iter().sum();

    let mut taps = Vec::with_capacity(raw.len());
    let mut cumulative = 0.0f64;
    let mut prev = 0u32;
    for (i, w) in raw.iter().enumerate() {
        cumulative += w / total;
        let q = if i + 1 == raw.len() {
            65_536
        } else {
            ((cumulative * 65_536.0).round() as u32).min(65_536)
        };
        taps.push(q.saturating_sub(prev));
        prev = prev.max(q);
    }
    Ok(taps)
}

/// Convolve `lines` independent 1-D lines of `len` samples.
///
/// Line `n` starts at `n * line_stride`; consecutive samples are `step` apart.
fn convolve_lines(
    src: &[u8],
    dst: &mut [u8],
    lines: usize,
    len: usize,
    line_stride: usize,
    step: usize,
    taps: &[u32],
) {
    let r = (taps.len() / 2) as isize;
    for line in 0..lines {
        let base = line * line_stride;
        for i in 0..len {
            let lo = (i as isize - r).max(0) as usize;
            let hi = (i as isize + r).min(len as isize - 1) as usize;
            let mut acc = 0u32;
            for j in lo..=hi {
                let t = (j as isize - i as isize + r) as usize;
                acc += taps[t] * u32::from(src[base + j * step]);
            }
            dst[base + i * step] = ((acc + 0x8000) >> 16).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blur.rs"]
mod tests;
