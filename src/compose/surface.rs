//! Raster canvas with explicit, scoped drawing state.
//!
//! Opacity and shadow live in a [`DrawState`] that is only ever changed inside
//! [`Surface::scoped`], which restores the previous state when the closure returns (including on
//! error). A draw therefore cannot leak its opacity or shadow into the next one.

use crate::assets::decode::RawImage;
use crate::compose::blur::AlphaMask;
use crate::compose::composite::over;
use crate::foundation::core::Size;
use crate::foundation::error::{MediaError, MediaResult};
use crate::foundation::math::mul_div255_u8;

/// Drop shadow applied to every layer drawn while it is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowStyle {
    /// Horizontal offset in pixels.
    pub offset_x: i32,
    /// Vertical offset in pixels.
    pub offset_y: i32,
    /// Blur amount, canvas convention: Gaussian sigma is half of this.
    pub blur: f32,
    /// Straight-alpha shadow color.
    pub color: [u8; 4],
}

impl ShadowStyle {
    /// The fixed soft shadow used under overlay text.
    pub const SOFT: Self = Self {
        offset_x: 2,
        offset_y: 2,
        blur: 4.0,
        color: [0, 0, 0, 128],
    };

    fn sigma(self) -> f32 {
        self.blur / 2.0
    }

    fn kernel_radius(self) -> u32 {
        (self.sigma() * 3.0).ceil().max(0.0) as u32
    }

    /// How far the shadow can reach beyond the layer bounds.
    fn margin(self) -> u32 {
        self.kernel_radius() + self.offset_x.unsigned_abs().max(self.offset_y.unsigned_abs())
    }
}

/// Transient drawing properties.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    /// Global opacity in `[0, 1]`.
    pub opacity: f32,
    /// Optional drop shadow.
    pub shadow: Option<ShadowStyle>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            shadow: None,
        }
    }
}

/// Premultiplied RGBA8 layer placed at an integer offset on a surface.
#[derive(Clone, Debug)]
pub(crate) struct Layer {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
}

/// Allocate a zeroed RGBA8 buffer, failing instead of aborting when memory is short.
pub(crate) fn alloc_rgba8(size: Size, max_pixels: u64) -> MediaResult<Vec<u8>> {
    if size.width == 0 || size.height == 0 {
        return Err(MediaError::composition(format!(
            "cannot allocate {}x{} surface",
            size.width, size.height
        )));
    }
    if size.pixel_count() > max_pixels {
        return Err(MediaError::composition(format!(
            "surface {}x{} exceeds the {max_pixels} pixel limit",
            size.width, size.height
        )));
    }
    let len = size
        .rgba8_len()
        .ok_or_else(|| MediaError::composition("surface size overflow"))?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        MediaError::composition(format!(
            "failed to allocate {}x{} surface: {e}",
            size.width, size.height
        ))
    })?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Mutable raster the compositor draws into.
#[derive(Debug)]
pub struct Surface {
    size: Size,
    data: Vec<u8>,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl Surface {
    /// Transparent surface of `size`.
    pub(crate) fn new(size: Size, max_pixels: u64) -> MediaResult<Self> {
        Ok(Self {
            size,
            data: alloc_rgba8(size, max_pixels)?,
            state: DrawState::default(),
            saved: Vec::new(),
        })
    }

    /// Pixel dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Premultiplied RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Current drawing state.
    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Number of saved states not yet restored.
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    pub(crate) fn set_opacity(&mut self, opacity: f32) {
        self.state.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    pub(crate) fn set_shadow(&mut self, shadow: Option<ShadowStyle>) {
        self.state.shadow = shadow;
    }

    /// Run `f` with a saved copy of the drawing state that is restored afterwards.
    pub(crate) fn scoped<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> MediaResult<R>,
    ) -> MediaResult<R> {
        self.saved.push(self.state);
        let out = f(self);
        if let Some(prev) = self.saved.pop() {
            self.state = prev;
        }
        out
    }

    /// Composite a layer using the current opacity and shadow.
    pub(crate) fn draw_layer(&mut self, layer: &Layer) -> MediaResult<()> {
        if layer.data.len() != (layer.width as usize) * (layer.height as usize) * 4 {
            return Err(MediaError::composition("layer byte length mismatch"));
        }
        let opacity = self.state.opacity;
        if opacity <= 0.0 {
            return Ok(());
        }
        if let Some(shadow) = self.state.shadow {
            let shadow_layer = build_shadow(layer, shadow)?;
            self.blend(&shadow_layer, opacity);
        }
        self.blend(layer, opacity);
        Ok(())
    }

    fn blend(&mut self, layer: &Layer, opacity: f32) {
        let sw = self.size.width as i64;
        let sh = self.size.height as i64;
        let x0 = i64::from(layer.x).max(0);
        let y0 = i64::from(layer.y).max(0);
        let x1 = (i64::from(layer.x) + i64::from(layer.width)).min(sw);
        let y1 = (i64::from(layer.y) + i64::from(layer.height)).min(sh);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for y in y0..y1 {
            let ly = (y - i64::from(layer.y)) as usize;
            for x in x0..x1 {
                let lx = (x - i64::from(layer.x)) as usize;
                let li = (ly * layer.width as usize + lx) * 4;
                let src = [
                    layer.data[li],
                    layer.data[li + 1],
                    layer.data[li + 2],
                    layer.data[li + 3],
                ];
                if src[3] == 0 {
                    continue;
                }
                let di = ((y * sw + x) as usize) * 4;
                let dst = [
                    self.data[di],
                    self.data[di + 1],
                    self.data[di + 2],
                    self.data[di + 3],
                ];
                self.data[di..di + 4].copy_from_slice(&over(dst, src, opacity));
            }
        }
    }

    /// Detach the pixels as a [`RawImage`].
    pub fn into_raw(self) -> RawImage {
        RawImage {
            width: self.size.width,
            height: self.size.height,
            rgba8_premul: self.data,
        }
    }
}

/// Offset and blurred copy of a layer's coverage, tinted with the shadow color.
fn build_shadow(layer: &Layer, shadow: ShadowStyle) -> MediaResult<Layer> {
    let margin = shadow.margin();
    let width = layer.width + 2 * margin;
    let height = layer.height + 2 * margin;

    let [r, g, b, a] = shadow.color;
    let mut mask = AlphaMask::new(width, height)?;
    for ly in 0..layer.height {
        for lx in 0..layer.width {
            let la = layer.data[(ly as usize * layer.width as usize + lx as usize) * 4 + 3];
            if la == 0 {
                continue;
            }
            let tx = (i64::from(lx) + i64::from(margin) + i64::from(shadow.offset_x)) as u32;
            let ty = (i64::from(ly) + i64::from(margin) + i64::from(shadow.offset_y)) as u32;
            mask.set(tx, ty, mul_div255_u8(u16::from(la), u16::from(a)));
        }
    }
    let mask = mask.blurred(shadow.kernel_radius(), shadow.sigma())?;

    let mut data = Vec::new();
    data.try_reserve_exact(mask.data.len() * 4).map_err(|e| {
        MediaError::composition(format!("failed to allocate {width}x{height} shadow: {e}"))
    })?;
    for &m in &mask.data {
        let m16 = u16::from(m);
        data.extend_from_slice(&[
            mul_div255_u8(u16::from(r), m16),
            mul_div255_u8(u16::from(g), m16),
            mul_div255_u8(u16::from(b), m16),
            m,
        ]);
    }
    Ok(Layer {
        x: layer.x - margin as i32,
        y: layer.y - margin as i32,
        width,
        height,
        data,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/surface.rs"]
mod tests;
