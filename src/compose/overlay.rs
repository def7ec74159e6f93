//! Text overlay: placement, rasterization and scoped drawing.

use crate::assets::fonts::{FontBook, ShapedText, TextBrushRgba8};
use crate::compose::options::{OverlayPosition, TextOverlay};
use crate::compose::surface::{Layer, ShadowStyle, Surface};
use crate::foundation::core::Size;
use crate::foundation::error::{MediaError, MediaResult};

/// Top-left corner of the text block: horizontally centered, half a font size from the
/// anchored edge.
///
/// Returns `None` when the overlay is positioned nowhere.
pub fn overlay_origin(
    canvas: Size,
    text_width: f32,
    text_height: f32,
    font_size: f32,
    position: OverlayPosition,
) -> Option<(f32, f32)> {
    let pad = font_size / 2.0;
    let x = (canvas.width as f32 - text_width) / 2.0;
    let y = match position {
        OverlayPosition::Top => pad,
        OverlayPosition::Bottom => canvas.height as f32 - pad - text_height,
        OverlayPosition::None => return None,
    };
    Some((x, y))
}

/// Draw `overlay` onto `surface` if it is visible.
///
/// Opacity and shadow are set inside a scope so they never reach later draws.
pub(crate) fn draw_text_overlay(
    surface: &mut Surface,
    fonts: &mut FontBook,
    overlay: &TextOverlay,
) -> MediaResult<()> {
    if !overlay.is_visible() {
        return Ok(());
    }
    if !overlay.font_size.is_finite() || overlay.font_size <= 0.0 {
        return Err(MediaError::composition(format!(
            "overlay font size must be finite and > 0 (got {})",
            overlay.font_size
        )));
    }

    let face = fonts
        .face_for(&overlay.font_family, overlay.font_weight)
        .ok_or_else(|| MediaError::composition("no font available for text overlay"))?;
    let c = overlay.color;
    let shaped = fonts.shape(
        &overlay.text,
        &face,
        overlay.font_size,
        TextBrushRgba8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        },
    )?;

    let Some((x, y)) = overlay_origin(
        surface.size(),
        shaped.width(),
        shaped.height(),
        overlay.font_size,
        overlay.position,
    ) else {
        return Ok(());
    };
    let layer = rasterize_text(&shaped, x, y)?;
    tracing::debug!(
        x = layer.x,
        y = layer.y,
        width = layer.width,
        height = layer.height,
        "drawing text overlay"
    );

    surface.scoped(|s| {
        s.set_opacity(overlay.opacity);
        s.set_shadow(overlay.shadow.then_some(ShadowStyle::SOFT));
        s.draw_layer(&layer)
    })
}

/// Rasterize shaped text into a premultiplied layer whose top-left lands at `(x, y)`.
///
/// The layer origin is snapped to whole pixels and the sub-pixel remainder carried into the glyph
/// transform.
fn rasterize_text(shaped: &ShapedText, x: f32, y: f32) -> MediaResult<Layer> {
    let ox = x.floor();
    let oy = y.floor();
    let width = (shaped.width() + (x - ox)).ceil().max(1.0) as u32 + 1;
    let height = (shaped.height() + (y - oy)).ceil().max(1.0) as u32 + 1;
    let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(MediaError::composition(format!(
            "text block {width}x{height} is too large to rasterize"
        )));
    };

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        f64::from(x - ox),
        f64::from(y - oy),
    )));

    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(run.run().font())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(Layer {
        x: ox as i32,
        y: oy as i32,
        width,
        height,
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/overlay.rs"]
mod tests;
