use crate::assets::artifact::EncodedArtifact;
use crate::assets::decode::{RawImage, decode_image};
use crate::assets::fonts::FontBook;
use crate::compose::crop::{crop_rect, crop_to_surface};
use crate::compose::encode::{EncodeOptions, encode_raw};
use crate::compose::filters::{apply_color_matrix_premul, filter_matrix};
use crate::compose::options::EditOptions;
use crate::compose::overlay::draw_text_overlay;
use crate::foundation::error::{MediaError, MediaResult};

/// Default surface ceiling: 64 megapixels.
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 64 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositorOpts {
    pub encode: EncodeOptions,
    /// Surfaces above this many pixels fail instead of allocating.
    pub max_surface_pixels: u64,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            encode: EncodeOptions::default(),
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
        }
    }
}

/// Crop, filter, overlay and encode pipeline.
///
/// Holds no per-image state: every call starts from the artifact it is given, so repeated calls
/// with the same inputs produce the same bytes.
#[derive(Debug)]
pub struct ImageCompositor {
    fonts: FontBook,
    opts: CompositorOpts,
}

impl ImageCompositor {
    pub fn new(fonts: FontBook, opts: CompositorOpts) -> Self {
        Self { fonts, opts }
    }

    pub fn opts(&self) -> CompositorOpts {
        self.opts
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Decode `artifact`, apply `options` and re-encode.
    ///
    /// Every failure surfaces as [`MediaError::Composition`].
    #[tracing::instrument(skip(self, artifact, options), fields(encoded_len = artifact.encoded_len()))]
    pub fn compose_image(
        &mut self,
        artifact: &EncodedArtifact,
        options: &EditOptions,
    ) -> MediaResult<EncodedArtifact> {
        let bytes = artifact.to_bytes().map_err(MediaError::into_composition)?;
        let out = self.compose_bytes(&bytes, options)?;
        Ok(EncodedArtifact::from_bytes(&out))
    }

    /// Same as [`ImageCompositor::compose_image`] on raw encoded image bytes.
    pub fn compose_bytes(&mut self, bytes: &[u8], options: &EditOptions) -> MediaResult<Vec<u8>> {
        let src = decode_image(bytes).map_err(MediaError::into_composition)?;
        self.compose_raw(&src, options)
    }

    /// Render and encode an already decoded raster.
    pub fn compose_raw(&mut self, src: &RawImage, options: &EditOptions) -> MediaResult<Vec<u8>> {
        let composed = self.render(src, options)?;
        encode_raw(&composed, self.opts.encode).map_err(MediaError::into_composition)
    }

    /// Run crop, filters and overlay without encoding.
    pub fn render(&mut self, src: &RawImage, options: &EditOptions) -> MediaResult<RawImage> {
        self.render_inner(src, options)
            .map_err(MediaError::into_composition)
    }

    fn render_inner(&mut self, src: &RawImage, options: &EditOptions) -> MediaResult<RawImage> {
        let rect = crop_rect(src.size(), options.aspect_ratio);
        tracing::debug!(
            src_w = src.width,
            src_h = src.height,
            x = rect.x,
            y = rect.y,
            w = rect.width,
            h = rect.height,
            "crop"
        );
        let mut surface = crop_to_surface(src, rect, self.opts.max_surface_pixels)?;

        match filter_matrix(options) {
            Some(m) => {
                tracing::debug!(
                    brightness = options.brightness,
                    contrast = options.contrast,
                    grayscale = options.grayscale,
                    sepia = options.sepia,
                    "applying filters"
                );
                apply_color_matrix_premul(surface.data_mut(), &m);
            }
            None => tracing::debug!("filters at identity; skipped"),
        }

        if options.overlay_visible() {
            draw_text_overlay(&mut surface, &mut self.fonts, &options.text_overlay)?;
        } else {
            tracing::debug!("text overlay hidden");
        }

        Ok(surface.into_raw())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
