//! Registered font faces and text layout.
//!
//! Callers register font bytes, files or directories, and overlay text resolves its CSS-style
//! family list against what was registered. A book with nothing registered borrows one installed
//! system family on first use, unless it was built with [`FontBook::without_system_fonts`].

use std::borrow::Cow;
use std::path::Path;

use crate::compose::options::FontWeightKind;
use crate::foundation::error::{MediaError, MediaResult};

const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// One registered face.
#[derive(Clone, Debug)]
pub(crate) struct FontFace {
    pub(crate) family: String,
    pub(crate) weight: f32,
}

/// Shaped text; each glyph run carries the font Parley picked for it.
pub(crate) struct ShapedText {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
}

impl ShapedText {
    pub(crate) fn width(&self) -> f32 {
        self.layout.width()
    }

    pub(crate) fn height(&self) -> f32 {
        self.layout.height()
    }
}

/// Font registry and Parley layout contexts.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: Vec<FontFace>,
    system_fallback: bool,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.faces)
            .field("system_fallback", &self.system_fallback)
            .finish_non_exhaustive()
    }
}

impl FontBook {
    /// Empty book that falls back to an installed system family when nothing is registered.
    pub fn new() -> Self {
        Self::with_system_fallback(true)
    }

    /// Empty book that only ever uses registered fonts, so output does not depend on the host.
    pub fn without_system_fonts() -> Self {
        Self::with_system_fallback(false)
    }

    fn with_system_fallback(system_fallback: bool) -> Self {
        // Shaping only sees registered faces; system families are copied in explicitly.
        let font_ctx = parley::FontContext {
            collection: parley::fontique::Collection::new(parley::fontique::CollectionOptions {
                shared: false,
                system_fonts: false,
            }),
            source_cache: parley::fontique::SourceCache::default(),
        };
        Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
            system_fallback,
        }
    }

    /// Register every face contained in `bytes` (TTF, OTF or a collection).
    ///
    /// Returns the family names that were added.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> MediaResult<Vec<String>> {
        let registered = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        if registered.is_empty() {
            return Err(MediaError::validation(
                "no font families registered from font bytes",
            ));
        }

        let mut families = Vec::new();
        for (family_id, infos) in registered {
            let family = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| MediaError::validation("registered font family has no name"))?
                .to_string();
            for info in infos {
                self.faces.push(FontFace {
                    family: family.clone(),
                    weight: info.weight().value(),
                });
            }
            tracing::debug!(family = %family, "registered font family");
            families.push(family);
        }
        Ok(families)
    }

    /// Read and register a font file.
    pub fn register_file(&mut self, path: &Path) -> MediaResult<Vec<String>> {
        let bytes = std::fs::read(path).map_err(|e| {
            MediaError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        self.register_font(bytes)
    }

    /// Register every `.ttf`, `.otf`, `.ttc` and `.otc` file directly inside `dir`.
    ///
    /// Files are visited in name order so registration is reproducible. Returns the number of
    /// files registered; unreadable faces are skipped with a warning.
    pub fn register_dir(&mut self, dir: &Path) -> MediaResult<usize> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            MediaError::validation(format!(
                "failed to read font directory '{}': {e}",
                dir.display()
            ))
        })?;
        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| is_font_file(p))
            .collect();
        paths.sort();

        let mut count = 0usize;
        for p in paths {
            match self.register_file(&p) {
                Ok(_) => count += 1,
                Err(e) => tracing::warn!(path = %p.display(), error = %e, "skipping font file"),
            }
        }
        Ok(count)
    }

    /// Distinct registered family names, in registration order.
    pub fn families(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for f in &self.faces {
            if !out.iter().any(|x| x == &f.family) {
                out.push(f.family.clone());
            }
        }
        out
    }

    /// Return `true` when no face has been registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Like [`FontBook::resolve`], but first borrows a system family when the book is empty and
    /// system fallback is enabled.
    pub(crate) fn face_for(
        &mut self,
        family_list: &str,
        weight: FontWeightKind,
    ) -> Option<FontFace> {
        if self.faces.is_empty() && self.system_fallback {
            // one attempt per book
            self.system_fallback = false;
            self.load_system_family(family_list);
        }
        self.resolve(family_list, weight).cloned()
    }

    /// Register the first installed family matching `family_list`, else any sans-serif family.
    fn load_system_family(&mut self, family_list: &str) {
        let mut system = parley::fontique::Collection::new(parley::fontique::CollectionOptions {
            shared: false,
            system_fonts: true,
        });
        let mut cache = parley::fontique::SourceCache::default();

        let mut candidates = Vec::new();
        for name in split_families(family_list) {
            match parley::fontique::GenericFamily::parse(&name.to_ascii_lowercase()) {
                Some(generic) => {
                    let ids: Vec<_> = system.generic_families(generic).collect();
                    candidates.extend(ids.into_iter().filter_map(|id| system.family(id)));
                }
                None => candidates.extend(system.family_by_name(name)),
            }
        }
        let ids: Vec<_> = system
            .generic_families(parley::fontique::GenericFamily::SansSerif)
            .collect();
        candidates.extend(ids.into_iter().filter_map(|id| system.family(id)));

        for family in candidates {
            let Some(blob) = family.fonts().iter().find_map(|f| f.load(Some(&mut cache))) else {
                continue;
            };
            match self.register_font(blob.data().to_vec()) {
                Ok(_) => {
                    tracing::info!(family = family.name(), "using system font family");
                    return;
                }
                Err(e) => {
                    tracing::debug!(family = family.name(), error = %e, "skipping system family")
                }
            }
        }
        tracing::warn!(requested = family_list, "no usable system font found");
    }

    /// Resolve a CSS-style family list (`"Inter, sans-serif"`) and weight to a face.
    ///
    /// Named families match case-insensitively; generic families and misses fall back to the
    /// first registered family. Within a family the face closest to the requested weight wins.
    pub(crate) fn resolve(&self, family_list: &str, weight: FontWeightKind) -> Option<&FontFace> {
        let first = self.faces.first()?;
        let names: Vec<&str> = split_families(family_list)
            .filter(|s| !GENERIC_FAMILIES.contains(&s.to_ascii_lowercase().as_str()))
            .collect();
        let wanted = names.iter().find_map(|name| {
            self.faces
                .iter()
                .find(|f| f.family.eq_ignore_ascii_case(name))
                .map(|f| f.family.as_str())
        });

        let family = match wanted {
            Some(f) => f,
            None => {
                if !names.is_empty() {
                    tracing::warn!(
                        requested = family_list,
                        fallback = %first.family,
                        "font family not registered; using fallback"
                    );
                }
                first.family.as_str()
            }
        };

        let target = weight.css_weight();
        self.faces
            .iter()
            .filter(|f| f.family == family)
            .min_by(|a, b| {
                (a.weight - target)
                    .abs()
                    .total_cmp(&(b.weight - target).abs())
            })
    }

    /// Shape single-line text with the resolved face.
    pub(crate) fn shape(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> MediaResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MediaError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(face.weight),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(ShapedText { layout })
    }
}

fn split_families(list: &str) -> impl Iterator<Item = &str> {
    list.split(',')
        .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|s| !s.is_empty())
}

fn is_font_file(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc" | "otc"))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
