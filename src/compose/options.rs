//! Declarative compositing parameters shared between the editing UI and the engine.
//!
//! Every field is named and defaulted; unknown keys are rejected so a stale or misspelled UI
//! payload fails loudly instead of silently rendering defaults.

use serde::{Deserialize, Serialize};

use crate::assets::color::OverlayColor;
use crate::foundation::error::{MediaError, MediaResult};

/// Target aspect ratio for the center-crop stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Keep the source geometry.
    #[default]
    #[serde(rename = "original")]
    Original,
    /// Square.
    #[serde(rename = "1:1")]
    Square,
    /// Portrait 4:5.
    #[serde(rename = "4:5")]
    Portrait4x5,
    /// Landscape 16:9.
    #[serde(rename = "16:9")]
    Landscape16x9,
}

impl AspectRatio {
    /// `(w, h)` terms of the ratio, `None` for [`AspectRatio::Original`].
    pub fn terms(self) -> Option<(u32, u32)> {
        match self {
            Self::Original => None,
            Self::Square => Some((1, 1)),
            Self::Portrait4x5 => Some((4, 5)),
            Self::Landscape16x9 => Some((16, 9)),
        }
    }
}

/// Vertical anchor of the overlay text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPosition {
    /// Anchored below the top edge.
    Top,
    /// Anchored above the bottom edge.
    #[default]
    Bottom,
    /// Text is kept but not drawn.
    None,
}

/// Overlay font weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeightKind {
    /// CSS weight 400.
    Normal,
    /// CSS weight 700.
    #[default]
    Bold,
}

impl FontWeightKind {
    /// Numeric CSS weight.
    pub fn css_weight(self) -> f32 {
        match self {
            Self::Normal => 400.0,
            Self::Bold => 700.0,
        }
    }
}

/// Text drawn over the composed image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct TextOverlay {
    /// Text content; empty means no overlay.
    pub text: String,
    /// Vertical anchor.
    pub position: OverlayPosition,
    /// Fill color.
    pub color: OverlayColor,
    /// CSS-style family list.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Font weight.
    pub font_weight: FontWeightKind,
    /// Global opacity in `[0, 1]`.
    pub opacity: f32,
    /// Fixed soft drop shadow.
    pub shadow: bool,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: OverlayPosition::Bottom,
            color: OverlayColor::WHITE,
            font_family: "sans-serif".to_owned(),
            font_size: 48.0,
            font_weight: FontWeightKind::Bold,
            opacity: 1.0,
            shadow: true,
        }
    }
}

impl TextOverlay {
    /// Whether this overlay produces any pixels.
    ///
    /// Non-empty text with [`OverlayPosition::None`] is a deliberate hidden state.
    pub fn is_visible(&self) -> bool {
        !self.text.is_empty() && self.position != OverlayPosition::None
    }
}

/// Full edit description for one composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EditOptions {
    /// Percent, 50..=150, 100 is identity.
    pub brightness: f32,
    /// Percent, 50..=150, 100 is identity.
    pub contrast: f32,
    /// Percent, 0..=100, 0 is identity.
    pub grayscale: f32,
    /// Percent, 0..=100, 0 is identity.
    pub sepia: f32,
    /// Center-crop target.
    pub aspect_ratio: AspectRatio,
    /// Overlay text and style.
    pub text_overlay: TextOverlay,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            grayscale: 0.0,
            sepia: 0.0,
            aspect_ratio: AspectRatio::Original,
            text_overlay: TextOverlay::default(),
        }
    }
}

impl EditOptions {
    /// Identity options; what a caller resets to when the source image changes.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Parse from JSON, rejecting unknown fields.
    pub fn from_json(s: &str) -> MediaResult<Self> {
        serde_json::from_str(s).map_err(|e| MediaError::serde(e.to_string()))
    }

    /// Return `true` when the filter stack is a no-op.
    pub fn has_identity_filters(&self) -> bool {
        self.brightness == 100.0
            && self.contrast == 100.0
            && self.grayscale == 0.0
            && self.sepia == 0.0
    }

    /// Whether the text overlay stage draws anything.
    pub fn overlay_visible(&self) -> bool {
        self.text_overlay.is_visible()
    }

    /// Check documented ranges.
    ///
    /// The compositor does not call this; it is offered to callers that accept options from
    /// untrusted input.
    pub fn validate(&self) -> MediaResult<()> {
        fn in_range(name: &str, v: f32, lo: f32, hi: f32) -> MediaResult<()> {
            if !v.is_finite() || v < lo || v > hi {
                return Err(MediaError::validation(format!(
                    "{name} must be within {lo}..={hi} (got {v})"
                )));
            }
            Ok(())
        }

        in_range("brightness", self.brightness, 50.0, 150.0)?;
        in_range("contrast", self.contrast, 50.0, 150.0)?;
        in_range("grayscale", self.grayscale, 0.0, 100.0)?;
        in_range("sepia", self.sepia, 0.0, 100.0)?;
        in_range("textOverlay.opacity", self.text_overlay.opacity, 0.0, 1.0)?;
        if !self.text_overlay.font_size.is_finite() || self.text_overlay.font_size <= 0.0 {
            return Err(MediaError::validation("textOverlay.fontSize must be > 0"));
        }
        if self.text_overlay.font_family.trim().is_empty() {
            return Err(MediaError::validation(
                "textOverlay.fontFamily must be non-empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/options.rs"]
mod tests;
