//! Caller-side editing state around the compositor.
//!
//! Tracks the current source artifact and options, hands out preview tickets, and discards
//! preview results that no longer match what the caller is editing. Composition itself has no
//! cancellation; a late result is simply dropped here.

use crate::assets::artifact::EncodedArtifact;
use crate::compose::compositor::ImageCompositor;
use crate::compose::options::EditOptions;
use crate::foundation::error::{MediaError, MediaResult};

/// Identifies the `(source, options)` pair a preview was rendered from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PreviewTicket {
    generation: u64,
    revision: u64,
}

/// Inputs for one preview render, detached from the session.
#[derive(Clone, Debug)]
pub struct PreviewRequest {
    pub ticket: PreviewTicket,
    pub source: EncodedArtifact,
    pub options: EditOptions,
}

#[derive(Debug, Default)]
pub struct EditSession {
    source: Option<EncodedArtifact>,
    options: EditOptions,
    /// Bumped whenever the source is replaced.
    generation: u64,
    /// Bumped whenever options change.
    revision: u64,
    preview: Option<(PreviewTicket, EncodedArtifact)>,
    baked: Option<EncodedArtifact>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: EncodedArtifact) -> Self {
        let mut s = Self::new();
        s.replace_source(source);
        s
    }

    /// Swap in a newly generated source. Options reset to identity and earlier previews and
    /// baked output are dropped.
    pub fn replace_source(&mut self, source: EncodedArtifact) {
        self.source = Some(source);
        self.options = EditOptions::identity();
        self.generation += 1;
        self.revision += 1;
        self.preview = None;
        self.baked = None;
        tracing::debug!(generation = self.generation, "edit source replaced");
    }

    pub fn source(&self) -> Option<&EncodedArtifact> {
        self.source.as_ref()
    }

    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EditOptions) {
        if options != self.options {
            self.options = options;
            self.revision += 1;
        }
    }

    /// Edit options in place.
    pub fn update_options(&mut self, f: impl FnOnce(&mut EditOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    fn current_ticket(&self) -> PreviewTicket {
        PreviewTicket {
            generation: self.generation,
            revision: self.revision,
        }
    }

    /// Snapshot what a preview render needs.
    pub fn request_preview(&self) -> MediaResult<PreviewRequest> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| MediaError::validation("no source artifact to preview"))?;
        Ok(PreviewRequest {
            ticket: self.current_ticket(),
            source,
            options: self.options.clone(),
        })
    }

    /// Whether a ticket still matches the current source and options.
    pub fn is_current(&self, ticket: PreviewTicket) -> bool {
        ticket == self.current_ticket()
    }

    /// Keep a finished preview if it is still current. Returns `false` when it was discarded.
    pub fn accept_preview(&mut self, ticket: PreviewTicket, artifact: EncodedArtifact) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, "discarding stale preview");
            return false;
        }
        self.preview = Some((ticket, artifact));
        true
    }

    /// Latest accepted preview, if it still matches the current state.
    pub fn preview(&self) -> Option<&EncodedArtifact> {
        self.preview
            .as_ref()
            .filter(|(t, _)| self.is_current(*t))
            .map(|(_, a)| a)
    }

    /// Render a preview synchronously and keep it.
    pub fn render_preview(
        &mut self,
        compositor: &mut ImageCompositor,
    ) -> MediaResult<&EncodedArtifact> {
        let req = self.request_preview()?;
        let out = compositor.compose_image(&req.source, &req.options)?;
        Ok(&self.preview.insert((req.ticket, out)).1)
    }

    /// Compose the final artifact from the current source and options.
    ///
    /// On failure the previously baked artifact, if any, is left as it was.
    pub fn bake(&mut self, compositor: &mut ImageCompositor) -> MediaResult<&EncodedArtifact> {
        let req = self.request_preview()?;
        let out = compositor.compose_image(&req.source, &req.options)?;
        Ok(self.baked.insert(out))
    }

    pub fn baked(&self) -> Option<&EncodedArtifact> {
        self.baked.as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/edit_session.rs"]
mod tests;
