use crate::assets::overlay::OverlayFrame;
use crate::export::encode::{EncodedImage, ExportFormat, encode_surface};
use crate::foundation::core::SurfaceSize;
use crate::foundation::error::FrameResult;
use crate::render::RenderQuality;
use crate::render::cpu::Renderer;
use crate::render::surface::Surface;
use crate::state::transform::TransformState;

/// Thumbnail and full-resolution composites from one save.
///
/// Either side may be missing if its export failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSet {
    pub thumb: Option<EncodedImage>,
    pub full: Option<EncodedImage>,
}

/// Snapshots a transform state at fixed output resolutions.
///
/// Every call allocates its own surface, so calls are independent and may run in parallel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exporter {
    renderer: Renderer,
    format: ExportFormat,
}

impl Exporter {
    pub fn new(renderer: Renderer, format: ExportFormat) -> Self {
        Self { renderer, format }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Export with long side `edge`; failures are logged and yield `None`.
    pub fn export(
        &self,
        state: &TransformState,
        overlay: Option<&OverlayFrame>,
        edge: u32,
    ) -> Option<EncodedImage> {
        match self.try_export(state, overlay, edge) {
            Ok(encoded) => Some(encoded),
            Err(err) => {
                tracing::warn!(edge, error = %err, "export failed, omitting image");
                None
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, state, overlay))]
    pub fn try_export(
        &self,
        state: &TransformState,
        overlay: Option<&OverlayFrame>,
        edge: u32,
    ) -> FrameResult<EncodedImage> {
        let size = SurfaceSize::fit_long_side(self.renderer.reference(), edge)?;
        let mut surface = Surface::new(size)?;
        self.renderer
            .render(&mut surface, state, overlay, RenderQuality::High)?;
        encode_surface(&surface, self.format)
    }

    /// Thumbnail and full export of the same state, rendered concurrently.
    pub fn export_pair(
        &self,
        state: &TransformState,
        overlay: Option<&OverlayFrame>,
        thumb_edge: u32,
        full_edge: u32,
    ) -> ExportSet {
        let (thumb, full) = rayon::join(
            || self.export(state, overlay, thumb_edge),
            || self.export(state, overlay, full_edge),
        );
        ExportSet { thumb, full }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
