//! The decorative frame drawn above the photo.

use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::{SourceImage, decode_image};
use crate::foundation::core::SurfaceSize;
use crate::foundation::error::{FrameError, FrameResult};

/// Overlay frame asset, stretched over the whole surface at render time.
#[derive(Clone, Debug)]
pub enum OverlayFrame {
    /// Bitmap frame (PNG with a transparent window, typically).
    Raster(SourceImage),
    /// Vector frame, rasterized per target size so exports stay crisp.
    Vector(Arc<usvg::Tree>),
}

impl OverlayFrame {
    /// Parse overlay bytes, treating anything that looks like SVG markup as a vector frame.
    pub fn from_bytes(bytes: &[u8]) -> FrameResult<Self> {
        if looks_like_svg(bytes) {
            Self::parse_svg(bytes)
        } else {
            Ok(Self::Raster(decode_image(bytes)?))
        }
    }

    pub fn parse_svg(bytes: &[u8]) -> FrameResult<Self> {
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(bytes, &opts)
            .context("parse svg tree")
            .map_err(|e| FrameError::decode(format!("{e:#}")))?;
        Ok(Self::Vector(Arc::new(tree)))
    }

    /// Rasterize a vector frame to premultiplied RGBA8, stretched to `size`.
    pub(crate) fn rasterize_vector(tree: &usvg::Tree, size: SurfaceSize) -> FrameResult<Vec<u8>> {
        let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width, size.height)
            .ok_or_else(|| FrameError::validation("failed to allocate overlay pixmap"))?;

        let tree_size = tree.size();
        if !(tree_size.width() > 0.0 && tree_size.height() > 0.0) {
            return Err(FrameError::validation("svg overlay has invalid width/height"));
        }
        let sx = (size.width as f32) / tree_size.width();
        let sy = (size.height as f32) / tree_size.height();
        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

        resvg::render(tree, xform, &mut pixmap.as_mut());
        Ok(pixmap.data().to_vec())
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Load lifecycle of the process-wide overlay.
///
/// Only [`OverlaySlot::Ready`] is ever drawn; a pending or failed overlay renders as absent.
#[derive(Clone, Debug, Default)]
pub enum OverlaySlot {
    #[default]
    Pending,
    Ready(Arc<OverlayFrame>),
    Unavailable,
}

impl OverlaySlot {
    /// Settle the slot from a finished fetch/decode.
    pub fn resolve(result: FrameResult<OverlayFrame>) -> Self {
        match result {
            Ok(frame) => Self::Ready(Arc::new(frame)),
            Err(err) => {
                tracing::warn!(error = %err, "overlay frame unavailable, rendering without it");
                Self::Unavailable
            }
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::resolve(OverlayFrame::from_bytes(bytes))
    }

    pub fn frame(&self) -> Option<&OverlayFrame> {
        match self {
            Self::Ready(frame) => Some(frame.as_ref()),
            Self::Pending | Self::Unavailable => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/overlay.rs"]
mod tests;
