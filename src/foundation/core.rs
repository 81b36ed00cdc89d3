use crate::foundation::error::{FrameError, FrameResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Largest edge a raster surface may have (pixmaps are addressed with `u16`).
pub const MAX_SURFACE_EDGE: u32 = u16::MAX as u32;

/// Pixel dimensions of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> FrameResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::validation("surface size must be non-zero"));
        }
        if width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
            return Err(FrameError::validation(format!(
                "surface size {width}x{height} exceeds {MAX_SURFACE_EDGE}px"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn square(edge: u32) -> FrameResult<Self> {
        Self::new(edge, edge)
    }

    /// Dimensions whose long side is `edge` and whose aspect matches `reference`.
    ///
    /// A square reference box yields `edge x edge`.
    pub fn fit_long_side(reference: Size, edge: u32) -> FrameResult<Self> {
        if edge == 0 {
            return Err(FrameError::validation("export edge must be non-zero"));
        }
        let aspect = reference.width / reference.height;
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(FrameError::validation("reference box has no area"));
        }
        let edge_f = f64::from(edge);
        let (w, h) = if aspect >= 1.0 {
            (edge_f, (edge_f / aspect).round())
        } else {
            ((edge_f * aspect).round(), edge_f)
        };
        Self::new((w as u32).max(1), (h as u32).max(1))
    }

    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Uniform factor mapping `reference` units onto this surface.
    ///
    /// The reference box is fitted inside the surface (letterboxed when the aspects differ), so
    /// geometry is never stretched.
    pub fn scale_from(self, reference: Size) -> f64 {
        let kx = f64::from(self.width) / reference.width.max(f64::EPSILON);
        let ky = f64::from(self.height) / reference.height.max(f64::EPSILON);
        kx.min(ky)
    }
}

/// Clockwise-positive in a y-down surface, which is what `Affine::rotate` produces.
pub fn degrees_to_radians(deg: f64) -> f64 {
    deg.to_radians()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
