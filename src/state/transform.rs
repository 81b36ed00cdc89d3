use crate::assets::decode::SourceImage;
use crate::foundation::core::{Size, Vec2};

/// Zoom bounds and the relative step used by buttons and wheel ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
}

impl ZoomLimits {
    pub const DEFAULT_MIN: f64 = 0.1;
    pub const DEFAULT_MAX: f64 = 5.0;
    pub const DEFAULT_STEP: f64 = 0.2;

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.zoom_min, self.zoom_max)
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            zoom_min: Self::DEFAULT_MIN,
            zoom_max: Self::DEFAULT_MAX,
            zoom_step: Self::DEFAULT_STEP,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// The current edit: source photo plus its rotation, zoom and offset.
///
/// Offsets are in reference-box units (the logical preview box the user drags in), measured
/// from the box center to the photo center.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformState {
    source: Option<SourceImage>,
    rotation_degrees: f64,
    scale: f64,
    offset: Vec2,
    is_interacting: bool,
    limits: ZoomLimits,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

impl TransformState {
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            source: None,
            rotation_degrees: 0.0,
            scale: limits.clamp(1.0),
            offset: Vec2::ZERO,
            is_interacting: false,
            limits,
        }
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn loaded(&self) -> bool {
        self.source.is_some()
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_interacting(&self) -> bool {
        self.is_interacting
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Accumulates without normalizing into `[0, 360)`.
    pub fn rotate(&mut self, delta_degrees: f64) {
        if delta_degrees.is_finite() {
            self.rotation_degrees += delta_degrees;
        }
    }

    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.scale = self.limits.clamp(self.scale * factor);
        }
    }

    pub fn zoom_step(&mut self, direction: ZoomDirection) {
        let step = self.limits.zoom_step;
        match direction {
            ZoomDirection::In => self.zoom_by(1.0 + step),
            ZoomDirection::Out => self.zoom_by(1.0 - step),
        }
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.offset += Vec2::new(dx, dy);
        }
    }

    /// Back to the identity transform; the loaded photo stays.
    pub fn reset(&mut self) {
        self.rotation_degrees = 0.0;
        self.scale = self.limits.clamp(1.0);
        self.offset = Vec2::ZERO;
    }

    pub fn load(&mut self, image: SourceImage) {
        self.source = Some(image);
        self.is_interacting = false;
        self.reset();
    }

    /// Shrink-to-fit a freshly loaded photo inside `reference`, leaving `padding` margin.
    ///
    /// Never enlarges past natural size.
    pub fn fit_to(&mut self, reference: Size, padding: f64) {
        let Some(img) = &self.source else {
            return;
        };
        let iw = f64::from(img.natural_width());
        let ih = f64::from(img.natural_height());
        let fit = (reference.width * padding / iw)
            .min(reference.height * padding / ih)
            .min(1.0);

        self.rotation_degrees = 0.0;
        self.offset = Vec2::ZERO;
        self.scale = if fit.is_finite() && fit > 0.0 {
            self.limits.clamp(fit)
        } else {
            self.limits.clamp(1.0)
        };
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.limits);
    }

    pub(crate) fn set_interacting(&mut self, interacting: bool) {
        self.is_interacting = interacting;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/transform.rs"]
mod tests;
