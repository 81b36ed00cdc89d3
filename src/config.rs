//! Editor configuration supplied by the host page at initialization.

use std::time::Duration;

use crate::export::encode::{DEFAULT_JPEG_QUALITY, ExportFormat};
use crate::foundation::core::{MAX_SURFACE_EDGE, Size};
use crate::foundation::error::{FrameError, FrameResult};
use crate::state::transform::ZoomLimits;

/// User-facing status strings, already localized by the host.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizedStrings {
    pub image_loaded: String,
    pub image_cleared: String,
    pub invalid_file: String,
    pub load_error: String,
}

impl Default for LocalizedStrings {
    fn default() -> Self {
        Self {
            image_loaded: "Image loaded successfully!".to_string(),
            image_cleared: "Image cleared.".to_string(),
            invalid_file: "Please select a valid image file.".to_string(),
            load_error: "Error loading image. Please try another file.".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormatKind {
    #[default]
    Png,
    Jpeg,
}

/// Interaction tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorLimits {
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Relative zoom change per button press or wheel tick.
    pub zoom_step: f64,
    /// Degrees per rotate button press.
    pub rotate_step: f64,
    /// Fraction of the box a freshly loaded photo may fill.
    pub fit_padding: f64,
}

impl Default for EditorLimits {
    fn default() -> Self {
        Self {
            zoom_min: ZoomLimits::DEFAULT_MIN,
            zoom_max: ZoomLimits::DEFAULT_MAX,
            zoom_step: ZoomLimits::DEFAULT_STEP,
            rotate_step: 90.0,
            fit_padding: 0.8,
        }
    }
}

impl EditorLimits {
    pub fn zoom(&self) -> ZoomLimits {
        ZoomLimits {
            zoom_min: self.zoom_min,
            zoom_max: self.zoom_max,
            zoom_step: self.zoom_step,
        }
    }
}

/// Where and how to push the full-resolution composite, when the host enables uploads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTarget {
    pub endpoint: String,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub overlay_frame_url: String,
    /// Logical preview box that offsets are recorded in.
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub export_full_edge: u32,
    pub export_thumb_edge: u32,
    pub export_format: ExportFormatKind,
    /// JPEG quality in `(0, 1]`; ignored for PNG.
    pub export_quality: f64,
    pub localized_strings: LocalizedStrings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_token: Option<String>,
    pub limits: EditorLimits,
    pub settle_delay_ms: u64,
    pub status_duration_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            overlay_frame_url: String::new(),
            canvas_width: 400.0,
            canvas_height: 400.0,
            export_full_edge: 2400,
            export_thumb_edge: 240,
            export_format: ExportFormatKind::Png,
            export_quality: f64::from(DEFAULT_JPEG_QUALITY) / 100.0,
            localized_strings: LocalizedStrings::default(),
            upload_endpoint: None,
            upload_token: None,
            limits: EditorLimits::default(),
            settle_delay_ms: 120,
            status_duration_ms: 3000,
        }
    }
}

impl EditorConfig {
    /// Parse and validate the host's JSON config; absent keys take defaults.
    pub fn from_json(json: &str) -> FrameResult<Self> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| FrameError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> FrameResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.canvas_width) || !positive(self.canvas_height) {
            return Err(FrameError::validation("canvas size must be positive"));
        }
        for (name, edge) in [
            ("exportFullEdge", self.export_full_edge),
            ("exportThumbEdge", self.export_thumb_edge),
        ] {
            if edge == 0 || edge > MAX_SURFACE_EDGE {
                return Err(FrameError::validation(format!(
                    "{name} must be within 1..={MAX_SURFACE_EDGE}"
                )));
            }
        }
        if !(self.export_quality > 0.0 && self.export_quality <= 1.0) {
            return Err(FrameError::validation("exportQuality must be in (0, 1]"));
        }

        let l = &self.limits;
        if !positive(l.zoom_min) || !positive(l.zoom_max) || l.zoom_min > l.zoom_max {
            return Err(FrameError::validation(
                "zoom limits must be positive with zoomMin <= zoomMax",
            ));
        }
        if !(l.zoom_step > 0.0 && l.zoom_step < 1.0) {
            return Err(FrameError::validation("zoomStep must be in (0, 1)"));
        }
        if !l.rotate_step.is_finite() {
            return Err(FrameError::validation("rotateStep must be finite"));
        }
        if !(l.fit_padding > 0.0 && l.fit_padding <= 1.0) {
            return Err(FrameError::validation("fitPadding must be in (0, 1]"));
        }

        if self.upload_endpoint.is_some() && self.upload_token.is_none() {
            return Err(FrameError::validation(
                "uploadEndpoint requires an uploadToken",
            ));
        }
        Ok(())
    }

    pub fn reference_box(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    pub fn export_format(&self) -> ExportFormat {
        match self.export_format {
            ExportFormatKind::Png => ExportFormat::Png,
            ExportFormatKind::Jpeg => ExportFormat::jpeg(self.export_quality),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn status_duration(&self) -> Duration {
        Duration::from_millis(self.status_duration_ms)
    }

    pub fn upload_target(&self) -> Option<UploadTarget> {
        let endpoint = self.upload_endpoint.as_ref().filter(|e| !e.is_empty())?;
        Some(UploadTarget {
            endpoint: endpoint.clone(),
            token: self.upload_token.clone().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
