use std::time::{SystemTime, UNIX_EPOCH};

use crate::export::exporter::ExportSet;
use crate::foundation::core::Size;
use crate::foundation::error::{FrameError, FrameResult};
use crate::state::transform::TransformState;

/// Everything the cart/order layer stores for one customized line item.
///
/// Built fresh on every save and superseding the previous one. Missing fields read back as
/// their defaults and unknown fields are ignored, so older or newer producers stay readable.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportPayload {
    pub rotation: f64,
    pub zoom: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub image_width: u32,
    pub image_height: u32,
    pub has_image: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_image: Option<String>,
    #[serde(rename = "finalImageURL", skip_serializing_if = "Option::is_none")]
    pub final_image_url: Option<String>,
    pub timestamp: u64,
}

/// Assemble the payload for `state` and the composites exported from it.
pub fn to_payload(
    state: &TransformState,
    exports: &ExportSet,
    reference: Size,
    final_image_url: Option<&str>,
    timestamp: u64,
) -> ExportPayload {
    let (image_width, image_height) = state
        .source()
        .map(|img| (img.natural_width(), img.natural_height()))
        .unwrap_or((0, 0));
    let loaded = state.loaded();

    ExportPayload {
        rotation: state.rotation_degrees(),
        zoom: state.scale(),
        position_x: state.offset().x,
        position_y: state.offset().y,
        canvas_width: reference.width,
        canvas_height: reference.height,
        image_width,
        image_height,
        has_image: loaded,
        final_image: exports
            .full
            .as_ref()
            .filter(|_| loaded)
            .map(|img| img.to_data_uri()),
        thumb_image: exports
            .thumb
            .as_ref()
            .filter(|_| loaded)
            .map(|img| img.to_data_uri()),
        final_image_url: final_image_url.filter(|_| loaded).map(str::to_owned),
        timestamp,
    }
}

/// Encode a payload for the output field.
///
/// A payload without an image is written as the empty string, which is what the cart layer
/// treats as "no customization".
pub fn to_wire_format(payload: &ExportPayload) -> FrameResult<String> {
    if !payload.has_image {
        return Ok(String::new());
    }
    serde_json::to_string(payload).map_err(|e| FrameError::serde(e.to_string()))
}

/// Decode an output-field value; blank input means "no customization".
pub fn from_wire_format(wire: &str) -> FrameResult<Option<ExportPayload>> {
    if wire.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(wire)
        .map(Some)
        .map_err(|e| FrameError::serde(e.to_string()))
}

/// Milliseconds since the Unix epoch, the payload timestamp unit.
pub fn unix_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The designated output slot read once by the external collaborator at submit time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputField {
    value: String,
}

impl OutputField {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn write_payload(&mut self, payload: &ExportPayload) -> FrameResult<()> {
        self.value = to_wire_format(payload)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Host-side write of an already-serialized payload; rejected unless it parses.
    pub fn write_raw(&mut self, wire: &str) -> FrameResult<()> {
        from_wire_format(wire)?;
        self.value = wire.to_owned();
        Ok(())
    }

    pub fn read(&self) -> FrameResult<Option<ExportPayload>> {
        from_wire_format(&self.value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bridge/payload.rs"]
mod tests;
