use std::sync::{Arc, OnceLock};

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{FrameError, FrameResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded photo in premultiplied RGBA8 form.
///
/// Cloning is cheap: the pixel buffer (and the raster paint built from it) is shared.
#[derive(Clone)]
pub struct SourceImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
    paint: Arc<OnceLock<Arc<vello_cpu::Pixmap>>>,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba8_premul_len", &self.rgba8_premul.len())
            .finish()
    }
}

impl PartialEq for SourceImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && (Arc::ptr_eq(&self.rgba8_premul, &other.rgba8_premul)
                || self.rgba8_premul == other.rgba8_premul)
    }
}

impl SourceImage {
    /// Wrap already-premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> FrameResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::decode("image has no pixels"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(FrameError::decode("image byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            paint: Arc::new(OnceLock::new()),
        })
    }

    pub fn natural_width(&self) -> u32 {
        self.width
    }

    pub fn natural_height(&self) -> u32 {
        self.height
    }

    pub fn rgba8_premul(&self) -> &[u8] {
        self.rgba8_premul.as_slice()
    }

    pub(crate) fn paint_cell(&self) -> &OnceLock<Arc<vello_cpu::Pixmap>> {
        &self.paint
    }
}

/// Whether a MIME type names an image (`image/*`).
pub fn is_image_mime(mime: &str) -> bool {
    let mime = mime.trim();
    mime.len() > "image/".len()
        && mime
            .get(.."image/".len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> FrameResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| FrameError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    SourceImage::from_premul_rgba8(width, height, rgba8_premul)
}

/// Split a `data:image/<kind>;base64,<payload>` URI into its MIME type and raw bytes.
pub fn decode_data_uri(uri: &str) -> FrameResult<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| FrameError::invalid_input("not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| FrameError::invalid_input("data URI has no payload"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| FrameError::invalid_input("data URI is not base64 encoded"))?;
    if !is_image_mime(mime) {
        return Err(FrameError::invalid_input(format!(
            "data URI carries {mime}, expected an image"
        )));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .context("decode base64 payload")?;
    Ok((mime.to_ascii_lowercase(), bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
