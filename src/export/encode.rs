use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{FrameError, FrameResult};
use crate::render::surface::Surface;

/// Default JPEG quality, matching the 0.92 the storefront has always used.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Compressed raster format for exported composites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg {
        quality: u8,
    },
}

impl ExportFormat {
    /// JPEG with a `0.0..=1.0` quality as hosts usually express it.
    pub fn jpeg(quality: f64) -> Self {
        let q = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;
        Self::Jpeg { quality: q.max(1) }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// An encoded composite ready for the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// Inline `data:` URI form used in the payload.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime(), STANDARD.encode(&self.bytes))
    }
}

pub fn encode_surface(surface: &Surface, format: ExportFormat) -> FrameResult<EncodedImage> {
    let rgba = surface.to_rgba_image()?;
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| FrameError::encode(format!("png: {e}")))?,
        ExportFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut bytes,
                quality.clamp(1, 100),
            );
            image::DynamicImage::ImageRgb8(rgb)
                .write_with_encoder(encoder)
                .map_err(|e| FrameError::encode(format!("jpeg: {e}")))?
        }
    }
    Ok(EncodedImage {
        format,
        width: surface.width(),
        height: surface.height(),
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
