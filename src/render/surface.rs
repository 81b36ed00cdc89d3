use crate::foundation::core::SurfaceSize;
use crate::foundation::error::{FrameError, FrameResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// A raster render target holding premultiplied RGBA8 pixels.
pub struct Surface {
    size: SurfaceSize,
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    pub fn new(size: SurfaceSize) -> FrameResult<Self> {
        let (w, h) = surface_dims_u16(size)?;
        Ok(Self {
            size,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    /// Straight-alpha copy suitable for encoders.
    pub fn to_rgba_image(&self) -> FrameResult<image::RgbaImage> {
        let mut data = self.data().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(self.size.width, self.size.height, data)
            .ok_or_else(|| FrameError::encode("surface byte length mismatch"))
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("size", &self.size).finish()
    }
}

pub(crate) fn surface_dims_u16(size: SurfaceSize) -> FrameResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| FrameError::validation("surface width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| FrameError::validation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(FrameError::validation("surface size must be non-zero"));
    }
    Ok((w, h))
}
