use std::sync::Arc;

use crate::assets::decode::SourceImage;
use crate::assets::overlay::OverlayFrame;
use crate::foundation::core::{Affine, Size, SurfaceSize, Vec2, degrees_to_radians};
use crate::foundation::error::{FrameError, FrameResult};
use crate::render::RenderQuality;
use crate::render::surface::{Surface, surface_dims_u16};
use crate::state::transform::TransformState;

/// Opaque background so encoders without alpha produce stable output.
pub const BACKGROUND_RGBA: [u8; 4] = [255, 255, 255, 255];
/// Flat fill shown while no photo is loaded.
pub const PLACEHOLDER_RGBA: [u8; 4] = [238, 238, 238, 255];
/// Intermediate draw scale used for [`RenderQuality::Low`].
pub const LOW_QUALITY_DRAW_SCALE: f64 = 0.5;

/// Draws a [`TransformState`] plus overlay into surfaces of any resolution.
///
/// Offsets and zoom are recorded against the `reference` box (the logical preview size); each
/// render maps them onto the target surface with `surface / reference`, so one state drives the
/// live preview and every export size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderer {
    reference: Size,
}

impl Renderer {
    pub fn new(reference: Size) -> FrameResult<Self> {
        if !(reference.width.is_finite()
            && reference.height.is_finite()
            && reference.width > 0.0
            && reference.height > 0.0)
        {
            return Err(FrameError::validation(
                "reference box must have a positive finite size",
            ));
        }
        Ok(Self { reference })
    }

    pub fn reference(&self) -> Size {
        self.reference
    }

    /// Render `state` and `overlay` into `surface`, replacing its contents.
    ///
    /// Deterministic: identical inputs on identical-size surfaces give identical bytes.
    pub fn render(
        &self,
        surface: &mut Surface,
        state: &TransformState,
        overlay: Option<&OverlayFrame>,
        quality: RenderQuality,
    ) -> FrameResult<()> {
        let size = surface.size();
        tracing::trace!(
            width = size.width,
            height = size.height,
            ?quality,
            loaded = state.loaded(),
            "render"
        );
        match quality {
            RenderQuality::High => draw_composite(
                surface.pixmap_mut(),
                size,
                self.reference,
                state,
                overlay,
                quality,
            ),
            RenderQuality::Low => {
                let draw_size = SurfaceSize::new(
                    scaled_edge(size.width, LOW_QUALITY_DRAW_SCALE),
                    scaled_edge(size.height, LOW_QUALITY_DRAW_SCALE),
                )?;
                let (w, h) = surface_dims_u16(draw_size)?;
                let mut small = vello_cpu::Pixmap::new(w, h);
                draw_composite(
                    &mut small,
                    draw_size,
                    self.reference,
                    state,
                    overlay,
                    quality,
                )?;
                upscale_nearest(small.data_as_u8_slice(), draw_size, surface.data_mut(), size);
                Ok(())
            }
        }
    }
}

/// Maps natural image pixels into `target` pixels.
///
/// Canonical order: T(center + offset * k) * R(rotation) * S(scale * k) * T(-natural / 2), with
/// one uniform `k` for both axes.
pub fn photo_transform(
    state: &TransformState,
    natural: Size,
    target: SurfaceSize,
    reference: Size,
) -> Affine {
    let k = target.scale_from(reference);
    let center = Vec2::new(
        f64::from(target.width) / 2.0,
        f64::from(target.height) / 2.0,
    );

    Affine::translate(center + state.offset() * k)
        * Affine::rotate(degrees_to_radians(state.rotation_degrees()))
        * Affine::scale(state.scale() * k)
        * Affine::translate(Vec2::new(-natural.width / 2.0, -natural.height / 2.0))
}

fn scaled_edge(edge: u32, factor: f64) -> u32 {
    ((f64::from(edge) * factor).round() as u32).max(1)
}

fn draw_composite(
    pixmap: &mut vello_cpu::Pixmap,
    size: SurfaceSize,
    reference: Size,
    state: &TransformState,
    overlay: Option<&OverlayFrame>,
    quality: RenderQuality,
) -> FrameResult<()> {
    let (w, h) = surface_dims_u16(size)?;
    let full = vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
    let mut ctx = vello_cpu::RenderContext::new(w, h);

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(solid(BACKGROUND_RGBA));
    ctx.fill_rect(&full);

    match state.source() {
        Some(img) => {
            let natural = natural_size(img);
            let paint = image_paint(pixmap_for(img)?, quality);
            let xf = photo_transform(state, natural, size, reference);
            ctx.set_transform(affine_to_cpu(xf));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                natural.width,
                natural.height,
            ));
        }
        None => {
            ctx.set_paint(solid(PLACEHOLDER_RGBA));
            ctx.fill_rect(&full);
        }
    }

    if let Some(frame) = overlay {
        let (paint, frame_size) = overlay_paint(frame, size, quality)?;
        let stretch = Affine::scale_non_uniform(
            f64::from(size.width) / frame_size.width,
            f64::from(size.height) / frame_size.height,
        );
        ctx.set_transform(affine_to_cpu(stretch));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            frame_size.width,
            frame_size.height,
        ));
    }

    ctx.flush();
    ctx.render_to_pixmap(pixmap);
    Ok(())
}

fn natural_size(img: &SourceImage) -> Size {
    Size::new(
        f64::from(img.natural_width()),
        f64::from(img.natural_height()),
    )
}

fn overlay_paint(
    frame: &OverlayFrame,
    size: SurfaceSize,
    quality: RenderQuality,
) -> FrameResult<(vello_cpu::Image, Size)> {
    match frame {
        OverlayFrame::Raster(img) => Ok((image_paint(pixmap_for(img)?, quality), natural_size(img))),
        OverlayFrame::Vector(tree) => {
            let rgba8_premul = OverlayFrame::rasterize_vector(tree, size)?;
            let pixmap = premul_bytes_to_pixmap(&rgba8_premul, size.width, size.height)?;
            Ok((image_paint(Arc::new(pixmap), quality), size.to_size()))
        }
    }
}

fn pixmap_for(img: &SourceImage) -> FrameResult<Arc<vello_cpu::Pixmap>> {
    if let Some(pixmap) = img.paint_cell().get() {
        return Ok(pixmap.clone());
    }
    let pixmap = Arc::new(premul_bytes_to_pixmap(
        img.rgba8_premul(),
        img.natural_width(),
        img.natural_height(),
    )?);
    Ok(img.paint_cell().get_or_init(|| pixmap).clone())
}

fn image_paint(pixmap: Arc<vello_cpu::Pixmap>, quality: RenderQuality) -> vello_cpu::Image {
    let quality = match quality {
        RenderQuality::Low => vello_cpu::peniko::ImageQuality::Low,
        RenderQuality::High => vello_cpu::peniko::ImageQuality::High,
    };
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(pixmap),
        sampler: vello_cpu::peniko::ImageSampler {
            quality,
            ..vello_cpu::peniko::ImageSampler::default()
        },
    }
}

fn solid([r, g, b, a]: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> FrameResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| FrameError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FrameError::validation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(FrameError::validation("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn upscale_nearest(src: &[u8], src_size: SurfaceSize, dst: &mut [u8], dst_size: SurfaceSize) {
    let (sw, sh) = (src_size.width as usize, src_size.height as usize);
    let (dw, dh) = (dst_size.width as usize, dst_size.height as usize);
    for y in 0..dh {
        let sy = (y * sh / dh).min(sh - 1);
        for x in 0..dw {
            let sx = (x * sw / dw).min(sw - 1);
            let s = (sy * sw + sx) * 4;
            let d = (y * dw + x) * 4;
            dst[d..d + 4].copy_from_slice(&src[s..s + 4]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
