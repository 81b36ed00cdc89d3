use std::time::Instant;

use crate::assets::decode::{decode_image, is_image_mime};
use crate::assets::overlay::OverlaySlot;
use crate::bridge::payload::{OutputField, to_payload, unix_millis_now};
use crate::config::{EditorConfig, UploadTarget};
use crate::export::encode::EncodedImage;
use crate::export::exporter::{ExportSet, Exporter};
use crate::foundation::core::{Point, Size, SurfaceSize};
use crate::foundation::error::FrameResult;
use crate::render::RenderQuality;
use crate::render::cpu::Renderer;
use crate::render::surface::Surface;
use crate::session::debounce::Debouncer;
use crate::session::status::{StatusKind, StatusLine, StatusMessage};
use crate::state::transform::{TransformState, ZoomDirection};
use crate::upload::{UploadChannel, UploadRequest, UploadResponse, Uploader};

pub const MIN_DEVICE_PIXEL_RATIO: f64 = 1.0;
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 3.0;

/// A file picked by the user, as handed over by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditorAction {
    RotateLeft,
    RotateRight,
    ZoomIn,
    ZoomOut,
    Reset,
    Clear,
}

/// Everything the host forwards to the editor.
///
/// Pointer and touch coordinates are CSS pixels relative to the preview element.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
    /// One wheel tick; positive `delta_y` zooms out.
    Wheel { delta_y: f64 },
    Action(EditorAction),
    FileSelected(SelectedFile),
    /// New CSS size of the preview element.
    Resize {
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
    },
}

impl InputEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp => "pointer_up",
            Self::TouchStart { .. } => "touch_start",
            Self::TouchMove { .. } => "touch_move",
            Self::TouchEnd => "touch_end",
            Self::Wheel { .. } => "wheel",
            Self::Action(_) => "action",
            Self::FileSelected(_) => "file_selected",
            Self::Resize { .. } => "resize",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionPhase {
    #[default]
    Idle,
    Dragging,
    Settling,
}

/// Counters for preview renders and payload writes since the session started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub low: u64,
    pub high: u64,
    pub saves: u64,
}

/// What one event or poll did, for the host to act on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    /// The preview was redrawn at this quality.
    pub render: Option<RenderQuality>,
    /// The output field was rewritten.
    pub saved: bool,
    pub status: Option<StatusMessage>,
    /// The host should suppress the browser's default handling (scroll, touch panning).
    pub prevent_default: bool,
}

/// One editor instance: owns the transform state and drives preview, export and save.
///
/// Time is supplied by the host, both with each event and through [`EditorSession::poll`],
/// which must be called regularly (e.g. once per animation frame) so settles and upload
/// completions are processed.
pub struct EditorSession {
    config: EditorConfig,
    state: TransformState,
    exporter: Exporter,
    preview: Surface,
    view: Size,
    overlay: OverlaySlot,
    output: OutputField,
    status: StatusLine,
    debounce: Debouncer,
    phase: InteractionPhase,
    anchor: Option<Point>,
    stats: RenderStats,
    uploader: Option<Box<dyn Uploader>>,
    upload_target: Option<UploadTarget>,
    uploads: UploadChannel,
    /// Completions older than this belong to a previous photo.
    upload_floor: u64,
    final_image_url: Option<String>,
    clock: fn() -> u64,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> FrameResult<Self> {
        config.validate()?;
        let reference = config.reference_box();
        let exporter = Exporter::new(Renderer::new(reference)?, config.export_format());
        let preview = Surface::new(preview_size(reference, MIN_DEVICE_PIXEL_RATIO)?)?;

        let mut session = Self {
            state: TransformState::new(config.limits.zoom()),
            exporter,
            preview,
            view: reference,
            overlay: OverlaySlot::default(),
            output: OutputField::default(),
            status: StatusLine::new(config.status_duration()),
            debounce: Debouncer::new(config.settle_delay()),
            phase: InteractionPhase::Idle,
            anchor: None,
            stats: RenderStats::default(),
            uploader: None,
            upload_target: config.upload_target(),
            uploads: UploadChannel::new(),
            upload_floor: 0,
            final_image_url: None,
            clock: unix_millis_now,
            config,
        };
        session.render(RenderQuality::High);
        tracing::debug!(
            canvas_width = reference.width,
            canvas_height = reference.height,
            uploads = session.upload_target.is_some(),
            "editor session ready"
        );
        Ok(session)
    }

    /// Transport for the upload side channel; unused unless the config names an endpoint.
    pub fn with_uploader(mut self, uploader: Box<dyn Uploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Timestamp source for payloads, in Unix milliseconds.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn preview(&self) -> &Surface {
        &self.preview
    }

    pub fn overlay(&self) -> &OverlaySlot {
        &self.overlay
    }

    pub fn output(&self) -> &OutputField {
        &self.output
    }

    /// Current contents of the output field.
    pub fn wire_value(&self) -> &str {
        self.output.value()
    }

    pub fn final_image_url(&self) -> Option<&str> {
        self.final_image_url.as_deref()
    }

    pub fn status(&self, now: Instant) -> Option<&StatusMessage> {
        self.status.current(now)
    }

    /// Buttons, drags and wheel zoom are only live while a photo is loaded.
    pub fn controls_enabled(&self) -> bool {
        self.state.loaded()
    }

    /// Next instant at which [`EditorSession::poll`] has work to do, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Install the overlay once its fetch resolves; redraws but does not save.
    pub fn set_overlay(&mut self, slot: OverlaySlot) -> Reaction {
        self.overlay = slot;
        let mut reaction = Reaction::default();
        self.render_into(RenderQuality::High, &mut reaction);
        reaction
    }

    /// Programmatic write of an already-serialized payload by the host.
    pub fn write_raw_payload(&mut self, wire: &str) -> FrameResult<()> {
        self.output.write_raw(wire)
    }

    #[tracing::instrument(level = "debug", skip(self, event, now), fields(event = event.kind()))]
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Reaction {
        self.status.dismiss_expired(now);
        let mut reaction = Reaction::default();

        match event {
            InputEvent::PointerDown { x, y } => {
                reaction.prevent_default = self.press(Point::new(x, y));
            }
            InputEvent::TouchStart { x, y } => {
                reaction.prevent_default = self.press(Point::new(x, y));
            }
            InputEvent::PointerMove { x, y } => self.drag_to(Point::new(x, y), &mut reaction),
            InputEvent::TouchMove { x, y } => {
                reaction.prevent_default = self.controls_enabled();
                self.drag_to(Point::new(x, y), &mut reaction);
            }
            InputEvent::PointerUp => self.release(now),
            InputEvent::TouchEnd => {
                reaction.prevent_default = true;
                self.release(now);
            }
            InputEvent::Wheel { delta_y } => self.wheel(delta_y, now, &mut reaction),
            InputEvent::Action(action) => self.action(action, now, &mut reaction),
            InputEvent::FileSelected(file) => self.select_file(file, now, &mut reaction),
            InputEvent::Resize {
                width,
                height,
                device_pixel_ratio,
            } => self.resize(Size::new(width, height), device_pixel_ratio, &mut reaction),
        }
        reaction
    }

    /// Fire a due settle and apply finished uploads.
    pub fn poll(&mut self, now: Instant) -> Reaction {
        self.status.dismiss_expired(now);
        self.drain_uploads();

        let mut reaction = Reaction::default();
        if self.debounce.fire_if_due(now) {
            self.settle(&mut reaction);
        }
        reaction
    }

    /// Settle a pending or in-flight interaction right away, e.g. just before the host submits.
    ///
    /// While idle the output field is already current and nothing happens. Otherwise one
    /// high-quality render and one save, and the scheduled settle is dropped.
    #[tracing::instrument(level = "debug", skip(self, now))]
    pub fn flush(&mut self, now: Instant) -> Reaction {
        self.status.dismiss_expired(now);
        self.drain_uploads();

        let mut reaction = Reaction::default();
        if self.phase == InteractionPhase::Idle {
            return reaction;
        }
        self.debounce.cancel();
        self.anchor = None;
        self.settle(&mut reaction);
        reaction
    }

    fn press(&mut self, point: Point) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.debounce.cancel();
        self.phase = InteractionPhase::Dragging;
        self.anchor = Some(point);
        self.state.set_interacting(true);
        true
    }

    fn drag_to(&mut self, point: Point, reaction: &mut Reaction) {
        if self.phase != InteractionPhase::Dragging {
            return;
        }
        let Some(last) = self.anchor.replace(point) else {
            return;
        };
        let reference = self.exporter.renderer().reference();
        let k = (self.view.width / reference.width).min(self.view.height / reference.height);
        let delta = (point - last) / k;
        self.state.pan(delta.x, delta.y);
        self.render_into(RenderQuality::Low, reaction);
    }

    fn release(&mut self, now: Instant) {
        if self.phase != InteractionPhase::Dragging {
            return;
        }
        self.anchor = None;
        self.phase = InteractionPhase::Settling;
        self.debounce.arm(now);
    }

    fn wheel(&mut self, delta_y: f64, now: Instant, reaction: &mut Reaction) {
        if !self.controls_enabled() {
            return;
        }
        reaction.prevent_default = true;
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let direction = if delta_y > 0.0 {
            ZoomDirection::Out
        } else {
            ZoomDirection::In
        };
        self.discrete(now, reaction, |state| state.zoom_step(direction));
    }

    fn action(&mut self, action: EditorAction, now: Instant, reaction: &mut Reaction) {
        if !self.controls_enabled() {
            tracing::debug!(?action, "ignored while no photo is loaded");
            return;
        }
        let step = self.config.limits.rotate_step;
        match action {
            EditorAction::RotateLeft => self.discrete(now, reaction, |s| s.rotate(-step)),
            EditorAction::RotateRight => self.discrete(now, reaction, |s| s.rotate(step)),
            EditorAction::ZoomIn => {
                self.discrete(now, reaction, |s| s.zoom_step(ZoomDirection::In))
            }
            EditorAction::ZoomOut => {
                self.discrete(now, reaction, |s| s.zoom_step(ZoomDirection::Out))
            }
            EditorAction::Reset => self.discrete(now, reaction, TransformState::reset),
            EditorAction::Clear => self.clear(now, reaction),
        }
    }

    /// Instant mutation, cheap redraw, then a (re)armed settle.
    fn discrete(
        &mut self,
        now: Instant,
        reaction: &mut Reaction,
        mutate: impl FnOnce(&mut TransformState),
    ) {
        mutate(&mut self.state);
        self.state.set_interacting(true);
        // A drag in flight settles on release.
        if self.phase != InteractionPhase::Dragging {
            self.phase = InteractionPhase::Settling;
            self.debounce.arm(now);
        }
        self.render_into(RenderQuality::Low, reaction);
    }

    #[tracing::instrument(level = "debug", skip(self, reaction))]
    fn settle(&mut self, reaction: &mut Reaction) {
        self.phase = InteractionPhase::Idle;
        self.state.set_interacting(false);
        self.render_into(RenderQuality::High, reaction);
        reaction.saved = self.save();
    }

    fn select_file(&mut self, file: SelectedFile, now: Instant, reaction: &mut Reaction) {
        if !is_image_mime(&file.mime) {
            tracing::debug!(name = %file.name, mime = %file.mime, "rejected non-image file");
            reaction.status = Some(self.status.show(
                StatusKind::Error,
                &self.config.localized_strings.invalid_file,
                now,
            ));
            return;
        }

        let image = match decode_image(&file.bytes) {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(name = %file.name, error = %err, "could not decode selected file");
                reaction.status = Some(self.status.show(
                    StatusKind::Error,
                    &self.config.localized_strings.load_error,
                    now,
                ));
                return;
            }
        };
        tracing::debug!(
            name = %file.name,
            width = image.natural_width(),
            height = image.natural_height(),
            "photo loaded"
        );

        self.abandon_interaction();
        self.state.load(image);
        self.state.fit_to(
            self.exporter.renderer().reference(),
            self.config.limits.fit_padding,
        );
        self.render_into(RenderQuality::High, reaction);
        reaction.saved = self.save();
        reaction.status = Some(self.status.show(
            StatusKind::Success,
            &self.config.localized_strings.image_loaded,
            now,
        ));
    }

    fn clear(&mut self, now: Instant, reaction: &mut Reaction) {
        self.abandon_interaction();
        self.state.clear();
        self.render_into(RenderQuality::High, reaction);
        reaction.saved = self.save();
        reaction.status = Some(self.status.show(
            StatusKind::Success,
            &self.config.localized_strings.image_cleared,
            now,
        ));
    }

    /// Drop any pending settle and forget the hosted URL of the previous photo.
    fn abandon_interaction(&mut self) {
        self.debounce.cancel();
        self.phase = InteractionPhase::Idle;
        self.anchor = None;
        self.final_image_url = None;
        self.upload_floor = self.uploads.peek_generation();
    }

    fn resize(&mut self, view: Size, device_pixel_ratio: f64, reaction: &mut Reaction) {
        let dpr = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.clamp(MIN_DEVICE_PIXEL_RATIO, MAX_DEVICE_PIXEL_RATIO)
        } else {
            MIN_DEVICE_PIXEL_RATIO
        };
        match preview_size(view, dpr).and_then(Surface::new) {
            Ok(surface) => {
                self.view = view;
                self.preview = surface;
                self.render_into(RenderQuality::High, reaction);
            }
            Err(err) => {
                tracing::warn!(
                    width = view.width,
                    height = view.height,
                    dpr,
                    error = %err,
                    "ignoring resize"
                );
            }
        }
    }

    fn render_into(&mut self, quality: RenderQuality, reaction: &mut Reaction) {
        self.render(quality);
        reaction.render = Some(quality);
    }

    fn render(&mut self, quality: RenderQuality) {
        let rendered = self.exporter.renderer().render(
            &mut self.preview,
            &self.state,
            self.overlay.frame(),
            quality,
        );
        match rendered {
            Ok(()) => match quality {
                RenderQuality::Low => self.stats.low += 1,
                RenderQuality::High => self.stats.high += 1,
            },
            Err(err) => tracing::warn!(?quality, error = %err, "preview render failed"),
        }
    }

    /// Export, serialize and write the output field. Unloaded state writes the empty value.
    #[tracing::instrument(level = "debug", skip(self))]
    fn save(&mut self) -> bool {
        let exports = if self.state.loaded() {
            self.exporter.export_pair(
                &self.state,
                self.overlay.frame(),
                self.config.export_thumb_edge,
                self.config.export_full_edge,
            )
        } else {
            ExportSet::default()
        };

        let payload = to_payload(
            &self.state,
            &exports,
            self.exporter.renderer().reference(),
            self.final_image_url.as_deref(),
            (self.clock)(),
        );
        if let Err(err) = self.output.write_payload(&payload) {
            tracing::warn!(error = %err, "could not serialize payload");
            return false;
        }
        self.stats.saves += 1;
        tracing::debug!(
            saves = self.stats.saves,
            bytes = self.output.value().len(),
            has_image = payload.has_image,
            "payload saved"
        );

        if let Some(full) = exports.full {
            self.submit_upload(full);
        }
        true
    }

    fn submit_upload(&mut self, full: EncodedImage) {
        let (Some(uploader), Some(target)) = (&self.uploader, &self.upload_target) else {
            return;
        };
        let reply = self.uploads.reply();
        let request = UploadRequest {
            endpoint: target.endpoint.clone(),
            token: target.token.clone(),
            mime: full.mime(),
            bytes: full.bytes,
            generation: reply.generation(),
        };
        tracing::debug!(generation = request.generation, "upload submitted");
        uploader.submit(request, reply);
    }

    fn drain_uploads(&mut self) {
        for done in self.uploads.drain() {
            let generation = done.generation;
            if generation < self.upload_floor {
                tracing::debug!(generation, "dropping upload for a replaced photo");
                continue;
            }
            match done.result.and_then(UploadResponse::hosted_url) {
                Ok(url) => {
                    tracing::debug!(generation, %url, "hosted url available for next save");
                    self.final_image_url = Some(url);
                }
                Err(err) => {
                    tracing::warn!(generation, error = %err, "upload failed, keeping inline image");
                }
            }
        }
    }
}

fn preview_size(view: Size, device_pixel_ratio: f64) -> FrameResult<SurfaceSize> {
    SurfaceSize::new(
        (view.width * device_pixel_ratio).round() as u32,
        (view.height * device_pixel_ratio).round() as u32,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
