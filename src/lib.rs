//! Photoframe is an interactive photo-in-frame compositor.
//!
//! A user's photo is rotated, zoomed and panned inside a fixed decorative frame, previewed live
//! and exported at fixed resolutions into a JSON payload that a host shop attaches to a line
//! item.
//!
//! # Pipeline overview
//!
//! 1. **Interact**: host events drive an [`EditorSession`], which mutates one [`TransformState`]
//! 2. **Render**: [`Renderer`] draws the state plus [`OverlayFrame`] into any [`Surface`],
//!    cheaply ([`RenderQuality::Low`]) while a gesture is in flight and fully after it settles
//! 3. **Export**: [`Exporter`] re-renders the same state at thumbnail and full size and encodes
//!    PNG or JPEG
//! 4. **Save**: [`to_payload`] + [`to_wire_format`] produce the string written to the
//!    [`OutputField`]; an optional [`Uploader`] later swaps in a hosted URL
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: rendering, export and serialization are pure in their inputs; time is
//!   supplied by the host.
//! - **Resolution independent**: offsets live in a reference box and are mapped onto each target
//!   surface at render time.
//! - **Premultiplied RGBA8** internally; encoded output is straight alpha.
#![forbid(unsafe_code)]

mod assets;
mod bridge;
mod config;
mod export;
mod foundation;
mod render;
mod session;
mod state;
mod upload;

pub use assets::decode::{SourceImage, decode_data_uri, decode_image, is_image_mime};
pub use assets::overlay::{OverlayFrame, OverlaySlot};
pub use bridge::payload::{
    ExportPayload, OutputField, from_wire_format, to_payload, to_wire_format, unix_millis_now,
};
pub use config::{EditorConfig, EditorLimits, ExportFormatKind, LocalizedStrings, UploadTarget};
pub use export::encode::{DEFAULT_JPEG_QUALITY, EncodedImage, ExportFormat, encode_surface};
pub use export::exporter::{ExportSet, Exporter};
pub use foundation::core::{
    Affine, MAX_SURFACE_EDGE, Point, Rect, Size, SurfaceSize, Vec2, degrees_to_radians,
};
pub use foundation::error::{FrameError, FrameResult};
pub use render::RenderQuality;
pub use render::cpu::{
    BACKGROUND_RGBA, LOW_QUALITY_DRAW_SCALE, PLACEHOLDER_RGBA, Renderer, photo_transform,
};
pub use render::surface::Surface;
pub use session::controller::{
    EditorAction, EditorSession, InputEvent, InteractionPhase, MAX_DEVICE_PIXEL_RATIO,
    MIN_DEVICE_PIXEL_RATIO, Reaction, RenderStats, SelectedFile,
};
pub use session::debounce::Debouncer;
pub use session::status::{StatusKind, StatusLine, StatusMessage};
pub use state::transform::{TransformState, ZoomDirection, ZoomLimits};
pub use upload::{UploadCompletion, UploadReply, UploadRequest, UploadResponse, Uploader};
