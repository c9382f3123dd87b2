//! brandframe composes one photo and one caption into a batch of fixed-size branded images.
//!
//! A [`TemplateRegistry`] describes every output format (post, square, story, banners...). A
//! [`Compositor`] owns the per-format state and renders each format from scratch whenever an input
//! changes:
//!
//! 1. **Background**: a neutral fill under everything else.
//! 2. **Photo**: cover-fit into the format's photo area, shifted by the format's pan offset and
//!    clamped so the area is never exposed ([`place_photo`]).
//! 3. **Overlay**: the format's branding image stretched over the whole surface, or a red warning
//!    border when the configured overlay failed to load.
//! 4. **Caption**: greedily wrapped with measured widths ([`wrap_caption`]) and clipped to the
//!    format's line limit, raising an overflow warning.
//!
//! [`Compositor::export_all`] encodes every mounted format in parallel, joins the results and
//! hands a single zip archive to an [`ArchiveSink`].
//!
//! Surfaces are premultiplied RGBA8 and rendering is CPU-only (`vello_cpu`); captions are shaped
//! with `parley`. `unsafe` is forbidden in this crate.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod compose;
mod compositor;
mod config;
mod export;
mod foundation;
mod interact;
mod render;
mod text;

pub use assets::decode::{PreparedImage, decode_image, decode_image_file};
pub use assets::overlay::{OverlayCache, OverlayLoadReport, OverlayState};
pub use assets::paths::normalize_rel_path;
pub use compose::pan::PanStore;
pub use compose::placement::{PhotoPlacement, cover_fit, place_photo};
pub use compositor::{Compositor, CompositorOpts, RedrawSummary};
pub use config::template::{
    DEFAULT_LINE_HEIGHT, LINE_UNIT_PER_POINT, PX_PER_POINT, TemplateConfig, TemplateRegistry,
    TextRules,
};
pub use export::archive::{
    ArchiveEntry, ArchiveSink, DirectoryArchiveSink, InMemoryArchiveSink, build_zip, read_zip,
};
pub use export::batch::{BatchExporter, DEFAULT_FILE_NAME, DEFAULT_PREFIX_CHARS, ExportReport};
pub use export::encode::{ExportImageFormat, encode_surface};
pub use export::naming::{archive_file_name, format_file_name, sanitize_caption_prefix};
pub use export::telemetry::{ExportTelemetry, JsonLinesTelemetry, NoTelemetry};
pub use foundation::core::{FormatId, Point, Rect, Rgba8, Size, Vec2};
pub use foundation::error::{BrandframeError, BrandframeResult};
pub use interact::drag::{DragController, DragPhase, InputBroker, ReleaseSubscription};
pub use render::cpu::{FormatRender, RenderStyle, render_format};
pub use render::paint::ImagePaint;
pub use render::surface::RenderedSurface;
pub use text::typeset::{CaptionTypesetter, ParleyTypesetter, TextBrushRgba8};
pub use text::wrap::{TextMeasure, WrappedCaption, layout_caption, wrap_caption};
