//! The multi-format compositor: one photo and one caption rendered into every registered format.

use std::collections::BTreeMap;
use std::path::Path;

use crate::assets::decode::{PreparedImage, decode_image, decode_image_file};
use crate::assets::overlay::{OverlayCache, OverlayLoadReport};
use crate::compose::pan::PanStore;
use crate::config::template::{TemplateConfig, TemplateRegistry};
use crate::export::archive::ArchiveSink;
use crate::export::batch::{BatchExporter, DEFAULT_FILE_NAME, DEFAULT_PREFIX_CHARS, ExportReport};
use crate::export::encode::ExportImageFormat;
use crate::export::telemetry::ExportTelemetry;
use crate::foundation::core::{FormatId, Point, Vec2};
use crate::foundation::error::{BrandframeError, BrandframeResult};
use crate::interact::drag::{DragController, InputBroker};
use crate::render::cpu::{RenderStyle, render_format};
use crate::render::paint::ImagePaint;
use crate::render::surface::RenderedSurface;
use crate::text::typeset::{CaptionTypesetter, ParleyTypesetter};

/// Runtime knobs for a [`Compositor`].
#[derive(Clone, Debug)]
pub struct CompositorOpts {
    /// Colors used by every render pass.
    pub style: RenderStyle,
    /// Container for exported files.
    pub export_format: ExportImageFormat,
    /// Caption characters kept in exported file names.
    pub file_prefix_chars: usize,
    /// File-name stem used when the caption yields nothing usable.
    pub default_file_name: String,
    /// Archive name prefix; overrides the registry's when set.
    pub archive_prefix: Option<String>,
    /// TTF/OTF bytes for captions. Without a font (or an injected typesetter) captions are not drawn.
    pub font_bytes: Option<Vec<u8>>,
    /// Weight used to shape and measure captions from `font_bytes`.
    pub font_weight: f32,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            style: RenderStyle::default(),
            export_format: ExportImageFormat::default(),
            file_prefix_chars: DEFAULT_PREFIX_CHARS,
            default_file_name: DEFAULT_FILE_NAME.to_string(),
            archive_prefix: None,
            font_bytes: None,
            font_weight: parley::style::FontWeight::BOLD.value(),
        }
    }
}

/// Outcome of a full redraw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedrawSummary {
    /// Formats rendered, in registry order.
    pub rendered: Vec<FormatId>,
    /// Formats without a render target.
    pub skipped: Vec<FormatId>,
    /// Formats whose caption was clipped.
    pub overflowed: Vec<FormatId>,
    /// Formats whose render pass failed, with the error message.
    pub failed: Vec<(FormatId, String)>,
}

#[derive(Debug, Default)]
struct RenderTarget {
    surface: Option<RenderedSurface>,
    overflow: bool,
}

/// Owns every piece of per-format state and re-renders formats as inputs change.
///
/// Single-threaded: controllers share state with the input broker through `Rc`.
pub struct Compositor {
    registry: TemplateRegistry,
    opts: CompositorOpts,
    overlays: OverlayCache,
    pans: PanStore,
    photo: Option<ImagePaint>,
    caption: String,
    targets: BTreeMap<FormatId, RenderTarget>,
    drags: BTreeMap<FormatId, DragController>,
    broker: InputBroker,
    typesetter: Option<Box<dyn CaptionTypesetter>>,
    global_warning: bool,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("formats", &self.registry.len())
            .field("mounted", &self.targets.len())
            .field("has_photo", &self.photo.is_some())
            .field("caption_len", &self.caption.len())
            .field("global_warning", &self.global_warning)
            .finish()
    }
}

impl Compositor {
    /// Build a compositor for every format in `registry` and render the initial surfaces.
    pub fn new(registry: TemplateRegistry, opts: CompositorOpts) -> BrandframeResult<Self> {
        let typesetter: Option<Box<dyn CaptionTypesetter>> = match &opts.font_bytes {
            Some(bytes) => Some(Box::new(
                ParleyTypesetter::from_font_bytes(bytes.clone())?
                    .with_weight(parley::style::FontWeight::new(opts.font_weight)),
            )),
            None => None,
        };

        let broker = InputBroker::new();
        let mut pans = PanStore::new();
        let mut targets = BTreeMap::new();
        let mut drags = BTreeMap::new();
        for cfg in registry.configs() {
            pans.register(cfg.id.clone());
            targets.insert(cfg.id.clone(), RenderTarget::default());
            drags.insert(cfg.id.clone(), DragController::new(cfg.id.clone(), &broker));
        }

        let mut this = Self {
            registry,
            opts,
            overlays: OverlayCache::new(),
            pans,
            photo: None,
            caption: String::new(),
            targets,
            drags,
            broker,
            typesetter,
            global_warning: false,
        };
        this.redraw_all();
        tracing::info!(formats = this.registry.len(), "compositor ready");
        Ok(this)
    }

    /// Replace the caption typesetter.
    pub fn with_typesetter(mut self, typesetter: Box<dyn CaptionTypesetter>) -> Self {
        self.typesetter = Some(typesetter);
        self.redraw_all();
        self
    }

    /// Formats this compositor was built with.
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Decode every configured overlay under `root` and redraw.
    pub fn load_overlays(&mut self, root: &Path) -> OverlayLoadReport {
        let (cache, report) = OverlayCache::load_all(self.registry.configs(), root);
        self.overlays = cache;
        self.redraw_all();
        report
    }

    /// Install an already populated overlay cache and redraw.
    pub fn set_overlays(&mut self, cache: OverlayCache) -> RedrawSummary {
        self.overlays = cache;
        self.redraw_all()
    }

    /// Replace the source photo, reset every pan offset and redraw.
    pub fn set_source_photo(&mut self, photo: &PreparedImage) -> BrandframeResult<RedrawSummary> {
        let paint = ImagePaint::from_prepared(photo)?;
        tracing::info!(width = photo.width, height = photo.height, "source photo set");
        self.photo = Some(paint);
        self.pans.reset_all();
        Ok(self.redraw_all())
    }

    /// Decode uploaded bytes and use them as the source photo.
    pub fn load_photo_bytes(&mut self, bytes: &[u8]) -> BrandframeResult<RedrawSummary> {
        let photo = decode_image(bytes)?;
        self.set_source_photo(&photo)
    }

    /// Gallery selection entry point: decode the image at `path` and use it as the source photo.
    pub fn load_from_gallery(&mut self, path: &Path) -> BrandframeResult<RedrawSummary> {
        let photo = decode_image_file(path)?;
        self.set_source_photo(&photo)
    }

    /// `true` once a source photo is set.
    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    /// Replace the caption and redraw every format. CRLF line breaks are normalized.
    pub fn set_caption(&mut self, caption: &str) -> RedrawSummary {
        self.caption = caption.replace("\r\n", "\n");
        self.redraw_all()
    }

    /// Current caption.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Re-render every format in registry order.
    ///
    /// Formats without a render target are skipped and a failed pass does not stop the others.
    pub fn redraw_all(&mut self) -> RedrawSummary {
        let mut summary = RedrawSummary::default();
        let ids: Vec<FormatId> = self.registry.configs().iter().map(|c| c.id.clone()).collect();
        for id in ids {
            match self.render_one(&id) {
                Ok(Some(overflow)) => {
                    if overflow {
                        summary.overflowed.push(id.clone());
                    }
                    summary.rendered.push(id);
                }
                Ok(None) => summary.skipped.push(id),
                Err(e) => {
                    tracing::warn!(format = %id, error = %e, "render failed");
                    summary.failed.push((id, e.to_string()));
                }
            }
        }
        self.refresh_global_warning();
        tracing::debug!(
            rendered = summary.rendered.len(),
            skipped = summary.skipped.len(),
            overflowed = summary.overflowed.len(),
            "redraw finished"
        );
        summary
    }

    /// Re-render one format. Returns `false` when it has no render target.
    pub fn redraw(&mut self, id: &FormatId) -> BrandframeResult<bool> {
        let drawn = self.render_one(id)?.is_some();
        self.refresh_global_warning();
        Ok(drawn)
    }

    fn render_one(&mut self, id: &FormatId) -> BrandframeResult<Option<bool>> {
        let Some(cfg) = self.registry.get(id) else {
            return Err(BrandframeError::validation(format!("unknown format '{id}'")));
        };
        let Some(target) = self.targets.get_mut(id) else {
            tracing::warn!(format = %id, "no render target; format skipped");
            return Ok(None);
        };

        let pan = self.pans.get(id).unwrap_or(Vec2::ZERO);
        let typesetter = self
            .typesetter
            .as_deref_mut()
            .map(|t| t as &mut dyn CaptionTypesetter);
        let out = render_format(
            cfg,
            self.photo.as_ref(),
            pan,
            self.overlays.state(cfg),
            &self.caption,
            typesetter,
            &self.opts.style,
        )?;

        self.pans.set(id, out.pan);
        target.surface = Some(out.surface);
        target.overflow = out.overflow;
        Ok(Some(out.overflow))
    }

    fn refresh_global_warning(&mut self) {
        self.global_warning = self.targets.values().any(|t| t.overflow);
    }

    /// Pointer pressed on `id`'s surface. Returns `true` when a drag started.
    pub fn pointer_down(&mut self, id: &FormatId, at: Point) -> bool {
        let has_photo = self.photo.is_some();
        self.drags
            .get(id)
            .is_some_and(|drag| drag.press(at, has_photo))
    }

    /// Pointer moved over `id`'s surface.
    ///
    /// While dragging, the movement is added to that format's pan and only that format is
    /// re-rendered. Returns the stored (clamped) pan, or `None` when nothing was dragged.
    pub fn pointer_move(&mut self, id: &FormatId, at: Point) -> BrandframeResult<Option<Vec2>> {
        if self.photo.is_none() {
            return Ok(None);
        }
        let Some(delta) = self.drags.get(id).and_then(|drag| drag.motion(at)) else {
            return Ok(None);
        };
        self.pans.add(id, delta);
        tracing::debug!(format = %id, dx = delta.x, dy = delta.y, "drag step");
        self.redraw(id)?;
        Ok(self.pans.get(id))
    }

    /// Pointer released anywhere. Ends every active drag and returns how many ended.
    pub fn pointer_release(&mut self) -> usize {
        self.broker.release_all()
    }

    /// Stored pan offset of `id`.
    pub fn pan(&self, id: &FormatId) -> Option<Vec2> {
        self.pans.get(id)
    }

    /// Latest surface of `id`, if it has a render target.
    pub fn surface(&self, id: &FormatId) -> Option<&RenderedSurface> {
        self.targets.get(id).and_then(|t| t.surface.as_ref())
    }

    /// Whether `id`'s caption was clipped in its latest render.
    pub fn overflow(&self, id: &FormatId) -> bool {
        self.targets.get(id).is_some_and(|t| t.overflow)
    }

    /// Per-format warning text shown when the caption was clipped.
    pub fn warning_message(&self, id: &FormatId) -> Option<String> {
        if !self.overflow(id) {
            return None;
        }
        let max_lines = self.registry.get(id)?.text.as_ref()?.max_lines;
        Some(format!("Caption clipped (max {max_lines} lines)"))
    }

    /// `true` when any format's caption is clipped.
    pub fn global_warning(&self) -> bool {
        self.global_warning
    }

    /// Remove `id`'s render target and drag controller. Later passes skip the format.
    pub fn unmount(&mut self, id: &FormatId) -> bool {
        self.drags.remove(id);
        let removed = self.targets.remove(id).is_some();
        if removed {
            tracing::debug!(format = %id, "render target unmounted");
            self.refresh_global_warning();
        }
        removed
    }

    /// Encode every mounted format and hand the archive to `sink`.
    pub fn export_all(
        &self,
        telemetry: &mut dyn ExportTelemetry,
        sink: &mut dyn ArchiveSink,
    ) -> BrandframeResult<ExportReport> {
        let targets: Vec<(FormatId, Option<&RenderedSurface>)> = self
            .registry
            .configs()
            .iter()
            .map(|cfg: &TemplateConfig| (cfg.id.clone(), self.surface(&cfg.id)))
            .collect();
        let archive_prefix = self
            .opts
            .archive_prefix
            .clone()
            .or_else(|| self.registry.archive_prefix().map(str::to_string));

        BatchExporter::new()
            .with_format(self.opts.export_format)
            .with_prefix_chars(self.opts.file_prefix_chars)
            .with_default_name(self.opts.default_file_name.clone())
            .with_archive_prefix(archive_prefix)
            .export(&self.caption, &targets, telemetry, sink)
    }
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
