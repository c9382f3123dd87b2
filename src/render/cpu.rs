use crate::assets::overlay::OverlayState;
use crate::compose::placement::place_photo;
use crate::config::template::TemplateConfig;
use crate::foundation::core::{Rgba8, Vec2};
use crate::foundation::error::{BrandframeError, BrandframeResult};
use crate::render::paint::ImagePaint;
use crate::render::surface::RenderedSurface;
use crate::text::typeset::CaptionTypesetter;
use crate::text::wrap::layout_caption;

/// Colors and sizes shared by every format's render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    /// Fill under everything else.
    pub background: Rgba8,
    /// Caption color.
    pub text_color: Rgba8,
    /// Border drawn when a configured overlay is unavailable.
    pub warning_border: Rgba8,
    /// Border thickness in pixels.
    pub warning_border_px: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::WHITE,
            text_color: Rgba8::opaque(0x1d, 0x1d, 0x1b),
            warning_border: Rgba8::RED,
            warning_border_px: 5.0,
        }
    }
}

/// Result of one render pass.
#[derive(Clone, Debug)]
pub struct FormatRender {
    /// Freshly drawn pixels.
    pub surface: RenderedSurface,
    /// The caption wrapped to more lines than the format allows.
    pub overflow: bool,
    /// Number of caption lines actually drawn.
    pub lines_drawn: usize,
    /// Pan offset after clamping; callers store it back.
    pub pan: Vec2,
}

/// Compose one format from scratch.
///
/// Layers, bottom to top: background fill, cover-fit photo at the clamped pan, overlay (or a
/// warning border when the overlay failed to load), caption lines. The surface never depends on
/// previous passes.
pub fn render_format(
    cfg: &TemplateConfig,
    photo: Option<&ImagePaint>,
    pan: Vec2,
    overlay: OverlayState<'_>,
    caption: &str,
    typesetter: Option<&mut dyn CaptionTypesetter>,
    style: &RenderStyle,
) -> BrandframeResult<FormatRender> {
    let w: u16 = cfg
        .width
        .try_into()
        .map_err(|_| BrandframeError::render(format!("format '{}' width exceeds u16", cfg.id)))?;
    let h: u16 = cfg
        .height
        .try_into()
        .map_err(|_| BrandframeError::render(format!("format '{}' height exceeds u16", cfg.id)))?;
    let fw = f64::from(cfg.width);
    let fh = f64::from(cfg.height);

    let mut ctx = vello_cpu::RenderContext::new(w, h);

    set_color(&mut ctx, style.background);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, fw, fh));

    let mut out_pan = pan;
    if let Some(photo) = photo {
        let placement = place_photo(fw, f64::from(cfg.photo_area), photo.size(), pan);
        out_pan = placement.offset;
        ctx.set_transform(
            vello_cpu::kurbo::Affine::translate((placement.clamped.x, placement.clamped.y))
                * vello_cpu::kurbo::Affine::scale(placement.scale),
        );
        ctx.set_paint(photo.paint.clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(photo.width()),
            f64::from(photo.height()),
        ));
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    match overlay {
        OverlayState::NotConfigured | OverlayState::Pending => {}
        OverlayState::Loaded(paint) => {
            ctx.set_transform(vello_cpu::kurbo::Affine::scale_non_uniform(
                fw / f64::from(paint.width()),
                fh / f64::from(paint.height()),
            ));
            ctx.set_paint(paint.paint.clone());
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(paint.width()),
                f64::from(paint.height()),
            ));
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        }
        OverlayState::Failed => {
            draw_border(&mut ctx, fw, fh, style.warning_border_px, style.warning_border);
        }
    }

    let mut overflow = false;
    let mut lines_drawn = 0;
    if let Some(rules) = &cfg.text
        && !caption.is_empty()
    {
        match typesetter {
            Some(ts) => {
                let wrapped = layout_caption(caption, rules, &mut *ts);
                overflow = wrapped.overflow();
                let step = rules.line_step_px();
                for (i, line) in wrapped.visible().iter().enumerate() {
                    let origin = rules.origin + Vec2::new(0.0, step * i as f64);
                    ts.draw_line(&mut ctx, line.trim(), origin, rules.font_px(), style.text_color)?;
                    lines_drawn += 1;
                }
                if overflow {
                    tracing::warn!(
                        format = %cfg.id,
                        lines = wrapped.lines.len(),
                        max_lines = rules.max_lines,
                        "caption clipped"
                    );
                }
            }
            None => {
                tracing::warn!(format = %cfg.id, "no caption typesetter; text layer skipped");
            }
        }
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    tracing::debug!(format = %cfg.id, pan_x = out_pan.x, pan_y = out_pan.y, lines_drawn, overflow, "format rendered");
    Ok(FormatRender {
        surface: RenderedSurface::from_pixmap(&pixmap),
        overflow,
        lines_drawn,
        pan: out_pan,
    })
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn draw_border(ctx: &mut vello_cpu::RenderContext, w: f64, h: f64, px: f64, color: Rgba8) {
    let t = px.clamp(0.0, w.min(h) / 2.0);
    if t <= 0.0 {
        return;
    }
    set_color(ctx, color);
    for r in [
        vello_cpu::kurbo::Rect::new(0.0, 0.0, w, t),
        vello_cpu::kurbo::Rect::new(0.0, h - t, w, h),
        vello_cpu::kurbo::Rect::new(0.0, t, t, h - t),
        vello_cpu::kurbo::Rect::new(w - t, t, w, h - t),
    ] {
        ctx.fill_rect(&r);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
