use std::path::Path;

use crate::assets::paths::read_bytes;
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{BrandframeError, BrandframeResult};
use crate::text::wrap::TextMeasure;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Measures and draws single caption lines on a render surface.
///
/// The render pipeline wraps with [`TextMeasure`] and then asks for each visible line to be
/// drawn with its top-left corner at `origin`.
pub trait CaptionTypesetter: TextMeasure {
    /// Draw one already wrapped line.
    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        origin: Point,
        font_px: f32,
        color: Rgba8,
    ) -> BrandframeResult<()>;
}

/// Parley-shaped caption text drawn as `vello_cpu` glyph runs from one font file.
pub struct ParleyTypesetter {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    weight: parley::style::FontWeight,
}

impl std::fmt::Debug for ParleyTypesetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyTypesetter")
            .field("family_name", &self.family_name)
            .field("weight", &self.weight.value())
            .finish()
    }
}

impl ParleyTypesetter {
    /// Register the font in `font_bytes` and use its first family for every caption.
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> BrandframeResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            BrandframeError::asset("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BrandframeError::asset("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        tracing::debug!(family = %family_name, "caption font registered");
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
            weight: parley::style::FontWeight::BOLD,
        })
    }

    /// Shape captions with `weight` instead of the default bold.
    pub fn with_weight(mut self, weight: parley::style::FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Read a TTF/OTF file and register it.
    pub fn from_font_file(path: &Path) -> BrandframeResult<Self> {
        Self::from_font_bytes(read_bytes(path)?)
    }

    /// Family name detected in the font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout_line(
        &mut self,
        text: &str,
        font_px: f32,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(self.weight));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMeasure for ParleyTypesetter {
    fn measure(&mut self, text: &str, font_px: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.layout_line(text, font_px, TextBrushRgba8::default())
            .width()
    }
}

impl CaptionTypesetter for ParleyTypesetter {
    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        origin: Point,
        font_px: f32,
        color: Rgba8,
    ) -> BrandframeResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        if !font_px.is_finite() || font_px <= 0.0 {
            return Err(BrandframeError::validation(
                "caption font size must be finite and > 0",
            ));
        }

        let layout = self.layout_line(text, font_px, color.into());
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                // Positioned glyphs carry the run advance and the line baseline, so the line box
                // starts at the translated origin.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/typeset.rs"]
mod tests;
