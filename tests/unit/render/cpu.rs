use super::*;
use crate::assets::decode::PreparedImage;
use crate::config::template::TextRules;
use crate::foundation::core::Point;
use crate::text::wrap::TextMeasure;

/// Draws each line as a solid block half as tall as the glyph size; every char is `px / 2` wide.
struct BlockTypesetter;

impl TextMeasure for BlockTypesetter {
    fn measure(&mut self, text: &str, font_px: f32) -> f32 {
        text.chars().count() as f32 * font_px * 0.5
    }
}

impl CaptionTypesetter for BlockTypesetter {
    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        origin: Point,
        font_px: f32,
        color: Rgba8,
    ) -> BrandframeResult<()> {
        let w = f64::from(self.measure(text, font_px));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            origin.x,
            origin.y,
            origin.x + w,
            origin.y + f64::from(font_px) * 0.5,
        ));
        Ok(())
    }
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> ImagePaint {
    let bytes = rgba.repeat((w * h) as usize);
    let prepared = PreparedImage::from_straight_rgba8(w, h, bytes).unwrap();
    ImagePaint::from_prepared(&prepared).unwrap()
}

fn close(px: [u8; 4], want: [u8; 4]) -> bool {
    px.iter().zip(want).all(|(a, b)| a.abs_diff(b) <= 2)
}

fn text_cfg() -> TemplateConfig {
    TemplateConfig::new("T", 200, 120).with_text(TextRules {
        font_size_pt: 12.0,
        line_height: 1.0,
        max_lines: 3,
        origin: Point::new(5.0, 40.0),
        max_width_px: 60.0,
    })
}

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const CAPTION: [u8; 4] = [0x1d, 0x1d, 0x1b, 255];

#[test]
fn empty_format_is_background_only() {
    let cfg = TemplateConfig::new("EMPTY", 32, 16);
    let out = render_format(
        &cfg,
        None,
        Vec2::ZERO,
        OverlayState::NotConfigured,
        "",
        None,
        &RenderStyle::default(),
    )
    .unwrap();
    assert_eq!(out.surface.width, 32);
    assert_eq!(out.surface.height, 16);
    assert!(out.surface.premultiplied);
    assert!(out.surface.data.chunks_exact(4).all(|px| px == WHITE));
    assert!(!out.overflow);
    assert_eq!(out.lines_drawn, 0);
}

#[test]
fn photo_covers_only_its_area_and_pan_is_clamped() {
    let cfg = TemplateConfig::new("P", 100, 100).with_photo_area(60);
    let photo = solid(200, 100, BLUE);
    let out = render_format(
        &cfg,
        Some(&photo),
        Vec2::new(1000.0, 0.0),
        OverlayState::NotConfigured,
        "",
        None,
        &RenderStyle::default(),
    )
    .unwrap();

    // scale 0.6 -> 120x60, base x = -10, clamped to 0.
    assert!((out.pan.x - 10.0).abs() < 1e-9);
    assert!(out.pan.y.abs() < 1e-9);
    assert!(close(out.surface.pixel(50, 30).unwrap(), BLUE));
    assert!(close(out.surface.pixel(3, 3).unwrap(), BLUE));
    assert!(close(out.surface.pixel(96, 56).unwrap(), BLUE));
    assert_eq!(out.surface.pixel(50, 80).unwrap(), WHITE);
}

#[test]
fn failed_overlay_draws_warning_border() {
    let cfg = TemplateConfig::new("B", 100, 80).with_overlay("missing.png");
    let out = render_format(
        &cfg,
        None,
        Vec2::ZERO,
        OverlayState::Failed,
        "",
        None,
        &RenderStyle::default(),
    )
    .unwrap();
    let red = [255, 0, 0, 255];
    assert_eq!(out.surface.pixel(2, 40).unwrap(), red);
    assert_eq!(out.surface.pixel(50, 1).unwrap(), red);
    assert_eq!(out.surface.pixel(97, 40).unwrap(), red);
    assert_eq!(out.surface.pixel(50, 78).unwrap(), red);
    assert_eq!(out.surface.pixel(50, 40).unwrap(), WHITE);
}

#[test]
fn pending_overlay_draws_no_border() {
    let cfg = TemplateConfig::new("B", 100, 80).with_overlay("later.png");
    let out = render_format(
        &cfg,
        None,
        Vec2::ZERO,
        OverlayState::Pending,
        "",
        None,
        &RenderStyle::default(),
    )
    .unwrap();
    assert_eq!(out.surface.pixel(2, 40).unwrap(), WHITE);
    assert_eq!(out.surface.pixel(50, 1).unwrap(), WHITE);
}

#[test]
fn loaded_overlay_is_stretched_over_the_whole_format() {
    let cfg = TemplateConfig::new("O", 64, 48).with_overlay("o.png");
    let green = [0, 200, 0, 255];
    let overlay = solid(8, 8, green);
    let out = render_format(
        &cfg,
        Some(&solid(10, 10, BLUE)),
        Vec2::ZERO,
        OverlayState::Loaded(&overlay),
        "",
        None,
        &RenderStyle::default(),
    )
    .unwrap();
    assert!(close(out.surface.pixel(32, 24).unwrap(), green));
    assert!(close(out.surface.pixel(60, 44).unwrap(), green));
}

#[test]
fn overflowing_caption_is_clipped_to_max_lines() {
    let cfg = text_cfg();
    let mut ts = BlockTypesetter;
    let out = render_format(
        &cfg,
        None,
        Vec2::ZERO,
        OverlayState::NotConfigured,
        "aaaa bbbb cccc dddd eeee",
        Some(&mut ts),
        &RenderStyle::default(),
    )
    .unwrap();

    assert!(out.overflow);
    assert_eq!(out.lines_drawn, 3);
    // Line step is 12pt * 1.33 = 15.96px; blocks are 8px tall.
    assert_eq!(out.surface.pixel(8, 44).unwrap(), CAPTION);
    assert_eq!(out.surface.pixel(8, 60).unwrap(), CAPTION);
    assert_eq!(out.surface.pixel(8, 76).unwrap(), CAPTION);
    assert_eq!(out.surface.pixel(8, 92).unwrap(), WHITE);
}

#[test]
fn caption_within_limit_does_not_overflow() {
    let cfg = text_cfg();
    let mut ts = BlockTypesetter;
    let out = render_format(
        &cfg,
        None,
        Vec2::ZERO,
        OverlayState::NotConfigured,
        "ab cd\nef",
        Some(&mut ts),
        &RenderStyle::default(),
    )
    .unwrap();
    assert!(!out.overflow);
    assert_eq!(out.lines_drawn, 2);
}

#[test]
fn formats_without_text_ignore_the_caption() {
    let cfg = TemplateConfig::new("WEB", 40, 30);
    let photo = solid(20, 20, BLUE);
    let render = |caption: &str| {
        let mut ts = BlockTypesetter;
        render_format(
            &cfg,
            Some(&photo),
            Vec2::new(3.0, 0.0),
            OverlayState::NotConfigured,
            caption,
            Some(&mut ts),
            &RenderStyle::default(),
        )
        .unwrap()
    };
    let a = render("");
    let b = render("something long enough to wrap many times over");
    assert_eq!(a.surface, b.surface);
    assert_eq!(a.lines_drawn, 0);
    assert_eq!(b.lines_drawn, 0);
}
