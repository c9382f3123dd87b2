use super::*;

fn fixture_font() -> Vec<u8> {
    std::fs::read("tests/data/fonts/DejaVuSans-Bold.ttf").unwrap()
}

/// Inclusive ink bounds `(min_x, min_y, max_x, max_y)` of a `w`x`h` pixmap.
fn ink_bounds(pixmap: &vello_cpu::Pixmap, w: u16) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (i, px) in pixmap.data_as_u8_slice().chunks_exact(4).enumerate() {
        if px[3] < 64 {
            continue;
        }
        let x = (i % usize::from(w)) as u32;
        let y = (i / usize::from(w)) as u32;
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

fn draw(ts: &mut ParleyTypesetter, text: &str, origin: Point, px: f32) -> vello_cpu::Pixmap {
    let (w, h) = (600u16, 240u16);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ts.draw_line(&mut ctx, text, origin, px, Rgba8::opaque(0, 0, 0))
        .unwrap();
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    pixmap
}

#[test]
fn garbage_font_bytes_are_rejected() {
    assert!(ParleyTypesetter::from_font_bytes(b"not a font".to_vec()).is_err());
}

#[test]
fn fixture_font_registers_a_family_and_defaults_to_bold() {
    let ts = ParleyTypesetter::from_font_bytes(fixture_font()).unwrap();
    assert!(!ts.family_name().trim().is_empty());
    assert_eq!(ts.weight, parley::style::FontWeight::BOLD);

    let light = ts.with_weight(parley::style::FontWeight::NORMAL);
    assert_eq!(light.weight, parley::style::FontWeight::NORMAL);
}

#[test]
fn measured_width_grows_with_text_and_size() {
    let mut ts = ParleyTypesetter::from_font_bytes(fixture_font()).unwrap();

    let short = ts.measure("Zapisy", 48.0);
    let long = ts.measure("Zapisy trwają", 48.0);
    let bigger = ts.measure("Zapisy", 96.0);
    assert!(short > 0.0);
    assert!(long > short);
    assert!(bigger > short * 1.5);
    assert_eq!(ts.measure("", 48.0), 0.0);

    let one = ts.measure("H", 64.0);
    let six = ts.measure("HHHHHH", 64.0);
    assert!((six - one * 6.0).abs() < 1.0, "one={one} six={six}");
}

#[test]
fn drawn_line_advances_left_to_right_like_its_measure() {
    let mut ts = ParleyTypesetter::from_font_bytes(fixture_font()).unwrap();
    let origin = Point::new(20.0, 80.0);

    let one = ink_bounds(&draw(&mut ts, "H", origin, 64.0), 600).unwrap();
    let six = ink_bounds(&draw(&mut ts, "HHHHHH", origin, 64.0), 600).unwrap();
    let measured = ts.measure("HHHHHH", 64.0);

    let one_w = f64::from(one.2 - one.0);
    let six_w = f64::from(six.2 - six.0);
    assert!(six_w > one_w * 4.0, "one={one:?} six={six:?}");
    assert!(six_w > f64::from(measured) * 0.75, "ink {six_w} vs measure {measured}");
    assert!(f64::from(six.2) <= origin.x + f64::from(measured) + 2.0);
    assert!(f64::from(six.0) >= origin.x - 1.0);
}

#[test]
fn drawn_line_hangs_below_its_top_left_origin() {
    let mut ts = ParleyTypesetter::from_font_bytes(fixture_font()).unwrap();
    let origin = Point::new(20.0, 80.0);
    let (_, min_y, _, max_y) = ink_bounds(&draw(&mut ts, "Hello", origin, 64.0), 600).unwrap();

    assert!(f64::from(min_y) >= origin.y - 1.0, "ink top {min_y}");
    // Cap height of a 64 px face stays inside one line box.
    assert!(f64::from(max_y) <= origin.y + 64.0 * 1.3, "ink bottom {max_y}");
}

#[test]
fn empty_line_draws_nothing_and_bad_size_is_rejected() {
    let mut ts = ParleyTypesetter::from_font_bytes(fixture_font()).unwrap();
    assert!(ink_bounds(&draw(&mut ts, "", Point::new(5.0, 5.0), 40.0), 600).is_none());

    let mut ctx = vello_cpu::RenderContext::new(20, 20);
    let err = ts
        .draw_line(&mut ctx, "x", Point::ZERO, 0.0, Rgba8::opaque(0, 0, 0))
        .unwrap_err();
    assert!(matches!(err, BrandframeError::Validation(_)));
}
