use crate::foundation::core::{Point, Rect, Size, Vec2};

/// Cover-fit scale: the smallest uniform scale at which `photo` fully covers `area`.
///
/// Returns `0.0` for a degenerate photo.
pub fn cover_fit(area: Size, photo: Size) -> f64 {
    if photo.width <= 0.0 || photo.height <= 0.0 {
        return 0.0;
    }
    (area.width / photo.width).max(area.height / photo.height)
}

/// Where and how large the source photo is drawn for one format.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoPlacement {
    /// Uniform cover-fit scale.
    pub scale: f64,
    /// Scaled photo size.
    pub size: Size,
    /// Centered position before any pan.
    pub base: Point,
    /// Draw position after applying the pan and clamping.
    pub clamped: Point,
    /// Pan offset that reproduces `clamped` (`clamped - base`).
    pub offset: Vec2,
}

impl PhotoPlacement {
    /// Drawn rectangle in surface coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.clamped, self.size)
    }
}

/// Cover-fit `photo` into the `area_w` x `area_h` photo area, apply `pan` and clamp.
///
/// The clamped draw origin on each axis lies in `[area - scaled, 0]`, so the photo rectangle
/// always contains the photo area. The returned `offset` is the pan to write back.
pub fn place_photo(area_w: f64, area_h: f64, photo: Size, pan: Vec2) -> PhotoPlacement {
    let scale = cover_fit(Size::new(area_w, area_h), photo);
    let size = Size::new(photo.width * scale, photo.height * scale);
    let base = Point::new((area_w - size.width) / 2.0, (area_h - size.height) / 2.0);

    let target = base + pan;
    // Scaled size can fall a hair short of the area through rounding; keep min <= max.
    let clamped = Point::new(
        target.x.clamp((area_w - size.width).min(0.0), 0.0),
        target.y.clamp((area_h - size.height).min(0.0), 0.0),
    );

    PhotoPlacement {
        scale,
        size,
        base,
        clamped,
        offset: clamped - base,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/placement.rs"]
mod tests;
