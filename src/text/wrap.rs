//! Greedy caption wrapping over an injected width measurement.

use crate::config::template::TextRules;

/// Width measurement over the active caption font.
///
/// The wrapping engine never measures glyphs itself; it asks the render surface's font metrics.
pub trait TextMeasure {
    /// Advance width of `text` set at `font_px`, in pixels.
    fn measure(&mut self, text: &str, font_px: f32) -> f32;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str, f32) -> f32,
{
    fn measure(&mut self, text: &str, font_px: f32) -> f32 {
        self(text, font_px)
    }
}

/// Wrapped caption for one format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedCaption {
    /// Every wrapped line, including the ones past `max_lines`.
    pub lines: Vec<String>,
    /// Line budget of the format.
    pub max_lines: usize,
}

impl WrappedCaption {
    /// More lines were produced than the format allows.
    pub fn overflow(&self) -> bool {
        self.lines.len() > self.max_lines
    }

    /// Lines that are actually drawn.
    pub fn visible(&self) -> &[String] {
        &self.lines[..self.lines.len().min(self.max_lines)]
    }
}

/// Split `caption` into display lines no wider than `max_width_px`.
///
/// Paragraphs (explicit line breaks) wrap independently. Within a paragraph words are appended
/// while the joined line measures strictly below the limit; a single word wider than the limit
/// stays on its own line. Every paragraph yields at least one, possibly empty, line.
pub fn wrap_caption(
    caption: &str,
    font_px: f32,
    max_width_px: f32,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in caption.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut words = paragraph.split(' ');
        let mut current = words.next().unwrap_or_default().to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure.measure(&candidate, font_px) < max_width_px {
                current = candidate;
            } else {
                lines.push(current.trim().to_string());
                current = word.to_string();
            }
        }
        lines.push(current.trim().to_string());
    }
    lines
}

/// Wrap `caption` with a format's text rules and attach its line budget.
pub fn layout_caption(
    caption: &str,
    rules: &TextRules,
    measure: &mut dyn TextMeasure,
) -> WrappedCaption {
    WrappedCaption {
        lines: wrap_caption(caption, rules.font_px(), rules.max_width_px, measure),
        max_lines: rules.max_lines,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
