use std::cell::RefCell;
use std::fmt;

use cosmic_text::{Align, Attrs, Buffer, FontSystem, Metrics, Shaping, Weight, Wrap};
use glam::Vec2;

use crate::style::ComputedStyle;

/// Measures the box a run of text occupies.
pub trait TextMeasurer {
    /// Size of `text` in the given style, wrapping at `max_width` if set.
    fn measure(&self, text: &str, style: &ComputedStyle, max_width: Option<f32>) -> Vec2;
}

/// Deterministic measurer: every character advances by a fixed fraction of
/// the font size. Lines wrap by character count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Advance per character, as a multiple of the font size.
    pub advance: f32,
}

impl MonospaceMeasurer {
    pub const fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, style: &ComputedStyle, max_width: Option<f32>) -> Vec2 {
        let char_width = (style.font_size * self.advance).max(0.0);
        let line_px = style.font_size * style.line_height;
        if text.is_empty() {
            return Vec2::new(0.0, line_px);
        }

        let lines: Vec<f32> = text
            .split('\n')
            .map(|line| line.chars().count() as f32 * char_width)
            .collect();
        let widest = lines.iter().copied().fold(0.0_f32, f32::max);

        let (width, line_count) = match max_width {
            Some(limit) if widest > limit && char_width > 0.0 => {
                let per_line = (limit / char_width).floor().max(1.0) * char_width;
                let wrapped = lines
                    .iter()
                    .map(|width| (width / per_line).ceil().max(1.0) as usize)
                    .sum::<usize>();
                (per_line.min(widest), wrapped)
            }
            _ => (widest, lines.len()),
        };

        Vec2::new(width, line_px * line_count as f32)
    }
}

/// Measures with real font shaping through cosmic-text.
///
/// Loads system fonts on construction, which can take a while.
pub struct ShapedTextMeasurer {
    font_system: RefCell<FontSystem>,
}

impl ShapedTextMeasurer {
    pub fn new() -> Self {
        Self {
            font_system: RefCell::new(FontSystem::new()),
        }
    }
}

impl Default for ShapedTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShapedTextMeasurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapedTextMeasurer").finish_non_exhaustive()
    }
}

impl TextMeasurer for ShapedTextMeasurer {
    fn measure(&self, text: &str, style: &ComputedStyle, max_width: Option<f32>) -> Vec2 {
        let font_size = style.font_size.max(1.0);
        let line_height_px = (font_size * style.line_height).max(1.0);
        let mut font_system = self.font_system.borrow_mut();
        let font_system = &mut *font_system;

        let mut buffer = Buffer::new(font_system, Metrics::new(font_size, line_height_px));
        buffer.set_wrap(font_system, Wrap::WordOrGlyph);
        buffer.set_size(font_system, max_width, None);
        let attrs = Attrs::new().weight(Weight(style.font_weight.value()));
        buffer.set_text(font_system, text, &attrs, Shaping::Advanced, Some(Align::Left));
        buffer.shape_until_scroll(font_system, false);

        let (width, lines) = buffer
            .layout_runs()
            .fold((0.0_f32, 0usize), |(width, lines), run| {
                (width.max(run.line_w), lines + 1)
            });
        Vec2::new(width.ceil(), line_height_px * lines.max(1) as f32)
    }
}
