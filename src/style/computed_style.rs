use crate::style::color::Color;
use crate::style::parsed_style::{
    AlignItems, FlexDirection, FontWeight, JustifyContent, Length, ParsedValue, PropertyId, Style,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SizeValue {
    #[default]
    Auto,
    Length(Length),
}

impl SizeValue {
    /// Resolves against `base`; `None` for `Auto`.
    pub fn resolve(self, base: f32) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Length(length) => Some(length.resolve(base).max(0.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl EdgeInsets<Length> {
    pub fn resolve(&self, base_width: f32, base_height: f32) -> EdgeInsets<f32> {
        EdgeInsets {
            top: self.top.resolve(base_height).max(0.0),
            right: self.right.resolve(base_width).max(0.0),
            bottom: self.bottom.resolve(base_height).max(0.0),
            left: self.left.resolve(base_width).max(0.0),
        }
    }
}

impl EdgeInsets<f32> {
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Fully resolved attributes of one element. Every field has a value;
/// unset properties take the defaults below.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub background_color: Color,
    pub color: Color,
    pub padding: EdgeInsets<Length>,
    pub margin: EdgeInsets<Length>,
    pub width: SizeValue,
    pub height: SizeValue,
    pub border_width: Length,
    pub border_color: Color,
    pub border_radius: Length,
    pub flex_direction: FlexDirection,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub gap: Length,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub line_height: f32,
    pub flex_grow: f32,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            background_color: Color::TRANSPARENT,
            color: Color::BLACK,
            padding: EdgeInsets::default(),
            margin: EdgeInsets::default(),
            width: SizeValue::Auto,
            height: SizeValue::Auto,
            border_width: Length::ZERO,
            border_color: Color::BLACK,
            border_radius: Length::ZERO,
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::Start,
            align_items: AlignItems::Start,
            gap: Length::ZERO,
            font_size: 16.0,
            font_weight: FontWeight::NORMAL,
            line_height: 1.2,
            flex_grow: 0.0,
        }
    }
}

impl ComputedStyle {
    /// Defaults with the root text metrics replaced, as configured for the app.
    pub fn root(font_size: f32, line_height: f32) -> Self {
        Self {
            font_size,
            line_height,
            ..Self::default()
        }
    }
}

/// Resolves `parsed` on top of the defaults. Text color and font metrics
/// inherit from `parent` when the element leaves them unset.
pub fn compute_style(parsed: &Style, parent: Option<&ComputedStyle>) -> ComputedStyle {
    let mut computed = ComputedStyle::default();

    if let Some(parent) = parent {
        computed.color = parent.color;
        computed.font_size = parent.font_size;
        computed.font_weight = parent.font_weight;
        computed.line_height = parent.line_height;
    }

    for declaration in parsed.declarations() {
        let value = &declaration.value;
        match declaration.property {
            PropertyId::BackgroundColor => {
                computed.background_color = parse_color(value).unwrap_or(computed.background_color)
            }
            PropertyId::Color => computed.color = parse_color(value).unwrap_or(computed.color),
            PropertyId::PaddingTop => computed.padding.top = parse_length(value, computed.padding.top),
            PropertyId::PaddingRight => {
                computed.padding.right = parse_length(value, computed.padding.right)
            }
            PropertyId::PaddingBottom => {
                computed.padding.bottom = parse_length(value, computed.padding.bottom)
            }
            PropertyId::PaddingLeft => {
                computed.padding.left = parse_length(value, computed.padding.left)
            }
            PropertyId::MarginTop => computed.margin.top = parse_length(value, computed.margin.top),
            PropertyId::MarginRight => {
                computed.margin.right = parse_length(value, computed.margin.right)
            }
            PropertyId::MarginBottom => {
                computed.margin.bottom = parse_length(value, computed.margin.bottom)
            }
            PropertyId::MarginLeft => {
                computed.margin.left = parse_length(value, computed.margin.left)
            }
            PropertyId::Width => {
                if let Some(size) = parse_size_value(value) {
                    computed.width = size;
                }
            }
            PropertyId::Height => {
                if let Some(size) = parse_size_value(value) {
                    computed.height = size;
                }
            }
            PropertyId::BorderWidth => {
                computed.border_width = parse_length(value, computed.border_width)
            }
            PropertyId::BorderColor => {
                computed.border_color = parse_color(value).unwrap_or(computed.border_color)
            }
            PropertyId::BorderRadius => {
                computed.border_radius = parse_length(value, computed.border_radius)
            }
            PropertyId::FlexDirection => {
                if let ParsedValue::FlexDirection(direction) = value {
                    computed.flex_direction = *direction;
                }
            }
            PropertyId::JustifyContent => {
                if let ParsedValue::JustifyContent(justify) = value {
                    computed.justify_content = *justify;
                }
            }
            PropertyId::AlignItems => {
                if let ParsedValue::AlignItems(align) = value {
                    computed.align_items = *align;
                }
            }
            PropertyId::Gap => computed.gap = parse_length(value, computed.gap),
            PropertyId::FontSize => {
                if let ParsedValue::Length(Length::Px(px)) = value {
                    computed.font_size = px.max(0.0);
                }
            }
            PropertyId::FontWeight => {
                if let ParsedValue::FontWeight(weight) = value {
                    computed.font_weight = *weight;
                }
            }
            PropertyId::LineHeight => {
                if let ParsedValue::Number(factor) = value {
                    computed.line_height = factor.max(0.0);
                }
            }
            PropertyId::FlexGrow => {
                if let ParsedValue::Number(weight) = value {
                    computed.flex_grow = weight.max(0.0);
                }
            }
        }
    }

    computed
}

fn parse_size_value(input: &ParsedValue) -> Option<SizeValue> {
    match input {
        ParsedValue::Auto => Some(SizeValue::Auto),
        ParsedValue::Length(value) => Some(SizeValue::Length(*value)),
        _ => None,
    }
}

fn parse_length(input: &ParsedValue, fallback: Length) -> Length {
    match input {
        ParsedValue::Length(value) => *value,
        _ => fallback,
    }
}

fn parse_color(input: &ParsedValue) -> Option<Color> {
    let ParsedValue::Color(raw) = input else {
        return None;
    };
    Some(*raw)
}

#[cfg(test)]
mod tests {
    use super::{ComputedStyle, SizeValue, compute_style};
    use crate::style::{AlignItems, Color, FlexDirection, FontWeight, Length, Style};

    #[test]
    fn empty_style_resolves_to_defaults() {
        assert_eq!(compute_style(&Style::new(), None), ComputedStyle::default());
    }

    #[test]
    fn text_properties_inherit_from_parent() {
        let parent = compute_style(
            &Style::new()
                .color("#336699")
                .font_size(24.0)
                .font_weight(FontWeight::BOLD)
                .background(Color::WHITE),
            None,
        );
        let child = compute_style(&Style::new().width(10.0), Some(&parent));

        assert_eq!(child.color, Color::rgb(0x33, 0x66, 0x99));
        assert_eq!(child.font_size, 24.0);
        assert_eq!(child.font_weight, FontWeight::BOLD);
        // background is not inherited
        assert_eq!(child.background_color, Color::TRANSPARENT);
        assert_eq!(child.width, SizeValue::Length(Length::px(10.0)));
    }

    #[test]
    fn explicit_child_value_beats_inheritance() {
        let parent = compute_style(&Style::new().font_size(24.0), None);
        let child = compute_style(&Style::new().font_size(12.0), Some(&parent));
        assert_eq!(child.font_size, 12.0);
    }

    #[test]
    fn layout_keys_resolve() {
        let computed = compute_style(
            &Style::new()
                .column()
                .align(AlignItems::Stretch)
                .gap(Length::percent(10.0))
                .padding_x(3.0)
                .grow(2.0),
            None,
        );
        assert_eq!(computed.flex_direction, FlexDirection::Column);
        assert_eq!(computed.align_items, AlignItems::Stretch);
        assert_eq!(computed.gap.resolve(200.0), 20.0);
        let padding = computed.padding.resolve(100.0, 100.0);
        assert_eq!(padding.horizontal(), 6.0);
        assert_eq!(padding.vertical(), 0.0);
        assert_eq!(computed.flex_grow, 2.0);
    }
}
