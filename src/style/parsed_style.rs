use crate::error::InvalidStyleValue;
use crate::style::color::{Color, IntoColor};
use rustc_hash::FxHashMap;
use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    BackgroundColor,
    Color,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    Width,
    Height,
    BorderWidth,
    BorderColor,
    BorderRadius,
    FlexDirection,
    JustifyContent,
    AlignItems,
    Gap,
    FontSize,
    FontWeight,
    LineHeight,
    FlexGrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyContent {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignItems {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    /// Percentage of the parent's inner box on the same axis.
    Percent(f32),
}

impl Length {
    pub const ZERO: Length = Length::Px(0.0);

    pub const fn px(value: f32) -> Self {
        Self::Px(value)
    }

    pub const fn percent(value: f32) -> Self {
        Self::Percent(value)
    }

    pub fn resolve(self, base: f32) -> f32 {
        match self {
            Self::Px(v) => v,
            Self::Percent(v) => base.max(0.0) * v / 100.0,
        }
    }

    const fn raw(self) -> f32 {
        match self {
            Self::Px(v) | Self::Percent(v) => v,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f32> for Length {
    fn from(value: f32) -> Self {
        Self::Px(value)
    }
}

impl From<i32> for Length {
    fn from(value: i32) -> Self {
        Self::Px(value as f32)
    }
}

/// Four per-edge lengths, used for padding and margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Edges {
    pub const fn new() -> Self {
        Self::uniform(Length::ZERO)
    }

    pub const fn uniform(value: Length) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub const fn x(mut self, value: Length) -> Self {
        self.left = value;
        self.right = value;
        self
    }

    pub const fn y(mut self, value: Length) -> Self {
        self.top = value;
        self.bottom = value;
        self
    }

    pub const fn xy(self, x: Length, y: Length) -> Self {
        self.x(x).y(y)
    }

    pub const fn top(mut self, value: Length) -> Self {
        self.top = value;
        self
    }

    pub const fn right(mut self, value: Length) -> Self {
        self.right = value;
        self
    }

    pub const fn bottom(mut self, value: Length) -> Self {
        self.bottom = value;
        self
    }

    pub const fn left(mut self, value: Length) -> Self {
        self.left = value;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontWeight(u16);

impl FontWeight {
    pub const THIN: Self = Self(100);
    pub const LIGHT: Self = Self(300);
    pub const NORMAL: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const SEMI_BOLD: Self = Self(600);
    pub const BOLD: Self = Self(700);
    pub const BLACK: Self = Self(900);

    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Auto,
    Length(Length),
    Number(f32),
    Color(Color),
    FlexDirection(FlexDirection),
    JustifyContent(JustifyContent),
    AlignItems(AlignItems),
    FontWeight(FontWeight),
}

impl ParsedValue {
    /// Checks the value against the constraints of `property`.
    pub fn validate(&self, property: PropertyId) -> Result<(), InvalidStyleValue> {
        let fail = |reason: &'static str| -> Result<(), InvalidStyleValue> {
            Err(InvalidStyleValue { property, reason })
        };
        match (property, self) {
            (
                PropertyId::BackgroundColor | PropertyId::Color | PropertyId::BorderColor,
                ParsedValue::Color(_),
            ) => Ok(()),
            (PropertyId::Width | PropertyId::Height, ParsedValue::Auto) => Ok(()),
            (PropertyId::FontSize, ParsedValue::Length(Length::Px(v))) => {
                if !v.is_finite() || *v <= 0.0 {
                    fail("font size must be a positive number of pixels")
                } else {
                    Ok(())
                }
            }
            (PropertyId::FontSize, _) => fail("font size must be given in pixels"),
            (
                PropertyId::PaddingTop
                | PropertyId::PaddingRight
                | PropertyId::PaddingBottom
                | PropertyId::PaddingLeft
                | PropertyId::MarginTop
                | PropertyId::MarginRight
                | PropertyId::MarginBottom
                | PropertyId::MarginLeft
                | PropertyId::Width
                | PropertyId::Height
                | PropertyId::BorderWidth
                | PropertyId::BorderRadius
                | PropertyId::Gap,
                ParsedValue::Length(length),
            ) => {
                let raw = length.raw();
                if !raw.is_finite() {
                    fail("length must be finite")
                } else if raw < 0.0 {
                    fail("length must not be negative")
                } else {
                    Ok(())
                }
            }
            (PropertyId::FlexGrow, ParsedValue::Number(v)) => {
                if !v.is_finite() || *v < 0.0 {
                    fail("grow weight must be a non-negative number")
                } else {
                    Ok(())
                }
            }
            (PropertyId::LineHeight, ParsedValue::Number(v)) => {
                if !v.is_finite() || *v <= 0.0 {
                    fail("line height must be a positive factor")
                } else {
                    Ok(())
                }
            }
            (PropertyId::FontWeight, ParsedValue::FontWeight(weight)) => {
                if (1..=1000).contains(&weight.value()) {
                    Ok(())
                } else {
                    fail("font weight must be within 1..=1000")
                }
            }
            (PropertyId::FlexDirection, ParsedValue::FlexDirection(_))
            | (PropertyId::JustifyContent, ParsedValue::JustifyContent(_))
            | (PropertyId::AlignItems, ParsedValue::AlignItems(_)) => Ok(()),
            _ => fail("value kind is not accepted by this property"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: PropertyId,
    pub value: ParsedValue,
}

impl Declaration {
    pub fn new(property: PropertyId, value: ParsedValue) -> Self {
        Self { property, value }
    }
}

/// An ordered set of style directives folded left to right.
///
/// Each property keeps only its latest value. A directive that fails
/// validation is not stored; the first such failure is remembered and
/// reported by [`Style::validate`].
#[derive(Debug, Clone, Default)]
pub struct Style {
    declarations: Vec<Declaration>,
    index: FxHashMap<PropertyId, usize>,
    error: Option<InvalidStyleValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        let mut parsed = Self::new();
        for declaration in declarations {
            parsed.apply(declaration.property, declaration.value);
        }
        parsed
    }

    /// Validates and stores a directive, remembering the first failure.
    pub fn apply(&mut self, property: PropertyId, value: ParsedValue) {
        if let Err(err) = self.try_apply(property, value) {
            if self.error.is_none() {
                self.error = Some(err);
            }
        }
    }

    pub fn try_apply(
        &mut self,
        property: PropertyId,
        value: ParsedValue,
    ) -> Result<(), InvalidStyleValue> {
        value.validate(property)?;
        self.insert(property, value);
        Ok(())
    }

    fn insert(&mut self, property: PropertyId, value: ParsedValue) {
        let declaration = Declaration { property, value };
        match self.index.get(&property).copied() {
            Some(i) => self.declarations[i] = declaration,
            None => {
                self.declarations.push(declaration);
                let idx = self.declarations.len() - 1;
                self.index.insert(property, idx);
            }
        }
    }

    pub fn get(&self, property: PropertyId) -> Option<&ParsedValue> {
        self.index
            .get(&property)
            .and_then(|i| self.declarations.get(*i))
            .map(|decl| &decl.value)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn error(&self) -> Option<&InvalidStyleValue> {
        self.error.as_ref()
    }

    pub fn validate(&self) -> Result<(), InvalidStyleValue> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub fn merge(self, rhs: Self) -> Self {
        let mut merged = self;
        for declaration in rhs.declarations {
            merged.insert(declaration.property, declaration.value);
        }
        if merged.error.is_none() {
            merged.error = rhs.error;
        }
        merged
    }

    fn color_directive(mut self, property: PropertyId, color: impl IntoColor) -> Self {
        match color.into_color() {
            Some(color) => self.apply(property, ParsedValue::Color(color)),
            None => {
                if self.error.is_none() {
                    self.error = Some(InvalidStyleValue {
                        property,
                        reason: "unrecognized color",
                    });
                }
            }
        }
        self
    }

    fn length_directive(mut self, property: PropertyId, length: impl Into<Length>) -> Self {
        self.apply(property, ParsedValue::Length(length.into()));
        self
    }

    fn edges_directive(mut self, properties: [PropertyId; 4], edges: Edges) -> Self {
        let [top, right, bottom, left] = properties;
        self.apply(top, ParsedValue::Length(edges.top));
        self.apply(right, ParsedValue::Length(edges.right));
        self.apply(bottom, ParsedValue::Length(edges.bottom));
        self.apply(left, ParsedValue::Length(edges.left));
        self
    }

    pub fn background(self, color: impl IntoColor) -> Self {
        self.color_directive(PropertyId::BackgroundColor, color)
    }

    pub fn color(self, color: impl IntoColor) -> Self {
        self.color_directive(PropertyId::Color, color)
    }

    pub fn padding(self, value: impl Into<Length>) -> Self {
        self.padding_edges(Edges::uniform(value.into()))
    }

    pub fn padding_x(self, value: impl Into<Length>) -> Self {
        let value = value.into();
        self.length_directive(PropertyId::PaddingLeft, value)
            .length_directive(PropertyId::PaddingRight, value)
    }

    pub fn padding_y(self, value: impl Into<Length>) -> Self {
        let value = value.into();
        self.length_directive(PropertyId::PaddingTop, value)
            .length_directive(PropertyId::PaddingBottom, value)
    }

    pub fn padding_edges(self, edges: Edges) -> Self {
        self.edges_directive(
            [
                PropertyId::PaddingTop,
                PropertyId::PaddingRight,
                PropertyId::PaddingBottom,
                PropertyId::PaddingLeft,
            ],
            edges,
        )
    }

    pub fn margin(self, value: impl Into<Length>) -> Self {
        self.margin_edges(Edges::uniform(value.into()))
    }

    pub fn margin_x(self, value: impl Into<Length>) -> Self {
        let value = value.into();
        self.length_directive(PropertyId::MarginLeft, value)
            .length_directive(PropertyId::MarginRight, value)
    }

    pub fn margin_y(self, value: impl Into<Length>) -> Self {
        let value = value.into();
        self.length_directive(PropertyId::MarginTop, value)
            .length_directive(PropertyId::MarginBottom, value)
    }

    pub fn margin_edges(self, edges: Edges) -> Self {
        self.edges_directive(
            [
                PropertyId::MarginTop,
                PropertyId::MarginRight,
                PropertyId::MarginBottom,
                PropertyId::MarginLeft,
            ],
            edges,
        )
    }

    pub fn width(self, value: impl Into<Length>) -> Self {
        self.length_directive(PropertyId::Width, value)
    }

    pub fn height(self, value: impl Into<Length>) -> Self {
        self.length_directive(PropertyId::Height, value)
    }

    pub fn size(self, width: impl Into<Length>, height: impl Into<Length>) -> Self {
        self.width(width).height(height)
    }

    pub fn auto_width(mut self) -> Self {
        self.apply(PropertyId::Width, ParsedValue::Auto);
        self
    }

    pub fn auto_height(mut self) -> Self {
        self.apply(PropertyId::Height, ParsedValue::Auto);
        self
    }

    pub fn border(self, width: impl Into<Length>, color: impl IntoColor) -> Self {
        self.border_width(width).border_color(color)
    }

    pub fn border_width(self, width: impl Into<Length>) -> Self {
        self.length_directive(PropertyId::BorderWidth, width)
    }

    pub fn border_color(self, color: impl IntoColor) -> Self {
        self.color_directive(PropertyId::BorderColor, color)
    }

    pub fn corner_radius(self, radius: impl Into<Length>) -> Self {
        self.length_directive(PropertyId::BorderRadius, radius)
    }

    pub fn direction(mut self, direction: FlexDirection) -> Self {
        self.apply(PropertyId::FlexDirection, ParsedValue::FlexDirection(direction));
        self
    }

    pub fn row(self) -> Self {
        self.direction(FlexDirection::Row)
    }

    pub fn column(self) -> Self {
        self.direction(FlexDirection::Column)
    }

    pub fn justify(mut self, justify: JustifyContent) -> Self {
        self.apply(PropertyId::JustifyContent, ParsedValue::JustifyContent(justify));
        self
    }

    pub fn align(mut self, align: AlignItems) -> Self {
        self.apply(PropertyId::AlignItems, ParsedValue::AlignItems(align));
        self
    }

    pub fn gap(self, gap: impl Into<Length>) -> Self {
        self.length_directive(PropertyId::Gap, gap)
    }

    pub fn font_size(self, px: f32) -> Self {
        self.length_directive(PropertyId::FontSize, Length::Px(px))
    }

    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.apply(PropertyId::FontWeight, ParsedValue::FontWeight(weight));
        self
    }

    pub fn line_height(mut self, factor: f32) -> Self {
        self.apply(PropertyId::LineHeight, ParsedValue::Number(factor));
        self
    }

    pub fn grow(mut self, weight: f32) -> Self {
        self.apply(PropertyId::FlexGrow, ParsedValue::Number(weight));
        self
    }
}

/// Two styles are equal when they resolve every property to the same value.
/// The order the directives were applied in does not matter.
impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        self.error == other.error
            && self.declarations.len() == other.declarations.len()
            && self
                .declarations
                .iter()
                .all(|decl| other.get(decl.property) == Some(&decl.value))
    }
}

impl Add for Style {
    type Output = Style;

    fn add(self, rhs: Self) -> Self::Output {
        self.merge(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::{Declaration, Length, ParsedValue, PropertyId, Style};
    use crate::style::Color;

    #[test]
    fn directives_on_different_keys_commute() {
        let a = Style::new().width(10.0).background(Color::WHITE);
        let b = Style::new().background(Color::WHITE).width(10.0);
        assert_eq!(a, b);
        assert_ne!(a, Style::new().background(Color::WHITE).width(12.0));
        assert_ne!(a, Style::new().width(10.0));
    }

    #[test]
    fn later_directive_wins_for_same_key() {
        let style = Style::new().background("#ff0000").background("#0000ff");
        assert_eq!(
            style.get(PropertyId::BackgroundColor),
            Some(&ParsedValue::Color(Color::rgb(0, 0, 255)))
        );
        assert_eq!(style.declarations().len(), 1);
    }

    #[test]
    fn disjoint_directives_are_independent_of_order() {
        let a = Style::new().width(10.0).background(Color::WHITE);
        let b = Style::new().background(Color::WHITE).width(10.0);
        for style in [&a, &b] {
            assert_eq!(
                style.get(PropertyId::Width),
                Some(&ParsedValue::Length(Length::Px(10.0)))
            );
            assert_eq!(
                style.get(PropertyId::BackgroundColor),
                Some(&ParsedValue::Color(Color::WHITE))
            );
        }
    }

    #[test]
    fn negative_size_is_rejected_at_construction() {
        let style = Style::new().width(-5.0).height(20.0);
        let err = style.validate().unwrap_err();
        assert_eq!(err.property, PropertyId::Width);
        assert_eq!(style.get(PropertyId::Width), None);
        assert!(style.get(PropertyId::Height).is_some());
    }

    #[test]
    fn first_invalid_directive_is_the_one_reported() {
        let style = Style::new().background("not-a-color").font_size(0.0);
        assert_eq!(style.error().map(|e| e.property), Some(PropertyId::BackgroundColor));
    }

    #[test]
    fn mismatched_value_kind_is_rejected() {
        let mut style = Style::new();
        let err = style
            .try_apply(PropertyId::Gap, ParsedValue::Color(Color::BLACK))
            .unwrap_err();
        assert_eq!(err.property, PropertyId::Gap);
        assert!(style.is_empty());
    }

    #[test]
    fn declarations_fold_left_to_right() {
        let style = Style::from_declarations([
            Declaration::new(PropertyId::Gap, ParsedValue::Length(Length::px(4.0))),
            Declaration::new(PropertyId::Gap, ParsedValue::Length(Length::px(8.0))),
        ]);
        assert_eq!(
            style.get(PropertyId::Gap),
            Some(&ParsedValue::Length(Length::px(8.0)))
        );
    }

    #[test]
    fn merge_prefers_right_hand_side() {
        let merged = Style::new().padding(4.0).gap(2.0) + Style::new().gap(6.0);
        assert_eq!(
            merged.get(PropertyId::Gap),
            Some(&ParsedValue::Length(Length::px(6.0)))
        );
        assert_eq!(
            merged.get(PropertyId::PaddingLeft),
            Some(&ParsedValue::Length(Length::px(4.0)))
        );
    }
}
