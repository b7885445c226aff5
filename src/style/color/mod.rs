use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

mod hex_color;

pub use hex_color::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear-light RGBA, the form paint backends blend in.
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a as f32 / 255.0,
        ]
    }

    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` or a named color.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.starts_with('#') {
            return parse_hex(raw);
        }
        NAMED_COLORS.get(raw.to_ascii_lowercase().as_str()).copied()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Anything a style directive accepts as a color. `None` means the input
/// could not be understood and the directive is rejected.
pub trait IntoColor {
    fn into_color(self) -> Option<Color>;
}

impl IntoColor for Color {
    fn into_color(self) -> Option<Color> {
        Some(self)
    }
}

impl IntoColor for &str {
    fn into_color(self) -> Option<Color> {
        Color::parse(self)
    }
}

impl IntoColor for String {
    fn into_color(self) -> Option<Color> {
        Color::parse(&self)
    }
}

impl IntoColor for &String {
    fn into_color(self) -> Option<Color> {
        Color::parse(self)
    }
}

impl IntoColor for [u8; 4] {
    fn into_color(self) -> Option<Color> {
        let [r, g, b, a] = self;
        Some(Color::rgba(r, g, b, a))
    }
}

static NAMED_COLORS: Lazy<FxHashMap<&'static str, Color>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    map.insert("black", Color::BLACK);
    map.insert("white", Color::WHITE);
    map.insert("transparent", Color::TRANSPARENT);
    map.insert("red", Color::rgb(255, 0, 0));
    map.insert("green", Color::rgb(0, 128, 0));
    map.insert("blue", Color::rgb(0, 0, 255));
    map.insert("gray", Color::rgb(128, 128, 128));
    map.insert("grey", Color::rgb(128, 128, 128));
    map.insert("orange", Color::rgb(255, 165, 0));
    map.insert("yellow", Color::rgb(255, 255, 0));
    map.insert("purple", Color::rgb(128, 0, 128));
    map
});

static SRGB8_TO_LINEAR: Lazy<[f32; 256]> = Lazy::new(|| {
    let mut t = [0.0f32; 256];
    for (i, slot) in t.iter_mut().enumerate() {
        *slot = srgb_to_linear_f32(i as f32 / 255.0);
    }
    t
});

pub fn srgb_to_linear(c: u8) -> f32 {
    SRGB8_TO_LINEAR[c as usize]
}

pub fn srgb_to_linear_f32(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(Color::parse("#61afef"), Some(Color::rgb(0x61, 0xaf, 0xef)));
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("#0000"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("Red"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("chartreuse-ish"), None);
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        let [r, g, b, a] = Color::WHITE.to_rgba_f32();
        assert!((r - 1.0).abs() < 1e-6 && (g - 1.0).abs() < 1e-6 && (b - 1.0).abs() < 1e-6);
        assert_eq!(a, 1.0);
        assert_eq!(Color::BLACK.to_rgba_f32()[0], 0.0);
    }
}
