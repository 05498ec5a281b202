use palette::Srgb;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Luminance above which a fill is considered light enough for black text.
const LUMINANCE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid color '{value}': expected #rgb or #rrggbb")]
pub struct ColorError {
    pub value: String,
}

/// An opaque sRGB colour, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct Color(Srgb<u8>);

impl Color {
    pub const BLACK: Color = Color(Srgb::new(0, 0, 0));
    pub const WHITE: Color = Color(Srgb::new(255, 255, 255));

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }

    /// Components in `[0, 1]`, ready for cairo.
    pub fn components(&self) -> (f64, f64, f64) {
        self.0.into_format::<f64>().into_components()
    }

    /// WCAG relative luminance of the colour.
    pub fn relative_luminance(&self) -> f64 {
        let linear = self.0.into_format::<f64>().into_linear::<f64>();
        0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
    }

    /// Text colour that stays readable on top of this fill.
    pub fn contrast_text(&self) -> Color {
        if self.relative_luminance() > LUMINANCE_THRESHOLD {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.starts_with('#') {
            return Err(ColorError {
                value: s.to_string(),
            });
        }
        trimmed
            .parse::<Srgb<u8>>()
            .map(Color)
            .map_err(|_| ColorError {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.0.red, self.0.green, self.0.blue
        )
    }
}
