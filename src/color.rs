//! Hex / RGB / HSL conversions.
//!
//! Distances are plain Euclidean RGB. That is a proximity metric only and is
//! not meant to model perceived color difference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// A color with its RGB and HSL forms computed once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    hex: String,
    rgb: (u8, u8, u8),
    hsl: (f64, f64, f64),
}

impl Color {
    /// Parse a `#RRGGBB` string.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let (r, g, b) = hex_to_rgb(hex)?;
        Ok(Self::from_rgb(r, g, b))
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            hex: rgb_to_hex(r.into(), g.into(), b.into()),
            rgb: (r, g, b),
            hsl: rgb_to_hsl(r, g, b),
        }
    }

    /// Uppercase `#RRGGBB`.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        self.rgb
    }

    /// Hue in [0,360), saturation and lightness in [0,100].
    pub fn hsl(&self) -> (f64, f64, f64) {
        self.hsl
    }

    pub fn hue(&self) -> f64 {
        self.hsl.0
    }

    pub fn saturation(&self) -> f64 {
        self.hsl.1
    }

    pub fn lightness(&self) -> f64 {
        self.hsl.2
    }

    pub fn distance(&self, other: &Color) -> f64 {
        color_distance(self.rgb, other.rgb)
    }

    pub fn name(&self) -> &'static str {
        color_name(self)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.hex
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

/// Parse `#RRGGBB` (case-insensitive) into its channels.
pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8), ColorError> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| ColorError::Format(hex.to_string()))?;

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::Format(hex.to_string()))
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format channels as uppercase `#RRGGBB`, clamping each into [0,255] first.
pub fn rgb_to_hex(r: i32, g: i32, b: i32) -> String {
    let clamp = |c: i32| c.clamp(0, 255) as u8;
    format!("#{:02X}{:02X}{:02X}", clamp(r), clamp(g), clamp(b))
}

/// Standard RGB → HSL. Achromatic input yields exactly `h = 0, s = 0`.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    let mut hue = h * 60.0;
    if hue >= 360.0 {
        hue -= 360.0;
    }

    (hue, s * 100.0, l * 100.0)
}

/// Euclidean distance in 0-255 RGB space.
pub fn color_distance(c1: (u8, u8, u8), c2: (u8, u8, u8)) -> f64 {
    let dr = c1.0 as f64 - c2.0 as f64;
    let dg = c1.1 as f64 - c2.1 as f64;
    let db = c1.2 as f64 - c2.2 as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Coarse human name for a color, used in palette listings.
pub fn color_name(color: &Color) -> &'static str {
    let (h, s, l) = color.hsl();

    if l < 20.0 {
        return "black";
    }
    if l > 85.0 {
        return "white";
    }
    if s < 15.0 {
        return "gray";
    }

    match h {
        h if h < 15.0 => "red",
        h if h < 45.0 => "orange",
        h if h < 75.0 => "yellow",
        h if h < 165.0 => "green",
        h if h < 195.0 => "cyan",
        h if h < 255.0 => "blue",
        h if h < 285.0 => "purple",
        h if h < 315.0 => "pink",
        h if h < 360.0 => "red",
        _ => "colorful",
    }
}
