//! # Color Specs
//!
//! The game accepts CSS-like color strings. `Color` keeps the three forms the
//! effects use apart so generators can reason about hue and lightness, and
//! renders them back to the exact string form on the wire.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color '{0}'")]
    Hex(String),
    #[error("invalid rgb() color '{0}'")]
    Rgb(String),
    #[error("invalid hsl() color '{0}'")]
    Hsl(String),
    #[error("unsupported color format '{0}'")]
    Unsupported(String),
}

/// A color as understood by the remote drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    /// `#RRGGBB`.
    Hex([u8; 3]),
    /// `rgb(r,g,b)`.
    Rgb([u8; 3]),
    /// `hsl(h,s%,l%)`. Hue in degrees, saturation and lightness in percent.
    Hsl {
        hue: f32,
        saturation: f32,
        lightness: f32,
    },
}

impl Color {
    pub const WHITE: Color = Color::Hex([0xFF, 0xFF, 0xFF]);
    pub const BLACK: Color = Color::Hex([0x00, 0x00, 0x00]);

    /// Builds an HSL color, wrapping the hue into `[0, 360)`.
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        Color::Hsl {
            hue: hue.rem_euclid(360.0),
            saturation,
            lightness,
        }
    }

    /// A fully random hue at fixed saturation and lightness.
    pub fn random_hsl(rng: &mut impl Rng, saturation: f32, lightness: f32) -> Self {
        Self::hsl(rng.gen_range(0.0..360.0), saturation, lightness)
    }

    pub fn hue(&self) -> Option<f32> {
        match self {
            Color::Hsl { hue, .. } => Some(*hue),
            _ => None,
        }
    }

    pub fn lightness(&self) -> Option<f32> {
        match self {
            Color::Hsl { lightness, .. } => Some(*lightness),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hex([r, g, b]) => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Rgb([r, g, b]) => write!(f, "rgb({},{},{})", r, g, b),
            Color::Hsl {
                hue,
                saturation,
                lightness,
            } => write!(f, "hsl({},{}%,{}%)", hue, saturation, lightness),
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(digits) = s.strip_prefix('#') {
            return parse_hex(digits).ok_or_else(|| ColorParseError::Hex(s.to_string()));
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = functional_args(&lower, "rgb") {
            let channels: Vec<u8> = args
                .iter()
                .map(|a| a.parse::<u8>())
                .collect::<Result<_, _>>()
                .map_err(|_| ColorParseError::Rgb(s.to_string()))?;
            return match channels.as_slice() {
                [r, g, b] => Ok(Color::Rgb([*r, *g, *b])),
                _ => Err(ColorParseError::Rgb(s.to_string())),
            };
        }

        if let Some(args) = functional_args(&lower, "hsl") {
            let values: Vec<f32> = args
                .iter()
                .map(|a| a.trim_end_matches('%').parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|_| ColorParseError::Hsl(s.to_string()))?;
            return match values.as_slice() {
                [h, sat, l] => Ok(Color::hsl(*h, *sat, *l)),
                _ => Err(ColorParseError::Hsl(s.to_string())),
            };
        }

        Err(ColorParseError::Unsupported(s.to_string()))
    }
}

fn parse_hex(digits: &str) -> Option<Color> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let mut out = [0u8; 3];
            for (slot, c) in out.iter_mut().zip(digits.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 16 + v;
            }
            Some(Color::Hex(out))
        }
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some(Color::Hex([r, g, b]))
        }
        _ => None,
    }
}

/// Splits `name(a, b, c)` into its trimmed arguments.
fn functional_args<'a>(s: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = s.strip_prefix(name)?.trim_start();
    let inner = inner.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(Color::Hex([0xE6, 0x00, 0x00]).to_string(), "#E60000");
        assert_eq!(Color::Rgb([40, 40, 40]).to_string(), "rgb(40,40,40)");
        assert_eq!(Color::hsl(36.0, 100.0, 50.0).to_string(), "hsl(36,100%,50%)");
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(
            "#7A3D03".parse::<Color>().unwrap(),
            Color::Hex([0x7A, 0x3D, 0x03])
        );
        assert_eq!(
            "rgb(40, 40, 40)".parse::<Color>().unwrap(),
            Color::Rgb([40, 40, 40])
        );
        let hsl: Color = "hsl(200,80%,45.5%)".parse().unwrap();
        assert_eq!(hsl.hue(), Some(200.0));
        assert_eq!(hsl.lightness(), Some(45.5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Color>(), Err(ColorParseError::Empty));
        assert!(matches!("#12345".parse::<Color>(), Err(ColorParseError::Hex(_))));
        assert!(matches!("rgb(1,2)".parse::<Color>(), Err(ColorParseError::Rgb(_))));
        assert!(matches!("rgb(1,2,300)".parse::<Color>(), Err(ColorParseError::Rgb(_))));
        assert!(matches!("hsl(a,b,c)".parse::<Color>(), Err(ColorParseError::Hsl(_))));
        assert!(matches!("red".parse::<Color>(), Err(ColorParseError::Unsupported(_))));
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(Color::hsl(370.0, 50.0, 50.0).hue(), Some(10.0));
        assert_eq!(Color::hsl(-30.0, 50.0, 50.0).hue(), Some(330.0));
    }
}
