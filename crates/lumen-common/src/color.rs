//! sRGB colour values.
//!
//! Cells of a pixel grid hold an [`Rgb`] triple. On the wire colours travel as
//! `#RRGGBB` strings; parsing also accepts the 3-digit shorthand and a missing
//! leading `#`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ColorParseError, ColorResult};

/// A 24-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Creates a new colour.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black, the colour of a fresh cell.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure red.
    pub const RED: Self = Self::new(255, 0, 0);
    /// Pure green.
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Pure blue.
    pub const BLUE: Self = Self::new(0, 0, 255);

    /// Parses `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive).
    pub fn parse_hex(input: &str) -> ColorResult<Self> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(input.to_string()));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            other => return Err(ColorParseError::InvalidLength(other)),
        };

        let channel = |range: std::ops::Range<usize>| {
            expanded
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| ColorParseError::InvalidDigit(input.to_string()))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats as upper-case `#RRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Returns the channels as an `[r, g, b]` array.
    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Scales every channel by `brightness / 255`, rounding half up.
    #[must_use]
    pub fn scaled(self, brightness: u8) -> Self {
        Self::new(
            scale_channel(self.r, brightness),
            scale_channel(self.g, brightness),
            scale_channel(self.b, brightness),
        )
    }
}

/// `round(channel * brightness / 255)` in integer arithmetic.
fn scale_channel(channel: u8, brightness: u8) -> u8 {
    let product = 2 * u32::from(channel) * u32::from(brightness);
    ((product + 255) / 510) as u8
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
