// src/core/color.rs

use super::error::FinderError;
use std::fmt;
use std::str::FromStr;

/// A parsed `#RRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    /// Red channel, 0-255
    pub red: u8,
    /// Green channel, 0-255
    pub green: u8,
    /// Blue channel, 0-255
    pub blue: u8,
}

impl HexColor {
    /// Parses a 7-character `#RRGGBB` string. Hex digits may be either case.
    pub fn parse(input: &str) -> Result<Self, FinderError> {
        let fail = |message: &str| FinderError::ColorParse {
            input: input.to_string(),
            message: message.to_string(),
        };

        let digits = input.strip_prefix('#').ok_or_else(|| fail("missing leading '#'"))?;
        if digits.len() != 6 {
            return Err(fail("expected exactly six hex digits after '#'"));
        }
        // Reject sign characters and non-ascii up front; from_str_radix would accept a leading '+'.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(fail("channel contains a non-hex character"));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|e| fail(&e.to_string()))
        };

        Ok(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }

    /// Channels scaled into `[0, 1]` by dividing by 255, in red, green, blue order.
    pub fn normalized(&self) -> [f64; 3] {
        [self.red, self.green, self.blue].map(|c| f64::from(c) / 255.0)
    }
}

impl FromStr for HexColor {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}
