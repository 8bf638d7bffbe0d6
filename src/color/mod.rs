//! Color codec and RGB distance
//!
//! Colors travel through the tool as hex strings (`#RGB` / `#RRGGBB`) and are
//! compared as plain 8-bit RGB triplets. No color-space conversion happens
//! anywhere: distances are straight Euclidean distances in RGB.

pub mod codec;
pub mod distance;

use std::fmt;
use std::str::FromStr;

pub use codec::{ParseColorError, color_to_hex, parse_color};
pub use distance::distance;

/// An 8-bit RGB triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canonical `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        color_to_hex(self)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
