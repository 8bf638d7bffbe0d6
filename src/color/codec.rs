//! Hex color parsing and formatting.
//!
//! Accepted input: `#RGB` or `#RRGGBB`, any case, `#` optional.
//! Canonical output: `#RRGGBB`, uppercase.

use thiserror::Error;

use super::Color;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("invalid hex color {0:?} (expected #RGB or #RRGGBB)")]
    InvalidFormat(String),
}

/// Normalize a hex color string to canonical `#RRGGBB` uppercase form.
///
/// Three-digit shorthand is expanded by doubling each digit, so `#abc`
/// becomes `#AABBCC`.
pub fn normalize_hex(input: &str) -> Result<String, ParseColorError> {
    let invalid = || ParseColorError::InvalidFormat(input.to_string());

    let digits = input.strip_prefix('#').unwrap_or(input);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };

    Ok(format!("#{}", expanded.to_ascii_uppercase()))
}

/// Parse a hex color string into an RGB triplet.
pub fn parse_color(input: &str) -> Result<Color, ParseColorError> {
    let canonical = normalize_hex(input)?;

    let mut rgb = [0u8; 3];
    hex::decode_to_slice(&canonical[1..], &mut rgb)
        .map_err(|_| ParseColorError::InvalidFormat(input.to_string()))?;

    let [r, g, b] = rgb;
    Ok(Color::new(r, g, b))
}

/// Format a color as canonical `#RRGGBB`.
pub fn color_to_hex(color: Color) -> String {
    format!("#{}", hex::encode_upper([color.r, color.g, color.b]))
}
