use std::fmt;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::data::model::Difficulty;

// ---------------------------------------------------------------------------
// Rgb – a dominant color attached to a catalog record
// ---------------------------------------------------------------------------

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Fallback used whenever a source color cell cannot be parsed.
pub const DEFAULT_GRAY: Rgb = Rgb(204, 204, 204);

impl Rgb {
    /// Parse a `#rrggbb` string (longer strings are truncated to the first
    /// six hex digits, matching `#rrggbbaa` inputs).
    pub fn parse_hex(s: &str) -> Option<Rgb> {
        let hex = s.strip_prefix('#')?;
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Rgb(r, g, b))
    }

    /// Parse an `rgb(r, g, b)`-style string by pulling out the first three
    /// decimal integer substrings. Components above 255 fail the parse.
    pub fn parse_rgb_func(s: &str) -> Option<Rgb> {
        let mut channels = [0u8; 3];
        let mut found = 0;
        let mut chars = s.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            if !c.is_ascii_digit() {
                continue;
            }
            let mut end = start + 1;
            while let Some(&(i, c2)) = chars.peek() {
                if c2.is_ascii_digit() {
                    end = i + 1;
                    chars.next();
                } else {
                    break;
                }
            }
            channels[found] = s[start..end].parse::<u8>().ok()?;
            found += 1;
            if found == 3 {
                return Some(Rgb(channels[0], channels[1], channels[2]));
            }
        }
        None
    }

    /// Parse a free-form color cell, trying `#rrggbb` then `rgb(...)`.
    /// Anything unrecognisable becomes [`DEFAULT_GRAY`] so one malformed
    /// cell never fails a whole load.
    pub fn parse_str(s: &str) -> Rgb {
        let s = s.trim();
        if s.starts_with('#') && s.len() >= 7 {
            if let Some(rgb) = Rgb::parse_hex(s) {
                return rgb;
            }
        } else if s.starts_with("rgb") {
            if let Some(rgb) = Rgb::parse_rgb_func(s) {
                return rgb;
            }
        }
        DEFAULT_GRAY
    }

    /// Format as `#rrggbb` for the presentation layer.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Euclidean distance between two colors in RGB space.
///
/// Deliberately not a perceptual metric (no CIE delta-E); tolerance values
/// in the rest of the crate are calibrated against this plain distance,
/// where black-to-white is `sqrt(3 * 255^2) ≈ 441.67`.
pub fn distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a.0 as f64 - b.0 as f64;
    let dg = a.1 as f64 - b.1 as f64;
    let db = a.2 as f64 - b.2 as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

// ---------------------------------------------------------------------------
// Presentation colors: difficulty badges and category chips
// ---------------------------------------------------------------------------

/// Badge color for a difficulty label.
pub fn badge_color(difficulty: Difficulty) -> Rgb {
    match difficulty {
        Difficulty::Easy => Rgb(0x4c, 0xaf, 0x50),
        Difficulty::Medium => Rgb(0xff, 0x98, 0x00),
        Difficulty::Hard => Rgb(0xf4, 0x43, 0x36),
        Difficulty::Unspecified => Rgb(0x9e, 0x9e, 0x9e),
    }
}

/// Generates `n` visually distinct chip colors using evenly spaced hues,
/// one per category in the sidebar legend.
pub fn category_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}
