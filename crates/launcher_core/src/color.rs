//! Gradient derivation for bookmark icon backgrounds.
//!
//! A bookmark's accent color is the gradient start; the end stop is derived in
//! HSL space. Warm oranges only darken, since shifting their hue turns them
//! brown or green. Every other hue rotates by `shift_degrees` with a
//! lightness nudge toward the middle of the range.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HUE_SHIFT: f64 = 35.0;

const WARM_BAND: std::ops::RangeInclusive<f64> = 15.0..=50.0;
const WARM_DARKEN: f64 = 0.65;
const LIGHT_DARKEN: f64 = 0.85;
const DARK_LIGHTEN: f64 = 1.1;
const DARK_LIGHTEN_CAP: f64 = 60.0;

/// Hue in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const NEUTRAL: Hsl = Hsl {
        h: 0.0,
        s: 50.0,
        l: 50.0,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientPair {
    pub start: String,
    pub end: String,
}

/// Parses `#rrggbb` (the `#` is optional, digits are case-insensitive).
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Malformed input maps to [`Hsl::NEUTRAL`] so presentation always has a color.
pub fn hex_to_hsl(hex: &str) -> Hsl {
    match parse_hex(hex) {
        Some(rgb) => rgb_to_hsl(rgb),
        None => Hsl::NEUTRAL,
    }
}

pub fn rgb_to_hsl([r, g, b]: [u8; 3]) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl {
            h: 0.0,
            s: 0.0,
            l: l * 100.0,
        };
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

    Hsl {
        h: h * 60.0,
        s: s * 100.0,
        l: l * 100.0,
    }
}

pub fn hsl_to_rgb(hsl: Hsl) -> [u8; 3] {
    let h = hsl.h.rem_euclid(360.0);
    let s = (hsl.s / 100.0).clamp(0.0, 1.0);
    let l = (hsl.l / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [to_channel(r + m), to_channel(g + m), to_channel(b + m)]
}

pub fn hsl_to_hex(hsl: Hsl) -> String {
    let [r, g, b] = hsl_to_rgb(hsl);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn to_channel(unit: f64) -> u8 {
    // Clamped to the channel range first, so the cast cannot truncate.
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

pub fn is_warm(hue: f64) -> bool {
    WARM_BAND.contains(&hue)
}

/// The derived end stop of the gradient that starts at `hex`.
pub fn gradient_end(hex: &str, shift_degrees: f64) -> String {
    let Hsl { h, s, l } = hex_to_hsl(hex);

    if is_warm(h) {
        return hsl_to_hex(Hsl {
            h,
            s,
            l: l * WARM_DARKEN,
        });
    }

    let l = if l > 50.0 {
        l * LIGHT_DARKEN
    } else {
        (l * DARK_LIGHTEN).min(DARK_LIGHTEN_CAP)
    };
    hsl_to_hex(Hsl {
        h: (h + shift_degrees).rem_euclid(360.0),
        s,
        l,
    })
}

/// `start` is `hex` exactly as given.
pub fn gradient(hex: &str, shift_degrees: f64) -> GradientPair {
    GradientPair {
        start: hex.to_string(),
        end: gradient_end(hex, shift_degrees),
    }
}

#[cfg(test)]
#[path = "tests/color_tests.rs"]
mod tests;
