use std::fmt;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue, saturation and value, each in `[0, 1]`.
///
/// Hue is a fraction of a full turn, so `0.5` is the complement of `0.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HsvColor {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hexcone HSV. Grays have hue and saturation `0`.
    pub fn to_hsv(self) -> HsvColor {
        let [r, g, b] = [self.r, self.g, self.b].map(|c| c as f64 / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max == min {
            return HsvColor::new(0.0, 0.0, max);
        }

        let range = max - min;
        let rc = (max - r) / range;
        let gc = (max - g) / range;
        let bc = (max - b) / range;
        let sextant = if r == max {
            bc - gc
        } else if g == max {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };
        HsvColor::new((sextant / 6.0).rem_euclid(1.0), range / max, max)
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `rrggbb` with an optional leading `#`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(Error::InvalidHex(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| Error::InvalidHex(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(px: image::Rgb<u8>) -> Self {
        Self::from(px.0)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(c: Color) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl HsvColor {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Convert back to 8-bit RGB. Channels are truncated, not rounded.
    ///
    /// The largest channel is `v` itself, so a hue shift never moves it.
    pub fn to_rgb(self) -> Color {
        let h = self.h.rem_euclid(1.0);
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);

        let (r, g, b) = if s == 0.0 {
            (v, v, v)
        } else {
            let i = (h * 6.0) as u32;
            let f = h * 6.0 - i as f64;
            let p = v * (1.0 - s);
            let q = v * (1.0 - s * f);
            let t = v * (1.0 - s * (1.0 - f));
            match i % 6 {
                0 => (v, t, p),
                1 => (q, v, p),
                2 => (p, v, t),
                3 => (p, q, v),
                4 => (t, p, v),
                _ => (v, p, q),
            }
        };
        let truncate = |c: f64| (c * 255.0) as u8;
        Color::new(truncate(r), truncate(g), truncate(b))
    }
}

impl From<Color> for HsvColor {
    fn from(c: Color) -> Self {
        c.to_hsv()
    }
}
