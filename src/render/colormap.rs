//! Colormaps and palettes
//!
//! Colormaps are piecewise-linear over a handful of control points sampled
//! from the matplotlib definitions.

use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

impl From<Rgb> for plotters::style::RGBColor {
    fn from(c: Rgb) -> Self {
        plotters::style::RGBColor(c.0, c.1, c.2)
    }
}

const VIRIDIS: [Rgb; 9] = [
    Rgb::hex(0x440154),
    Rgb::hex(0x472d7b),
    Rgb::hex(0x3b528b),
    Rgb::hex(0x2c728e),
    Rgb::hex(0x21918c),
    Rgb::hex(0x28ae80),
    Rgb::hex(0x5ec962),
    Rgb::hex(0xaddc30),
    Rgb::hex(0xfde725),
];

const COOLWARM: [Rgb; 9] = [
    Rgb::hex(0x3b4cc0),
    Rgb::hex(0x5977e3),
    Rgb::hex(0x7b9ff9),
    Rgb::hex(0x9ebeff),
    Rgb::hex(0xc0d4f5),
    Rgb::hex(0xf2cbb7),
    Rgb::hex(0xf7a889),
    Rgb::hex(0xe26952),
    Rgb::hex(0xb40426),
];

/// Continuous colormaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    Viridis,
    Coolwarm,
}

impl Colormap {
    fn stops(&self) -> &'static [Rgb] {
        match self {
            Colormap::Viridis => &VIRIDIS,
            Colormap::Coolwarm => &COOLWARM,
        }
    }

    /// Color at `t` in `[0, 1]`; out-of-range values are clamped
    pub fn at(&self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (stops.len() - 1) as f64;
        let idx = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - idx as f64;
        let (a, b) = (stops[idx], stops[idx + 1]);
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        Rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// Color for `value` scaled into `[min, max]`
    pub fn scaled(&self, value: f64, min: f64, max: f64) -> Rgb {
        if max > min {
            self.at((value - min) / (max - min))
        } else {
            self.at(0.5)
        }
    }

    /// `count` evenly spaced colors, as used for label groups
    pub fn discrete(&self, index: usize, count: usize) -> Rgb {
        if count <= 1 {
            return self.at(0.0);
        }
        self.at(index as f64 / (count - 1) as f64)
    }
}
