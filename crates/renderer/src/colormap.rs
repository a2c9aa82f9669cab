//! Diverging color ramp for height fields.

use serde::{Deserialize, Serialize};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// ColorBrewer RdYlBu, red end first.
const RD_YL_BU: [Color; 11] = [
    Color::rgb(165, 0, 38),
    Color::rgb(215, 48, 39),
    Color::rgb(244, 109, 67),
    Color::rgb(253, 174, 97),
    Color::rgb(254, 224, 144),
    Color::rgb(255, 255, 191),
    Color::rgb(224, 243, 248),
    Color::rgb(171, 217, 233),
    Color::rgb(116, 173, 209),
    Color::rgb(69, 117, 180),
    Color::rgb(49, 54, 149),
];

/// Reversed RdYlBu: 0.0 is deep blue, 1.0 is deep red.
///
/// Inputs outside [0, 1] are clamped; NaN maps to the low end.
pub fn rd_yl_bu_r(t: f32) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let last = RD_YL_BU.len() - 1;
    // Reversed index space: position 0 is RD_YL_BU[last]
    let pos = t * last as f32;
    let i = (pos.floor() as usize).min(last - 1);
    let frac = pos - i as f32;
    interpolate_color(RD_YL_BU[last - i], RD_YL_BU[last - i - 1], frac)
}

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

    Color::new(
        lerp(color1.r, color2.r),
        lerp(color1.g, color2.g),
        lerp(color1.b, color2.b),
        lerp(color1.a, color2.a),
    )
}
