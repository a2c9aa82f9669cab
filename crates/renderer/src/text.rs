//! Text drawing with the embedded DejaVu Sans font or a TrueType override.

use std::path::Path;

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use tracing::warn;

use reanalysis_common::{ReanalysisError, ReanalysisResult};

use crate::colormap::Color;

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Horizontal anchor of a text string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Loaded font plus drawing helpers.
pub struct TextPainter {
    font: Font<'static>,
}

impl TextPainter {
    /// Painter using the embedded DejaVu Sans.
    pub fn embedded() -> ReanalysisResult<Self> {
        Font::try_from_bytes(FONT_DATA)
            .map(|font| Self { font })
            .ok_or_else(|| ReanalysisError::RenderFailed("embedded font is invalid".to_string()))
    }

    /// Load a TrueType font file.
    pub fn load(path: &Path) -> ReanalysisResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| ReanalysisError::unreadable(path, e.to_string()))?;
        Font::try_from_vec(bytes)
            .map(|font| Self { font })
            .ok_or_else(|| ReanalysisError::unreadable(path, "not a TrueType font"))
    }

    /// The font at `path` if given and usable, else the embedded one.
    pub fn with_override(path: Option<&Path>) -> ReanalysisResult<Self> {
        if let Some(path) = path {
            match Self::load(path) {
                Ok(painter) => return Ok(painter),
                Err(e) => warn!(error = %e, "Font override unusable, using embedded font"),
            }
        }
        Self::embedded()
    }

    /// Rendered width and height of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        let scale = Scale::uniform(size);
        let metrics = self.font.v_metrics(scale);
        let width = self
            .font
            .layout(text, scale, point(0.0, 0.0))
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .fold(0.0f32, f32::max);
        (width, metrics.ascent - metrics.descent)
    }

    /// Draw `text` with its top edge at `y`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        img: &mut RgbaImage,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        align: Align,
        color: Color,
    ) {
        let (width, _) = self.measure(text, size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        draw_text_mut(
            img,
            color.to_rgba(),
            left.round() as i32,
            y.round() as i32,
            Scale::uniform(size),
            &self.font,
            text,
        );
    }

    /// Draw `text` rotated a quarter turn counter-clockwise, reading bottom
    /// to top, centered vertically on `center_y` with its left edge at `x`.
    pub fn draw_vertical(
        &self,
        img: &mut RgbaImage,
        text: &str,
        x: f32,
        center_y: f32,
        size: f32,
        color: Color,
    ) {
        let (width, height) = self.measure(text, size);
        let (w, h) = (width.ceil() as u32 + 2, height.ceil() as u32 + 2);
        if w == 0 || h == 0 {
            return;
        }

        let mut strip = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0]));
        draw_text_mut(&mut strip, color.to_rgba(), 1, 1, Scale::uniform(size), &self.font, text);
        let rotated = imageops::rotate270(&strip);

        let top = (center_y - w as f32 / 2.0).round() as i64;
        imageops::overlay(img, &rotated, x.round() as i64, top);
    }
}
