//! Drawing surface for one figure.

use image::RgbaImage;
use tiny_skia::Pixmap;

use reanalysis_common::{ReanalysisError, ReanalysisResult};

use crate::colormap::Color;
use crate::layout::Layout;
use crate::png::create_png;
use crate::text::{Align, TextPainter};

#[derive(Debug, Clone)]
enum TextItem {
    Horizontal {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        align: Align,
    },
    Vertical {
        text: String,
        x: f32,
        center_y: f32,
        size: f32,
    },
}

/// Raster surface plus queued text.
///
/// Shapes are drawn immediately with tiny-skia; text is queued and drawn
/// over them with rusttype when the canvas is finished.
pub struct Canvas {
    layout: Layout,
    pixmap: Pixmap,
    text: Vec<TextItem>,
}

impl Canvas {
    /// White canvas sized by `layout`.
    pub fn new(layout: Layout) -> ReanalysisResult<Self> {
        let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or_else(|| {
            ReanalysisError::RenderFailed(format!(
                "cannot allocate {}x{} canvas",
                layout.width, layout.height
            ))
        })?;
        pixmap.fill(Color::WHITE.to_skia());
        Ok(Self {
            layout,
            pixmap,
            text: Vec::new(),
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Queue a line of text with its top edge at `y`.
    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, align: Align) {
        self.text.push(TextItem::Horizontal {
            text: text.into(),
            x,
            y,
            size,
            align,
        });
    }

    /// Queue text reading bottom to top.
    pub fn vertical_text(&mut self, text: impl Into<String>, x: f32, center_y: f32, size: f32) {
        self.text.push(TextItem::Vertical {
            text: text.into(),
            x,
            center_y,
            size,
        });
    }

    /// Straight-alpha copy of the current raster.
    fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        img
    }

    /// Draw queued text and encode the figure as PNG, releasing the canvas.
    pub fn finish(self, painter: &TextPainter) -> ReanalysisResult<Vec<u8>> {
        let mut img = self.to_image();

        for item in &self.text {
            match item {
                TextItem::Horizontal {
                    text,
                    x,
                    y,
                    size,
                    align,
                } => painter.draw(&mut img, text, *x, *y, *size, *align, Color::BLACK),
                TextItem::Vertical {
                    text,
                    x,
                    center_y,
                    size,
                } => painter.draw_vertical(&mut img, text, *x, *center_y, *size, Color::BLACK),
            }
        }

        create_png(
            img.as_raw(),
            img.width() as usize,
            img.height() as usize,
            Some(self.layout.dpi),
        )
        .map_err(ReanalysisError::RenderFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::{find_chunk, PNG_SIGNATURE};

    fn painter() -> TextPainter {
        TextPainter::embedded().unwrap()
    }

    #[test]
    fn test_blank_canvas_encodes_white() {
        let canvas = Canvas::new(Layout::new(24)).unwrap();
        let png = canvas.finish(&painter()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        assert!(find_chunk(&png, b"pHYs").is_some());

        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (192, 144));
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_queued_text_is_drawn() {
        let mut canvas = Canvas::new(Layout::new(96)).unwrap();
        canvas.text("hello", 10.0, 10.0, 16.0, Align::Left);
        canvas.vertical_text("world", 300.0, 200.0, 16.0);
        let png = canvas.finish(&painter()).unwrap();

        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        let dark = |x0: u32, y0: u32, x1: u32, y1: u32| {
            (y0..y1)
                .flat_map(|y| (x0..x1).map(move |x| (x, y)))
                .filter(|&(x, y)| img.get_pixel(x, y).0[0] < 128)
                .count()
        };
        assert!(dark(0, 0, 120, 40) > 0);
        assert!(dark(290, 150, 330, 250) > 0);
    }
}
