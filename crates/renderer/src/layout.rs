//! Figure geometry: where the globe, colour bar and text sit on the canvas.

use projection::Orthographic;

/// Figure size in inches (width, height).
pub const FIGURE_INCHES: (f32, f32) = (8.0, 6.0);

/// Plot region as fractions of the figure, measured from the top-left.
const PLOT_LEFT: f32 = 0.125;
const PLOT_RIGHT: f32 = 0.9;
const PLOT_TOP: f32 = 0.12;
const PLOT_BOTTOM: f32 = 0.89;

/// Colour bar width and gap, as fractions of the map width.
const COLORBAR_SIZE: f32 = 0.03;
const COLORBAR_PAD: f32 = 0.05;

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn to_skia(&self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Pixel layout of one figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
    /// Square box holding the globe
    pub map: Rect,
    pub colorbar: Rect,
}

impl Layout {
    pub fn new(dpi: u32) -> Self {
        let dpi = dpi.max(1);
        let width = (FIGURE_INCHES.0 * dpi as f32).round() as u32;
        let height = (FIGURE_INCHES.1 * dpi as f32).round() as u32;
        let (w, h) = (width as f32, height as f32);

        let region_w = (PLOT_RIGHT - PLOT_LEFT) * w;
        let region_h = (PLOT_BOTTOM - PLOT_TOP) * h;
        let group = 1.0 + COLORBAR_PAD + COLORBAR_SIZE;
        let side = region_h.min(region_w / group);

        let left = PLOT_LEFT * w + (region_w - side * group) / 2.0;
        let top = PLOT_TOP * h + (region_h - side) / 2.0;

        let map = Rect {
            x: left,
            y: top,
            width: side,
            height: side,
        };
        let colorbar = Rect {
            x: map.right() + side * COLORBAR_PAD,
            y: top,
            width: side * COLORBAR_SIZE,
            height: side,
        };

        Self {
            width,
            height,
            dpi,
            map,
            colorbar,
        }
    }

    /// Pixel size of a font given in points.
    pub fn points(&self, pt: f32) -> f32 {
        pt * self.dpi as f32 / 72.0
    }

    /// Meters per pixel inside the map box.
    pub fn meters_per_pixel(&self, proj: &Orthographic) -> f64 {
        2.0 * proj.extent() / self.map.width as f64
    }

    /// Pixel position of a projected point.
    pub fn to_pixel(&self, proj: &Orthographic, x: f64, y: f64) -> (f32, f32) {
        let scale = self.meters_per_pixel(proj);
        let cx = self.map.x as f64 + self.map.width as f64 / 2.0;
        let cy = self.map.y as f64 + self.map.height as f64 / 2.0;
        ((cx + x / scale) as f32, (cy - y / scale) as f32)
    }

    /// Projected coordinates at the center of pixel `(px, py)`.
    pub fn to_map(&self, proj: &Orthographic, px: u32, py: u32) -> (f64, f64) {
        let scale = self.meters_per_pixel(proj);
        let cx = self.map.x as f64 + self.map.width as f64 / 2.0;
        let cy = self.map.y as f64 + self.map.height as f64 / 2.0;
        (
            (px as f64 + 0.5 - cx) * scale,
            (cy - (py as f64 + 0.5)) * scale,
        )
    }
}
