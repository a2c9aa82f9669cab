//! Vertical colour bar beside the map.

use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::colormap::Color;
use crate::layout::Rect;
use crate::levels::ContourLevels;

/// Most tick labels shown along the bar.
const MAX_TICKS: usize = 10;

/// A labelled tick on the colour bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Pixel row of the tick
    pub y: f32,
    pub label: String,
}

/// Draw one swatch per band, bottom to top, with an outline and tick marks.
///
/// Returns the ticks so labels can be placed once text is available.
pub fn draw_colorbar(pixmap: &mut Pixmap, rect: Rect, levels: &ContourLevels) -> Vec<Tick> {
    let bands = levels.band_count();
    if bands == 0 {
        return Vec::new();
    }

    let swatch_h = rect.height / bands as f32;
    for (i, color) in levels.band_colors().into_iter().enumerate() {
        // Band 0 sits at the bottom
        let top = rect.bottom() - (i + 1) as f32 * swatch_h;
        if let Some(r) = tiny_skia::Rect::from_xywh(rect.x, top, rect.width, swatch_h) {
            let mut paint = Paint::default();
            paint.set_color(color.to_skia());
            pixmap.fill_rect(r, &paint, Transform::identity(), None);
        }
    }

    let ticks = ticks(rect, levels);

    let mut pb = PathBuilder::new();
    if let Some(outline) = rect.to_skia() {
        pb.push_rect(outline);
    }
    let tick_len = rect.width * 0.3;
    for tick in &ticks {
        pb.move_to(rect.right() - tick_len, tick.y);
        pb.line_to(rect.right(), tick.y);
    }
    if let Some(path) = pb.finish() {
        let mut paint = Paint::default();
        paint.set_color(Color::BLACK.to_skia());
        paint.anti_alias = true;
        let stroke = Stroke {
            width: 0.8,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    ticks
}

/// Tick positions at level boundaries, thinned to at most [`MAX_TICKS`].
pub fn ticks(rect: Rect, levels: &ContourLevels) -> Vec<Tick> {
    let values = levels.levels();
    let bands = levels.band_count();
    if bands == 0 {
        return Vec::new();
    }
    let stride = values.len().div_ceil(MAX_TICKS).max(1);
    let swatch_h = rect.height / bands as f32;

    values
        .iter()
        .enumerate()
        .step_by(stride)
        .map(|(i, v)| Tick {
            y: rect.bottom() - i as f32 * swatch_h,
            label: format!("{:.0}", v),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect {
            x: 10.0,
            y: 10.0,
            width: 12.0,
            height: 200.0,
        }
    }

    #[test]
    fn test_ticks_span_bar() {
        let levels = ContourLevels::from_range(5000.0, 5500.0, 100.0).unwrap();
        let ticks = ticks(rect(), &levels);
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[0].label, "5000");
        assert_eq!(ticks[0].y, 210.0);
        assert_eq!(ticks[4].y, 10.0);
    }

    #[test]
    fn test_ticks_thinned() {
        let levels = ContourLevels::from_range(4700.0, 6000.0, 100.0).unwrap();
        assert_eq!(levels.len(), 13);
        let ticks = ticks(rect(), &levels);
        assert!(ticks.len() <= MAX_TICKS);
        assert_eq!(ticks[1].label, "4900");
    }

    #[test]
    fn test_swatches_painted_bottom_up() {
        let levels = ContourLevels::from_range(5000.0, 6000.0, 100.0).unwrap();
        let mut pixmap = Pixmap::new(40, 230).unwrap();
        draw_colorbar(&mut pixmap, rect(), &levels);

        let bottom = pixmap.pixel(16, 205).unwrap();
        let top = pixmap.pixel(16, 15).unwrap();
        assert!(bottom.blue() > bottom.red());
        assert!(top.red() > top.blue());
    }
}
