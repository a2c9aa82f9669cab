//! Line work drawn over the filled globe: graticule, coastlines and limb.

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use projection::{Graticule, Orthographic};

use crate::colormap::Color;
use crate::layout::Layout;

/// Stroke style for one class of lines.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub color: Color,
    /// Width in points
    pub width: f32,
    /// On/off dash lengths in points
    pub dash: Option<[f32; 2]>,
}

impl LineStyle {
    pub const LIMB: LineStyle = LineStyle {
        color: Color::BLACK,
        width: 1.0,
        dash: None,
    };

    pub const COASTLINE: LineStyle = LineStyle {
        color: Color::BLACK,
        width: 1.0,
        dash: None,
    };

    pub const GRATICULE: LineStyle = LineStyle {
        color: Color::BLACK,
        width: 0.5,
        dash: Some([1.0, 1.0]),
    };
}

/// Draws projected geographic lines onto a pixmap.
pub struct Overlay<'a> {
    layout: &'a Layout,
    proj: &'a Orthographic,
}

impl<'a> Overlay<'a> {
    pub fn new(layout: &'a Layout, proj: &'a Orthographic) -> Self {
        Self { layout, proj }
    }

    /// Parallels and meridians, hidden where they pass behind the globe.
    pub fn draw_graticule(&self, pixmap: &mut Pixmap, graticule: &Graticule) -> usize {
        self.draw_geographic(pixmap, &graticule.lines(), LineStyle::GRATICULE)
    }

    /// Coastlines, hidden where they pass behind the globe.
    pub fn draw_coastlines(&self, pixmap: &mut Pixmap, lines: &[Vec<(f64, f64)>]) -> usize {
        self.draw_geographic(pixmap, lines, LineStyle::COASTLINE)
    }

    /// Outline of the visible hemisphere.
    pub fn draw_limb(&self, pixmap: &mut Pixmap) {
        let limb = self.proj.limb(360);
        self.stroke_runs(pixmap, std::slice::from_ref(&limb), LineStyle::LIMB);
    }

    /// Returns the number of visible runs drawn.
    fn draw_geographic(
        &self,
        pixmap: &mut Pixmap,
        lines: &[Vec<(f64, f64)>],
        style: LineStyle,
    ) -> usize {
        let runs: Vec<Vec<(f64, f64)>> = lines
            .iter()
            .flat_map(|line| self.proj.project_line(line))
            .collect();
        self.stroke_runs(pixmap, &runs, style);
        runs.len()
    }

    /// Stroke polylines given in projected meters.
    fn stroke_runs(&self, pixmap: &mut Pixmap, runs: &[Vec<(f64, f64)>], style: LineStyle) {
        let mut pb = PathBuilder::new();
        for run in runs {
            let mut points = run
                .iter()
                .map(|&(x, y)| self.layout.to_pixel(self.proj, x, y));
            let Some((x, y)) = points.next() else {
                continue;
            };
            pb.move_to(x, y);
            for (x, y) in points {
                pb.line_to(x, y);
            }
        }
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(style.color.to_skia());
        paint.anti_alias = true;

        let mut stroke = Stroke {
            width: self.layout.points(style.width),
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        if let Some([on, off]) = style.dash {
            stroke.dash = StrokeDash::new(
                vec![self.layout.points(on), self.layout.points(off)],
                0.0,
            );
        }

        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_pixels(pixmap: &Pixmap) -> usize {
        pixmap
            .pixels()
            .iter()
            .filter(|p| p.alpha() > 0 && p.red() < 128)
            .count()
    }

    #[test]
    fn test_limb_draws_a_ring() {
        let layout = Layout::new(48);
        let proj = Orthographic::default();
        let mut pixmap = Pixmap::new(layout.width, layout.height).unwrap();
        Overlay::new(&layout, &proj).draw_limb(&mut pixmap);

        assert!(dark_pixels(&pixmap) > 100);
        // Center of the globe is untouched
        let cx = layout.map.center_x() as u32;
        let cy = (layout.map.y + layout.map.height / 2.0) as u32;
        assert_eq!(pixmap.pixel(cx, cy).unwrap().alpha(), 0);
    }

    #[test]
    fn test_graticule_clipped_to_visible_side() {
        let layout = Layout::new(48);
        let proj = Orthographic::default();
        let mut pixmap = Pixmap::new(layout.width, layout.height).unwrap();
        let runs = Overlay::new(&layout, &proj).draw_graticule(&mut pixmap, &Graticule::default());

        // Seven meridians and five parallels, some split or hidden
        assert!(runs >= 8, "runs {}", runs);
        assert!(dark_pixels(&pixmap) > 0);
    }

    #[test]
    fn test_hidden_coastline_draws_nothing() {
        let layout = Layout::new(48);
        let proj = Orthographic::default();
        let mut pixmap = Pixmap::new(layout.width, layout.height).unwrap();
        // Antipode of the view center
        let line = vec![vec![(70.0, -60.0), (80.0, -60.0)]];
        let runs = Overlay::new(&layout, &proj).draw_coastlines(&mut pixmap, &line);
        assert_eq!(runs, 0);
        assert_eq!(dark_pixels(&pixmap), 0);
    }
}
