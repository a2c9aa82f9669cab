//! Filled contour bands rasterized through the inverse projection.
//!
//! Each pixel inside the globe is mapped back to lat/lon, the height is
//! sampled from the grid, and the pixel takes the color of the band the
//! height falls in. Pixels outside every band keep the background.

use rayon::prelude::*;
use tiny_skia::Pixmap;
use tracing::debug;

use projection::Orthographic;

use crate::layout::Layout;
use crate::levels::ContourLevels;
use crate::sampler::GridSampler;

/// Paint contour bands into `pixmap`. Returns the number of filled pixels.
pub fn fill_bands(
    pixmap: &mut Pixmap,
    layout: &Layout,
    proj: &Orthographic,
    sampler: &GridSampler<'_>,
    levels: &ContourLevels,
) -> usize {
    let width = pixmap.width() as usize;
    let colors = levels.band_colors();
    if width == 0 || colors.is_empty() {
        return 0;
    }

    let x0 = layout.map.x.floor().max(0.0) as usize;
    let x1 = (layout.map.right().ceil() as usize).min(width);
    let y0 = layout.map.y.floor().max(0.0) as usize;
    let y1 = layout.map.bottom().ceil() as usize;
    let radius = proj.extent();

    let filled: usize = pixmap
        .data_mut()
        .par_chunks_mut(width * 4)
        .enumerate()
        .filter(|(py, _)| (y0..y1).contains(py))
        .map(|(py, row)| {
            let mut count = 0;
            for px in x0..x1 {
                let (x, y) = layout.to_map(proj, px as u32, py as u32);
                if x.hypot(y) > radius {
                    continue;
                }
                let Some((lon, lat)) = proj.inverse(x, y) else {
                    continue;
                };
                let Some(band) = levels.band_of(sampler.sample(lon, lat)) else {
                    continue;
                };
                let c = colors[band];
                // Opaque colors are identical premultiplied and straight
                row[px * 4..px * 4 + 4].copy_from_slice(&[c.r, c.g, c.b, 255]);
                count += 1;
            }
            count
        })
        .sum();

    debug!(
        filled_pixels = filled,
        bands = colors.len(),
        "Filled contour bands"
    );

    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::Color;

    fn white_pixmap(layout: &Layout) -> Pixmap {
        let mut pixmap = Pixmap::new(layout.width, layout.height).unwrap();
        pixmap.fill(Color::WHITE.to_skia());
        pixmap
    }

    #[test]
    fn test_uniform_field_fills_whole_disc() {
        let layout = Layout::new(48);
        let proj = Orthographic::default();
        let lat = [90.0f32, 0.0, -90.0];
        let lon = [0.0f32, 120.0, 240.0];
        let data = [5550.0f32; 9];
        let sampler = GridSampler::new(&data, &lat, &lon).unwrap();
        let levels = ContourLevels::from_range(5000.0, 6000.0, 100.0).unwrap();

        let mut pixmap = white_pixmap(&layout);
        let filled = fill_bands(&mut pixmap, &layout, &proj, &sampler, &levels);

        // Roughly pi/4 of the map box
        let box_pixels = (layout.map.width * layout.map.height) as f32;
        let ratio = filled as f32 / box_pixels;
        assert!((0.75..0.82).contains(&ratio), "ratio {}", ratio);

        // Center pixel has the band color, corner stays white
        let cx = layout.map.center_x() as u32;
        let cy = (layout.map.y + layout.map.height / 2.0) as u32;
        let expected = levels.band_color(5);
        let center = pixmap.pixel(cx, cy).unwrap();
        assert_eq!((center.red(), center.green(), center.blue()), (expected.r, expected.g, expected.b));
        let corner = pixmap.pixel(layout.map.x as u32 + 1, layout.map.y as u32 + 1).unwrap();
        assert_eq!((corner.red(), corner.green(), corner.blue()), (255, 255, 255));
    }

    #[test]
    fn test_values_above_top_level_stay_unfilled() {
        let layout = Layout::new(48);
        let proj = Orthographic::default();
        let lat = [90.0f32, -90.0];
        let lon = [0.0f32, 180.0];
        let data = [5950.0f32; 4];
        let sampler = GridSampler::new(&data, &lat, &lon).unwrap();
        // Levels end at 5900, so 5950 is outside every band
        let levels = ContourLevels::from_range(5000.0, 5950.0, 100.0).unwrap();

        let mut pixmap = white_pixmap(&layout);
        assert_eq!(fill_bands(&mut pixmap, &layout, &proj, &sampler, &levels), 0);
    }
}
