//! Bilinear sampling of a global lat/lon grid.

/// Read-only view of one `[lat, lon]` slice with its axes.
///
/// Longitudes must be evenly spaced and increasing; they wrap around the
/// globe. Latitudes may run in either direction.
#[derive(Debug, Clone, Copy)]
pub struct GridSampler<'a> {
    data: &'a [f32],
    lat: &'a [f32],
    lon: &'a [f32],
}

impl<'a> GridSampler<'a> {
    /// None when the slice size does not match the axes or an axis is empty.
    pub fn new(data: &'a [f32], lat: &'a [f32], lon: &'a [f32]) -> Option<Self> {
        if lat.is_empty() || lon.is_empty() || data.len() != lat.len() * lon.len() {
            return None;
        }
        Some(Self { data, lat, lon })
    }

    fn at(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.lon.len() + j]
    }

    /// Fractional row for a latitude, clamped to the grid edges.
    fn lat_position(&self, lat: f64) -> f64 {
        let n = self.lat.len();
        if n == 1 {
            return 0.0;
        }
        let first = self.lat[0] as f64;
        let last = self.lat[n - 1] as f64;
        let descending = first > last;

        // Index of the first axis value past `lat` in axis order
        let upper = self.lat.partition_point(|&v| {
            if descending {
                v as f64 > lat
            } else {
                (v as f64) < lat
            }
        });
        if upper == 0 {
            return 0.0;
        }
        if upper >= n {
            return (n - 1) as f64;
        }
        let a = self.lat[upper - 1] as f64;
        let b = self.lat[upper] as f64;
        let frac = if b == a { 0.0 } else { (lat - a) / (b - a) };
        (upper - 1) as f64 + frac
    }

    /// Fractional column for a longitude, in `[0, lon.len()]`.
    fn lon_position(&self, lon: f64) -> f64 {
        let n = self.lon.len();
        if n == 1 {
            return 0.0;
        }
        let step = (self.lon[1] - self.lon[0]) as f64;
        if step <= 0.0 {
            return 0.0;
        }
        let offset = (lon - self.lon[0] as f64).rem_euclid(360.0);
        offset / step
    }

    /// Height at a geographic point. NaN if any surrounding node is NaN.
    pub fn sample(&self, lon: f64, lat: f64) -> f32 {
        let y = self.lat_position(lat);
        let x = self.lon_position(lon);

        let i0 = y.floor() as usize;
        let i1 = (i0 + 1).min(self.lat.len() - 1);
        let j0 = (x.floor() as usize).min(self.lon.len() - 1);
        let j1 = (j0 + 1) % self.lon.len();

        let dy = (y - i0 as f64) as f32;
        let dx = (x - j0 as f64) as f32;

        let v00 = self.at(i0, j0);
        let v01 = self.at(i0, j1);
        let v10 = self.at(i1, j0);
        let v11 = self.at(i1, j1);

        let top = v00 * (1.0 - dx) + v01 * dx;
        let bottom = v10 * (1.0 - dx) + v11 * dx;
        top * (1.0 - dy) + bottom * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    // 3 latitudes (north to south) x 4 longitudes
    const LAT: [f32; 3] = [90.0, 0.0, -90.0];
    const LON: [f32; 4] = [0.0, 90.0, 180.0, 270.0];
    #[rustfmt::skip]
    const DATA: [f32; 12] = [
        10.0, 10.0, 10.0, 10.0,
        0.0, 1.0, 2.0, 3.0,
        -10.0, -10.0, -10.0, -10.0,
    ];

    fn sampler() -> GridSampler<'static> {
        GridSampler::new(&DATA, &LAT, &LON).unwrap()
    }

    #[test]
    fn test_nodes_exact() {
        let s = sampler();
        assert_eq!(s.sample(0.0, 0.0), 0.0);
        assert_eq!(s.sample(180.0, 0.0), 2.0);
        assert_eq!(s.sample(90.0, 90.0), 10.0);
    }

    #[test]
    fn test_interpolates_between_columns() {
        let s = sampler();
        assert_approx_eq!(s.sample(45.0, 0.0), 0.5, 1e-6);
    }

    #[test]
    fn test_longitude_wraps() {
        let s = sampler();
        // Halfway from 270 (3.0) back round to 360/0 (0.0)
        assert_approx_eq!(s.sample(315.0, 0.0), 1.5, 1e-6);
        assert_approx_eq!(s.sample(-45.0, 0.0), 1.5, 1e-6);
        assert_approx_eq!(s.sample(-270.0, 0.0), 1.0, 1e-6);
    }

    #[test]
    fn test_descending_latitudes() {
        let s = sampler();
        assert_approx_eq!(s.sample(0.0, 45.0), 5.0, 1e-6);
        assert_approx_eq!(s.sample(0.0, -45.0), -5.0, 1e-6);
    }

    #[test]
    fn test_ascending_latitudes() {
        let lat = [-90.0f32, 0.0, 90.0];
        let data = [-10.0f32, -10.0, 0.0, 0.0, 10.0, 10.0];
        let lon = [0.0f32, 180.0];
        let s = GridSampler::new(&data, &lat, &lon).unwrap();
        assert_approx_eq!(s.sample(0.0, 45.0), 5.0, 1e-6);
    }

    #[test]
    fn test_nan_propagates() {
        let mut data = DATA;
        data[5] = f32::NAN;
        let s = GridSampler::new(&data, &LAT, &LON).unwrap();
        assert!(s.sample(60.0, 10.0).is_nan());
        assert!(!s.sample(200.0, -10.0).is_nan());
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(GridSampler::new(&DATA[..11], &LAT, &LON).is_none());
    }
}
