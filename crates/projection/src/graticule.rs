//! Parallels and meridians as geographic polylines.

use serde::{Deserialize, Serialize};

/// Graticule layout in degrees.
///
/// Lines are generated for `start, start + step, ...` up to but excluding
/// `stop`, the same convention as a half-open range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graticule {
    /// Latitude of the first parallel
    pub parallel_start: f64,
    /// Exclusive upper bound for parallels
    pub parallel_stop: f64,
    pub parallel_step: f64,
    /// Longitude of the first meridian
    pub meridian_start: f64,
    /// Exclusive upper bound for meridians
    pub meridian_stop: f64,
    pub meridian_step: f64,
    /// Sample spacing along each line (degrees)
    pub resolution: f64,
}

impl Default for Graticule {
    /// Parallels every 30° from -90 to 90, meridians every 60° from 0 to 360.
    fn default() -> Self {
        Self {
            parallel_start: -90.0,
            parallel_stop: 120.0,
            parallel_step: 30.0,
            meridian_start: 0.0,
            meridian_stop: 420.0,
            meridian_step: 60.0,
            resolution: 1.0,
        }
    }
}

impl Graticule {
    /// Latitudes of all parallels.
    pub fn parallels(&self) -> Vec<f64> {
        half_open(self.parallel_start, self.parallel_stop, self.parallel_step)
    }

    /// Longitudes of all meridians.
    pub fn meridians(&self) -> Vec<f64> {
        half_open(self.meridian_start, self.meridian_stop, self.meridian_step)
    }

    /// Every graticule line as `(lon, lat)` points.
    ///
    /// Pole parallels collapse to a single point and are skipped.
    pub fn lines(&self) -> Vec<Vec<(f64, f64)>> {
        let res = if self.resolution > 0.0 { self.resolution } else { 1.0 };
        let mut lines = Vec::new();

        for lat in self.parallels() {
            if lat.abs() >= 90.0 {
                continue;
            }
            lines.push(
                sample(-180.0, 180.0, res)
                    .into_iter()
                    .map(|lon| (lon, lat))
                    .collect(),
            );
        }

        for lon in self.meridians() {
            lines.push(
                sample(-90.0, 90.0, res)
                    .into_iter()
                    .map(|lat| (lon, lat))
                    .collect(),
            );
        }

        lines
    }
}

fn half_open(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Inclusive samples from `a` to `b`.
fn sample(a: f64, b: f64, res: f64) -> Vec<f64> {
    let n = ((b - a) / res).ceil().max(1.0) as usize;
    (0..=n).map(|i| a + (b - a) * i as f64 / n as f64).collect()
}
