//! Spherical orthographic projection.
//!
//! Views the globe from infinitely far away above a chosen center point. Only
//! the hemisphere facing the viewer is visible; the limb is a circle of
//! radius `R` around the projection origin.
//!
//! Reference: Snyder, "Map Projections: A Working Manual", USGS PP 1395, p. 145.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Sphere radius used for the reanalysis globe (meters).
///
/// Matches the Clarke 1866 authalic sphere used by classic basemap tooling.
pub const EARTH_RADIUS_M: f64 = 6_370_997.0;

/// Orthographic projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orthographic {
    /// Longitude of the view center (degrees, negative for west)
    pub lon0: f64,
    /// Latitude of the view center (degrees)
    pub lat0: f64,
    /// Sphere radius (meters)
    pub radius: f64,
}

impl Default for Orthographic {
    /// Centered over North America at 105°W, 60°N.
    fn default() -> Self {
        Self::new(-105.0, 60.0)
    }
}

impl Orthographic {
    pub fn new(lon0: f64, lat0: f64) -> Self {
        Self {
            lon0,
            lat0,
            radius: EARTH_RADIUS_M,
        }
    }

    /// Unit vector of a geographic point in Earth-centered coordinates.
    fn unit_vector(lon_deg: f64, lat_deg: f64) -> Vector3<f64> {
        let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
        let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
        Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Cosine of the angular distance from the view center.
    ///
    /// Non-negative on the visible hemisphere.
    pub fn cos_center_distance(&self, lon_deg: f64, lat_deg: f64) -> f64 {
        Self::unit_vector(self.lon0, self.lat0).dot(&Self::unit_vector(lon_deg, lat_deg))
    }

    /// Whether a geographic point faces the viewer.
    pub fn is_visible(&self, lon_deg: f64, lat_deg: f64) -> bool {
        self.cos_center_distance(lon_deg, lat_deg) >= 0.0
    }

    /// Convert geographic coordinates (degrees) to map coordinates (meters).
    ///
    /// Returns None for points on the far side of the globe.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        if !self.is_visible(lon_deg, lat_deg) {
            return None;
        }

        let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
        let (sin_lat0, cos_lat0) = self.lat0.to_radians().sin_cos();
        let (sin_dlon, cos_dlon) = (lon_deg - self.lon0).to_radians().sin_cos();

        let x = self.radius * cos_lat * sin_dlon;
        let y = self.radius * (cos_lat0 * sin_lat - sin_lat0 * cos_lat * cos_dlon);

        Some((x, y))
    }

    /// Convert map coordinates (meters) to geographic coordinates (degrees).
    ///
    /// Returns None outside the limb. Longitudes are normalized to [-180, 180).
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let rho = x.hypot(y);
        if rho > self.radius {
            return None;
        }
        if rho == 0.0 {
            return Some((normalize_lon(self.lon0), self.lat0));
        }

        let c = (rho / self.radius).asin();
        let (sin_c, cos_c) = c.sin_cos();
        let (sin_lat0, cos_lat0) = self.lat0.to_radians().sin_cos();

        let lat = (cos_c * sin_lat0 + y * sin_c * cos_lat0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = self.lon0.to_radians()
            + (x * sin_c).atan2(rho * cos_c * cos_lat0 - y * sin_c * sin_lat0);

        Some((normalize_lon(lon.to_degrees()), lat.to_degrees()))
    }

    /// Half-width of the projected globe (meters). The map spans
    /// `[-radius, radius]` on both axes.
    pub fn extent(&self) -> f64 {
        self.radius
    }

    /// Limb circle sampled at `segments` points, closed.
    pub fn limb(&self, segments: usize) -> Vec<(f64, f64)> {
        let n = segments.max(3);
        (0..=n)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / n as f64;
                (self.radius * a.cos(), self.radius * a.sin())
            })
            .collect()
    }

    /// Project a geographic polyline, splitting it wherever it passes behind
    /// the globe.
    ///
    /// Each returned run has at least two points.
    pub fn project_line(&self, line: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();

        for &(lon, lat) in line {
            match self.forward(lon, lat) {
                Some(p) => current.push(p),
                None => {
                    if current.len() >= 2 {
                        runs.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
            }
        }
        if current.len() >= 2 {
            runs.push(current);
        }
        runs
    }
}

/// Wrap a longitude into [-180, 180).
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_center_maps_to_origin() {
        let proj = Orthographic::default();
        let (x, y) = proj.forward(-105.0, 60.0).unwrap();
        assert_approx_eq!(x, 0.0, 1e-6);
        assert_approx_eq!(y, 0.0, 1e-6);
    }

    #[test]
    fn test_antipode_hidden() {
        let proj = Orthographic::default();
        assert!(proj.forward(75.0, -60.0).is_none());
        assert!(!proj.is_visible(75.0, -60.0));
    }

    #[test]
    fn test_north_pole_visible_above_center() {
        let proj = Orthographic::default();
        let (x, y) = proj.forward(0.0, 90.0).unwrap();
        assert_approx_eq!(x, 0.0, 1e-6);
        // cos(60°) * R
        assert_approx_eq!(y, 0.5 * EARTH_RADIUS_M, 1e-3);
    }

    #[test]
    fn test_roundtrip() {
        let proj = Orthographic::default();
        for &(lon, lat) in &[(-105.0, 60.0), (-80.0, 40.0), (-150.0, 20.0), (10.0, 75.0)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_approx_eq!(lon2, normalize_lon(lon), 1e-6);
            assert_approx_eq!(lat2, lat, 1e-6);
        }
    }

    #[test]
    fn test_inverse_outside_limb() {
        let proj = Orthographic::default();
        assert!(proj.inverse(EARTH_RADIUS_M, 1.0).is_none());
        assert!(proj.inverse(0.0, EARTH_RADIUS_M).is_some());
    }

    #[test]
    fn test_project_line_splits_at_horizon() {
        let proj = Orthographic::default();
        // Equator all the way round: visible for roughly half the circle
        let equator: Vec<(f64, f64)> = (0..=360).map(|lon| (lon as f64, 0.0)).collect();
        let runs = proj.project_line(&equator);
        assert!(!runs.is_empty() && runs.len() <= 2);
        let points: usize = runs.iter().map(Vec::len).sum();
        assert!((170..=190).contains(&points), "visible points {}", points);
    }

    #[test]
    fn test_limb_is_closed_circle() {
        let proj = Orthographic::default();
        let limb = proj.limb(90);
        assert_eq!(limb.len(), 91);
        assert_approx_eq!(limb[0].0, limb[90].0, 1e-6);
        for (x, y) in limb {
            assert_approx_eq!(x.hypot(y), EARTH_RADIUS_M, 1e-3);
        }
    }

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(0.0), 0.0);
        assert_eq!(normalize_lon(180.0), -180.0);
        assert_eq!(normalize_lon(255.0), -105.0);
        assert_eq!(normalize_lon(-190.0), 170.0);
    }
}
