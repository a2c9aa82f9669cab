//! Synthetic 500 mb height fields.
//!
//! Heights fall from about 5800 m at the equator to about 5150 m at the
//! poles, with a zonal wave-3 pattern and a small seasonal swing, so every
//! value stays inside 5000..6000 m.

use std::f32::consts::PI;

use chrono::{Duration, NaiveDate};
use reanalysis_common::PreparedDataset;

/// Latitudes from 90°N to 90°S inclusive at `step` degrees.
pub fn latitudes(step: f32) -> Vec<f32> {
    let n = (180.0 / step).round() as usize + 1;
    (0..n).map(|i| 90.0 - i as f32 * step).collect()
}

/// Longitudes from 0°E at `step` degrees, not repeating 360°.
pub fn longitudes(step: f32) -> Vec<f32> {
    let n = (360.0 / step).round() as usize;
    (0..n).map(|i| i as f32 * step).collect()
}

/// Height in meters for day `t` at (`lat`, `lon`) degrees.
pub fn synthetic_height(t: usize, lat: f32, lon: f32) -> f32 {
    let phi = lat.to_radians();
    let lambda = lon.to_radians();
    let season = 40.0 * (2.0 * PI * t as f32 / 365.0).sin();
    let wave = 80.0 * (3.0 * lambda + 0.1 * t as f32).cos() * (2.0 * phi).sin().abs();
    5150.0 + 650.0 * phi.cos().powi(2) + season + wave
}

/// Row-major `[time, lat, lon]` field built from [`synthetic_height`].
pub fn height_field(time_steps: usize, lat: &[f32], lon: &[f32]) -> Vec<f32> {
    let mut data = Vec::with_capacity(time_steps * lat.len() * lon.len());
    for t in 0..time_steps {
        for &la in lat {
            for &lo in lon {
                data.push(synthetic_height(t, la, lo));
            }
        }
    }
    data
}

/// Prepared dataset on a `step`-degree global grid with daily dates from 1900-01-01.
pub fn prepared_dataset(time_steps: usize, step: f32) -> PreparedDataset {
    let lat = latitudes(step);
    let lon = longitudes(step);
    let hgt = height_field(time_steps, &lat, &lon);
    let dates = (0..time_steps).map(day_of_1900).collect();
    PreparedDataset::new(lat, lon, hgt, dates, 500.0, Some("m".to_string()))
        .expect("synthetic dataset shape is consistent")
}

/// `YYYY-MM-DD` of the day `t` days after 1900-01-01.
pub fn day_of_1900(t: usize) -> String {
    let start = NaiveDate::from_ymd_opt(1900, 1, 1).expect("1900-01-01 is a valid date");
    (start + Duration::days(t as i64)).format("%Y-%m-%d").to_string()
}
