//! Dataset types passed between pipeline stages.
//!
//! `RawDataset` is what the loader extracts from a file: stored values plus
//! the attributes needed to interpret them. `PreparedDataset` holds physical
//! heights on a `[time, lat, lon]` grid and one date string per time step.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ReanalysisError, ReanalysisResult};

/// Time coordinate as stored in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    /// Stored offsets from the epoch named in `units`
    pub values: Vec<f64>,
    /// CF units string, e.g. "hours since 1-1-1 00:00:0.0"
    pub units: Option<String>,
    /// CF calendar attribute
    pub calendar: Option<String>,
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
}

impl TimeAxis {
    /// Time axis with only values and units, no packing attributes.
    pub fn new(values: Vec<f64>, units: impl Into<String>) -> Self {
        Self {
            values,
            units: Some(units.into()),
            calendar: None,
            scale_factor: None,
            add_offset: None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A packed 4-D variable indexed `[time, level, lat, lon]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledVariable {
    /// Stored (packed) values in row-major order
    pub values: Vec<f64>,
    /// Dimension lengths: time, level, lat, lon
    pub shape: [usize; 4],
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
    /// Units of the unpacked quantity
    pub units: Option<String>,
    /// Stored value marking missing data
    pub fill_value: Option<f64>,
}

impl ScaledVariable {
    /// Flat index of `[t, level, lat, lon]`.
    pub fn index(&self, t: usize, level: usize, lat: usize, lon: usize) -> usize {
        let [_, nlev, nlat, nlon] = self.shape;
        ((t * nlev + level) * nlat + lat) * nlon + lon
    }

    /// Stored value at `[t, level, lat, lon]`, if in bounds.
    pub fn get(&self, t: usize, level: usize, lat: usize, lon: usize) -> Option<f64> {
        let [nt, nlev, nlat, nlon] = self.shape;
        if t >= nt || level >= nlev || lat >= nlat || lon >= nlon {
            return None;
        }
        self.values.get(self.index(t, level, lat, lon)).copied()
    }
}

/// Everything the loader extracts from a reanalysis file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    /// Path the dataset was read from
    pub source: PathBuf,
    /// Pressure level (hPa) of the first level in the file
    pub level: f32,
    pub time: TimeAxis,
    /// Geopotential height, packed
    pub hgt: ScaledVariable,
    /// Latitudes (degrees north)
    pub lat: Vec<f32>,
    /// Longitudes (degrees east)
    pub lon: Vec<f32>,
}

impl RawDataset {
    /// Check that the height field agrees with the coordinate axes.
    pub fn check_shape(&self) -> Result<(), String> {
        let [nt, nlev, nlat, nlon] = self.hgt.shape;
        if nt != self.time.len() {
            return Err(format!(
                "hgt has {} time steps but time axis has {}",
                nt,
                self.time.len()
            ));
        }
        if nlev == 0 {
            return Err("hgt has an empty level dimension".to_string());
        }
        if nlat != self.lat.len() || nlon != self.lon.len() {
            return Err(format!(
                "hgt grid is {}x{} but lat/lon axes are {}x{}",
                nlat,
                nlon,
                self.lat.len(),
                self.lon.len()
            ));
        }
        let expected = nt * nlev * nlat * nlon;
        if self.hgt.values.len() != expected {
            return Err(format!(
                "hgt holds {} values, shape {:?} needs {}",
                self.hgt.values.len(),
                self.hgt.shape,
                expected
            ));
        }
        Ok(())
    }
}

/// Physical heights on a `[time, lat, lon]` grid with one date per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedDataset {
    lat: Vec<f32>,
    lon: Vec<f32>,
    hgt: Vec<f32>,
    shape: [usize; 3],
    dates: Vec<String>,
    level: f32,
    units: Option<String>,
}

impl PreparedDataset {
    /// Assemble a prepared dataset, checking that every array agrees on shape.
    pub fn new(
        lat: Vec<f32>,
        lon: Vec<f32>,
        hgt: Vec<f32>,
        dates: Vec<String>,
        level: f32,
        units: Option<String>,
    ) -> ReanalysisResult<Self> {
        let shape = [dates.len(), lat.len(), lon.len()];
        let expected = shape[0] * shape[1] * shape[2];
        if hgt.len() != expected {
            return Err(ReanalysisError::InvalidArgument(format!(
                "height field holds {} values, {} dates x {} lat x {} lon needs {}",
                hgt.len(),
                shape[0],
                shape[1],
                shape[2],
                expected
            )));
        }
        Ok(Self {
            lat,
            lon,
            hgt,
            shape,
            dates,
            level,
            units,
        })
    }

    pub fn lat(&self) -> &[f32] {
        &self.lat
    }

    pub fn lon(&self) -> &[f32] {
        &self.lon
    }

    /// All heights, row-major `[time, lat, lon]`.
    pub fn hgt(&self) -> &[f32] {
        &self.hgt
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Number of time steps.
    pub fn time_len(&self) -> usize {
        self.shape[0]
    }

    /// Height slice for one time step, row-major `[lat, lon]`.
    pub fn day(&self, t: usize) -> Option<&[f32]> {
        if t >= self.shape[0] {
            return None;
        }
        let plane = self.shape[1] * self.shape[2];
        Some(&self.hgt[t * plane..(t + 1) * plane])
    }

    /// Date string for one time step.
    pub fn date(&self, t: usize) -> Option<&str> {
        self.dates.get(t).map(String::as_str)
    }

    /// Minimum and maximum height over every time step, ignoring NaN.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.hgt
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
