//! NetCDF fixture files shaped like 20th Century Reanalysis V2 output.
//!
//! The real files store `hgt` as packed shorts with `add_offset = 32066`
//! and `scale_factor = 1`, and `time` as hours since 0001-01-01.

use std::path::Path;

use crate::generators::{latitudes, longitudes, synthetic_height};

/// Hours from 0001-01-01 to 1900-01-01 on the proleptic Gregorian calendar.
pub const HOURS_TO_1900: f64 = 693_595.0 * 24.0;

/// Time units attribute written by the reanalysis files.
pub const REANALYSIS_TIME_UNITS: &str = "hours since 1-1-1 00:00:0.0";

/// Description of a fixture file.
#[derive(Debug, Clone)]
pub struct ReanalysisFixture {
    pub time_steps: usize,
    /// Grid spacing in degrees
    pub step: f32,
    pub level: f32,
    /// `None` omits the attribute from `hgt`
    pub scale_factor: Option<f32>,
    /// `None` omits the attribute from `hgt`
    pub add_offset: Option<f32>,
    /// `None` omits the attribute from `time`
    pub time_units: Option<String>,
    /// First stored time value
    pub first_time: f64,
}

impl Default for ReanalysisFixture {
    fn default() -> Self {
        Self {
            time_steps: 60,
            step: 10.0,
            level: 500.0,
            scale_factor: Some(1.0),
            add_offset: Some(32066.0),
            time_units: Some(REANALYSIS_TIME_UNITS.to_string()),
            first_time: HOURS_TO_1900,
        }
    }
}

impl ReanalysisFixture {
    pub fn lat(&self) -> Vec<f32> {
        latitudes(self.step)
    }

    pub fn lon(&self) -> Vec<f32> {
        longitudes(self.step)
    }

    /// Stored time values, one per day.
    pub fn times(&self) -> Vec<f64> {
        (0..self.time_steps)
            .map(|t| self.first_time + t as f64 * 24.0)
            .collect()
    }

    /// Packed `hgt` values in `[time, level, lat, lon]` order.
    pub fn packed_heights(&self) -> Vec<i16> {
        let scale = self.scale_factor.unwrap_or(1.0);
        let offset = self.add_offset.unwrap_or(0.0);
        let lat = self.lat();
        let lon = self.lon();

        let mut packed = Vec::with_capacity(self.time_steps * lat.len() * lon.len());
        for t in 0..self.time_steps {
            for &la in &lat {
                for &lo in &lon {
                    let physical = synthetic_height(t, la, lo);
                    packed.push(((physical - offset) / scale).round() as i16);
                }
            }
        }
        packed
    }

    /// Write the fixture to `path`.
    pub fn write(&self, path: &Path) -> Result<(), netcdf::Error> {
        let lat = self.lat();
        let lon = self.lon();

        let mut file = netcdf::create(path)?;
        file.add_dimension("level", 1)?;
        file.add_dimension("time", self.time_steps)?;
        file.add_dimension("lat", lat.len())?;
        file.add_dimension("lon", lon.len())?;

        let mut level_var = file.add_variable::<f32>("level", &["level"])?;
        level_var.put_attribute("units", "millibar")?;
        level_var.put_values(&[self.level], ..)?;

        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        if let Some(units) = &self.time_units {
            time_var.put_attribute("units", units.as_str())?;
        }
        time_var.put_values(&self.times(), ..)?;

        let mut lat_var = file.add_variable::<f32>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put_values(&lat, ..)?;

        let mut lon_var = file.add_variable::<f32>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put_values(&lon, ..)?;

        let mut hgt_var = file.add_variable::<i16>("hgt", &["time", "level", "lat", "lon"])?;
        hgt_var.put_attribute("units", "m")?;
        if let Some(scale) = self.scale_factor {
            hgt_var.put_attribute("scale_factor", scale)?;
        }
        if let Some(offset) = self.add_offset {
            hgt_var.put_attribute("add_offset", offset)?;
        }
        hgt_var.put_values(&self.packed_heights(), ..)?;

        Ok(())
    }
}
