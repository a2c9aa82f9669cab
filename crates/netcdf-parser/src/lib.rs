//! NetCDF reader for NOAA-CIRES 20th Century Reanalysis V2 files.
//!
//! Reads the global 2.0° daily-mean pressure-level height files
//! (e.g. `hgt.1900.nc` subset to 500 mb) into a [`RawDataset`].
//!
//! # Variables
//!
//! | name    | shape                     | notes                                  |
//! |---------|---------------------------|----------------------------------------|
//! | `level` | `[level]`                 | only element 0 is used                 |
//! | `time`  | `[time]`                  | `units` = "hours since 1-1-1 00:00:0.0" |
//! | `hgt`   | `[time, level, lat, lon]` | packed shorts, `scale_factor`/`add_offset` |
//! | `lat`   | `[lat]`                   | degrees north                          |
//! | `lon`   | `[lon]`                   | degrees east                           |
//!
//! All values are read into memory and the file is closed before [`load`]
//! returns. Missing packing attributes are reported as `None`; deciding
//! whether that is fatal is left to the preparer.

pub mod error;
pub mod native;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use reanalysis_common::{RawDataset, ReanalysisError, ReanalysisResult, ScaledVariable, TimeAxis};

pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;

use native::{get_f64_attr, get_string_attr, read_f32, read_f64, require_variable, shape};

/// Load a reanalysis file.
///
/// # Errors
///
/// - `InvalidArgument` if `path` is empty
/// - `UnreadableSource` if the file cannot be opened, is not NetCDF, lacks a
///   required variable, or its height field disagrees with its axes
pub fn load<P: AsRef<Path>>(path: P) -> ReanalysisResult<RawDataset> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(ReanalysisError::InvalidArgument(
            "no source file given".to_string(),
        ));
    }

    silence_hdf5_errors();

    let dataset = read_dataset(path).map_err(|e| e.into_unreadable(path))?;
    dataset
        .check_shape()
        .map_err(|reason| ReanalysisError::unreadable(path, reason))?;

    info!(
        source = %path.display(),
        level = dataset.level,
        time_steps = dataset.time.len(),
        lat = dataset.lat.len(),
        lon = dataset.lon.len(),
        "Loaded reanalysis file"
    );

    Ok(dataset)
}

/// Load a file and summarize its contents.
pub fn inspect<P: AsRef<Path>>(path: P) -> ReanalysisResult<DatasetSummary> {
    let dataset = load(path)?;
    Ok(DatasetSummary::from_raw(&dataset))
}

/// Read all variables. The file handle lives only for the duration of this call.
fn read_dataset(path: &Path) -> NetCdfResult<RawDataset> {
    let file = netcdf::open(path).map_err(|e| NetCdfError::Open(e.to_string()))?;

    let level_var = require_variable(&file, "level")?;
    let level = read_f32(&level_var, "level")?
        .first()
        .copied()
        .ok_or_else(|| NetCdfError::MissingData("level axis is empty".to_string()))?;

    let time_var = require_variable(&file, "time")?;
    let time = TimeAxis {
        values: read_f64(&time_var, "time")?,
        units: get_string_attr(&time_var, "units"),
        calendar: get_string_attr(&time_var, "calendar"),
        scale_factor: get_f64_attr(&time_var, "scale_factor"),
        add_offset: get_f64_attr(&time_var, "add_offset"),
    };

    let hgt_var = require_variable(&file, "hgt")?;
    let dims = shape(&hgt_var);
    let hgt_shape: [usize; 4] = dims.as_slice().try_into().map_err(|_| {
        NetCdfError::InvalidFormat(format!(
            "hgt must have 4 dimensions [time, level, lat, lon], found {}",
            dims.len()
        ))
    })?;
    debug!(shape = ?hgt_shape, "Reading hgt");

    let hgt = ScaledVariable {
        values: read_f64(&hgt_var, "hgt")?,
        shape: hgt_shape,
        scale_factor: get_f64_attr(&hgt_var, "scale_factor"),
        add_offset: get_f64_attr(&hgt_var, "add_offset"),
        units: get_string_attr(&hgt_var, "units"),
        fill_value: get_f64_attr(&hgt_var, "_FillValue")
            .or_else(|| get_f64_attr(&hgt_var, "missing_value")),
    };

    let lat = read_f32(&require_variable(&file, "lat")?, "lat")?;
    let lon = read_f32(&require_variable(&file, "lon")?, "lon")?;

    debug!(
        time_units = ?time.units,
        scale_factor = ?hgt.scale_factor,
        add_offset = ?hgt.add_offset,
        "Read variable attributes"
    );

    Ok(RawDataset {
        source: path.to_path_buf(),
        level,
        time,
        hgt,
        lat,
        lon,
    })
}

/// Short description of a loaded file.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub source: PathBuf,
    pub level: f32,
    pub time_steps: usize,
    pub time_units: Option<String>,
    /// First and last stored time values
    pub time_range: Option<(f64, f64)>,
    pub lat_count: usize,
    pub lat_range: Option<(f32, f32)>,
    pub lon_count: usize,
    pub lon_range: Option<(f32, f32)>,
    pub hgt_units: Option<String>,
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
}

impl DatasetSummary {
    pub fn from_raw(dataset: &RawDataset) -> Self {
        Self {
            source: dataset.source.clone(),
            level: dataset.level,
            time_steps: dataset.time.len(),
            time_units: dataset.time.units.clone(),
            time_range: first_last(&dataset.time.values),
            lat_count: dataset.lat.len(),
            lat_range: first_last(&dataset.lat),
            lon_count: dataset.lon.len(),
            lon_range: first_last(&dataset.lon),
            hgt_units: dataset.hgt.units.clone(),
            scale_factor: dataset.hgt.scale_factor,
            add_offset: dataset.hgt.add_offset,
        }
    }
}

fn first_last<T: Copy>(values: &[T]) -> Option<(T, T)> {
    Some((*values.first()?, *values.last()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_empty_path_is_invalid_argument() {
        let err = load("").unwrap_err();
        assert!(matches!(err, ReanalysisError::InvalidArgument(_)));
    }

    #[test]
    fn test_first_last() {
        assert_eq!(first_last(&[1, 2, 3]), Some((1, 3)));
        assert_eq!(first_last::<i32>(&[]), None);
    }
}
