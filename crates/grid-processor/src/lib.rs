//! Preparation of raw reanalysis data.
//!
//! Turns a [`RawDataset`] into a [`PreparedDataset`]:
//!
//! ```text
//! RawDataset
//!      │
//!      ├─► hgt  : stored * scale_factor + add_offset, level 0 only
//!      │         [time, level, lat, lon] ─► [time, lat, lon]
//!      │
//!      ├─► time : parse "<unit> since <epoch>", add offsets,
//!      │         format as YYYY-MM-DD
//!      │
//!      └─► lat/lon copied unchanged
//!               │
//!               ▼
//!          PreparedDataset
//! ```
//!
//! # Example
//!
//! ```ignore
//! let raw = netcdf_parser::load("hgt.1900.nc")?;
//! let prepared = grid_processor::prepare(&raw)?;
//! println!("{}", prepared.dates()[46]);
//! ```

pub mod dates;
pub mod unpack;

use tracing::info;

use reanalysis_common::{PreparedDataset, RawDataset, ReanalysisError, ReanalysisResult};

pub use dates::{format_date, time_to_dates, DATE_FORMAT};
pub use unpack::unpack_heights;

/// Convert a loaded dataset to physical units and calendar dates.
///
/// # Errors
///
/// - `InvalidArgument` if the height field disagrees with the axes
/// - `MissingMetadata` if `hgt` lacks `scale_factor`/`add_offset` or `time` lacks `units`
/// - `UnsupportedEpoch` if the time units or calendar cannot be interpreted
pub fn prepare(raw: &RawDataset) -> ReanalysisResult<PreparedDataset> {
    raw.check_shape().map_err(ReanalysisError::InvalidArgument)?;

    let hgt = unpack_heights(&raw.hgt)?;
    let dates = time_to_dates(&raw.time)?;

    info!(
        source = %raw.source.display(),
        time_steps = dates.len(),
        first_date = dates.first().map(String::as_str).unwrap_or(""),
        last_date = dates.last().map(String::as_str).unwrap_or(""),
        "Prepared dataset"
    );

    PreparedDataset::new(
        raw.lat.clone(),
        raw.lon.clone(),
        hgt,
        dates,
        raw.level,
        raw.hgt.units.clone(),
    )
}
