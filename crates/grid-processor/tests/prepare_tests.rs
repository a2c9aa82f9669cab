//! Tests for preparing loaded reanalysis data.

use std::path::PathBuf;

use grid_processor::prepare;
use reanalysis_common::{RawDataset, ReanalysisError, ScaledVariable, TimeAxis};
use test_utils::{
    assert_approx_eq, day_of_1900, require_test_file, temp_test_dir, ReanalysisFixture,
    HOURS_TO_1900, REANALYSIS_SAMPLE, REANALYSIS_TIME_UNITS,
};

/// Two days on a 2x3 grid, packed with scale 1 and offset 32066.
fn small_raw() -> RawDataset {
    let packed: Vec<f64> = vec![
        -26500.0, -26490.0, -26480.0, -26470.0, -26460.0, -26450.0, // day 0
        -26400.0, -26390.0, -26380.0, -26370.0, -26360.0, -26350.0, // day 1
    ];
    RawDataset {
        source: PathBuf::from("small.nc"),
        level: 500.0,
        time: TimeAxis::new(vec![HOURS_TO_1900, HOURS_TO_1900 + 24.0], REANALYSIS_TIME_UNITS),
        hgt: ScaledVariable {
            values: packed,
            shape: [2, 1, 2, 3],
            scale_factor: Some(1.0),
            add_offset: Some(32066.0),
            units: Some("m".to_string()),
            fill_value: None,
        },
        lat: vec![90.0, 88.0],
        lon: vec![0.0, 2.0, 4.0],
    }
}

// ============================================================================
// Unpacking and dates
// ============================================================================

#[test]
fn test_prepare_applies_scale_and_offset() {
    let raw = small_raw();
    let prepared = prepare(&raw).unwrap();

    assert_eq!(prepared.shape(), [2, 2, 3]);
    for (stored, physical) in raw.hgt.values.iter().zip(prepared.hgt()) {
        assert_eq!(*physical, (stored * 1.0 + 32066.0) as f32);
    }
    assert_eq!(prepared.hgt()[0], 5566.0);
}

#[test]
fn test_prepare_copies_axes() {
    let raw = small_raw();
    let prepared = prepare(&raw).unwrap();

    assert_eq!(prepared.lat(), raw.lat.as_slice());
    assert_eq!(prepared.lon(), raw.lon.as_slice());
    assert_eq!(prepared.level(), 500.0);
    assert_eq!(prepared.units(), Some("m"));
}

#[test]
fn test_prepare_one_date_per_time_step() {
    let prepared = prepare(&small_raw()).unwrap();
    assert_eq!(prepared.dates(), &["1900-01-01".to_string(), "1900-01-02".to_string()]);
}

#[test]
fn test_prepare_non_unit_scale() {
    let mut raw = small_raw();
    raw.hgt.scale_factor = Some(0.5);
    raw.hgt.add_offset = Some(10.0);
    let prepared = prepare(&raw).unwrap();
    assert_approx_eq!(prepared.hgt()[0], -26500.0 * 0.5 + 10.0, 1e-3);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_prepare_missing_scale_factor() {
    let mut raw = small_raw();
    raw.hgt.scale_factor = None;
    assert!(matches!(prepare(&raw), Err(ReanalysisError::MissingMetadata(_))));
}

#[test]
fn test_prepare_missing_time_units() {
    let mut raw = small_raw();
    raw.time.units = None;
    assert!(matches!(prepare(&raw), Err(ReanalysisError::MissingMetadata(_))));
}

#[test]
fn test_prepare_unparseable_time_units() {
    let mut raw = small_raw();
    raw.time.units = Some("fortnights after the flood".to_string());
    assert!(matches!(prepare(&raw), Err(ReanalysisError::UnsupportedEpoch(_))));
}

#[test]
fn test_prepare_shape_mismatch() {
    let mut raw = small_raw();
    raw.lon.push(6.0);
    assert!(matches!(prepare(&raw), Err(ReanalysisError::InvalidArgument(_))));
}

// ============================================================================
// Load + prepare
// ============================================================================

#[test]
fn test_load_then_prepare_fixture() {
    let dir = temp_test_dir();
    let path = dir.path().join("hgt.500mb.nc");
    let fixture = ReanalysisFixture::default();
    fixture.write(&path).unwrap();

    let raw = netcdf_parser::load(&path).unwrap();
    let prepared = prepare(&raw).unwrap();

    assert_eq!(prepared.time_len(), 60);
    assert_eq!(prepared.dates().len(), 60);
    assert_eq!(prepared.date(46), Some("1900-02-16"));
    for t in [0, 31, 46, 59] {
        assert_eq!(prepared.date(t).unwrap(), day_of_1900(t));
    }

    let (min, max) = prepared.min_max().unwrap();
    assert!(min >= 5000.0 && max <= 6000.0, "range {}..{}", min, max);
}

#[test]
fn test_load_then_prepare_real_sample() {
    let path = require_test_file!(REANALYSIS_SAMPLE);

    let prepared = prepare(&netcdf_parser::load(&path).unwrap()).unwrap();
    assert!(prepared.date(46).unwrap().ends_with("-02-16"));
}
