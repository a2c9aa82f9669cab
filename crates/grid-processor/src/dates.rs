//! Conversion of the time axis to calendar dates.
//!
//! The units attribute is parsed rather than assumed. Reanalysis V2 files
//! say "hours since 1-1-1 00:00:0.0", which is 0001-01-01T00:00:00 UTC.

use chrono::NaiveDate;

use reanalysis_common::time::check_calendar;
use reanalysis_common::{ReanalysisError, ReanalysisResult, TimeAxis, TimeUnits};

/// Day-precision date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One `YYYY-MM-DD` string per time step.
pub fn time_to_dates(time: &TimeAxis) -> ReanalysisResult<Vec<String>> {
    let units = time
        .units
        .as_deref()
        .ok_or_else(|| ReanalysisError::MissingMetadata("time has no units".to_string()))?;
    let units = TimeUnits::parse(units)?;
    check_calendar(time.calendar.as_deref())?;

    let scale = time.scale_factor.unwrap_or(1.0);
    let offset = time.add_offset.unwrap_or(0.0);

    time.values
        .iter()
        .map(|&v| {
            units
                .instant(v * scale + offset)
                .map(|t| t.format(DATE_FORMAT).to_string())
        })
        .collect()
}

/// Normalize a date string to `YYYY-MM-DD`.
///
/// Accepts anything [`time_to_dates`] produces, plus non-padded fields such as
/// "1900-2-16". Applying it twice gives the same result as applying it once.
pub fn format_date(date: &str) -> ReanalysisResult<String> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|e| ReanalysisError::InvalidArgument(format!("bad date \"{}\": {}", date, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOURS_TO_1900: f64 = 693_595.0 * 24.0;

    #[test]
    fn test_reanalysis_hours() {
        let time = TimeAxis::new(
            vec![HOURS_TO_1900, HOURS_TO_1900 + 24.0, HOURS_TO_1900 + 46.0 * 24.0],
            "hours since 1-1-1 00:00:0.0",
        );
        let dates = time_to_dates(&time).unwrap();
        assert_eq!(dates, vec!["1900-01-01", "1900-01-02", "1900-02-16"]);
    }

    #[test]
    fn test_sub_day_offsets_are_truncated_by_format() {
        let time = TimeAxis::new(vec![0.0, 23.0, 24.0], "hours since 1950-06-01");
        let dates = time_to_dates(&time).unwrap();
        assert_eq!(dates, vec!["1950-06-01", "1950-06-01", "1950-06-02"]);
    }

    #[test]
    fn test_epoch_year_one_is_padded() {
        let time = TimeAxis::new(vec![0.0], "hours since 1-1-1 00:00:0.0");
        assert_eq!(time_to_dates(&time).unwrap(), vec!["0001-01-01"]);
    }

    #[test]
    fn test_time_scale_and_offset() {
        let mut time = TimeAxis::new(vec![1.0, 2.0], "days since 2000-01-01");
        time.scale_factor = Some(10.0);
        time.add_offset = Some(-10.0);
        assert_eq!(time_to_dates(&time).unwrap(), vec!["2000-01-01", "2000-01-11"]);
    }

    #[test]
    fn test_missing_units() {
        let mut time = TimeAxis::new(vec![0.0], "hours since 1-1-1");
        time.units = None;
        assert!(matches!(
            time_to_dates(&time),
            Err(ReanalysisError::MissingMetadata(_))
        ));
    }

    #[test]
    fn test_unsupported_calendar() {
        let mut time = TimeAxis::new(vec![0.0], "hours since 1-1-1");
        time.calendar = Some("noleap".to_string());
        assert!(matches!(
            time_to_dates(&time),
            Err(ReanalysisError::UnsupportedEpoch(_))
        ));
    }

    #[test]
    fn test_format_date_idempotent() {
        for input in ["1900-02-16", "1900-2-16", "0001-01-01", " 2024-12-31 "] {
            let once = format_date(input).unwrap();
            let twice = format_date(&once).unwrap();
            assert_eq!(once, twice);
            assert_eq!(once.len(), 10);
            assert_eq!(&once[4..5], "-");
            assert_eq!(&once[7..8], "-");
        }
    }

    #[test]
    fn test_format_date_rejects_garbage() {
        assert!(format_date("February 16th").is_err());
    }
}
