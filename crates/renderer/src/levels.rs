//! Contour level selection for filled height maps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use reanalysis_common::{PreparedDataset, ReanalysisError, ReanalysisResult};

use crate::colormap::{rd_yl_bu_r, Color};

/// Default spacing between contour levels (meters).
pub const DEFAULT_INTERVAL: f32 = 100.0;

/// Band boundaries for a filled contour map.
///
/// Levels are shared by every day of a dataset so maps of different days
/// are directly comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLevels {
    levels: Vec<f32>,
    interval: f32,
}

impl ContourLevels {
    /// Levels covering `[min, max]` snapped outward to multiples of `interval`.
    ///
    /// The snapped maximum itself is excluded, so the sequence ends at the
    /// last multiple below it. Ranges that yield fewer than two levels (no
    /// band to fill) are rejected.
    pub fn from_range(min: f32, max: f32, interval: f32) -> ReanalysisResult<Self> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ReanalysisError::InvalidArgument(format!(
                "contour interval must be positive, got {}",
                interval
            )));
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ReanalysisError::InvalidArgument(format!(
                "no valid height range ({}..{})",
                min, max
            )));
        }

        let lo = (min / interval).floor() * interval;
        let hi = (max / interval).ceil() * interval;
        let count = ((hi - lo) / interval).round() as usize;
        let levels: Vec<f32> = (0..count).map(|i| lo + i as f32 * interval).collect();
        if levels.len() < 2 {
            return Err(ReanalysisError::InvalidArgument(format!(
                "heights {}..{} span fewer than two contour levels at interval {}",
                min, max, interval
            )));
        }

        debug!(
            min = lo,
            max = hi,
            count = levels.len(),
            interval = interval,
            "Generated contour levels"
        );

        Ok(Self { levels, interval })
    }

    /// Levels from the minimum and maximum over every time step of `data`.
    pub fn from_dataset(data: &PreparedDataset, interval: f32) -> ReanalysisResult<Self> {
        let (min, max) = data.min_max().ok_or_else(|| {
            ReanalysisError::InvalidArgument("height field has no finite values".to_string())
        })?;
        Self::from_range(min, max, interval)
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of filled bands, one between each pair of adjacent levels.
    pub fn band_count(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Band containing `value`, where band `i` is `[levels[i], levels[i + 1])`.
    ///
    /// None for NaN and for values outside the level range.
    pub fn band_of(&self, value: f32) -> Option<usize> {
        let first = *self.levels.first()?;
        if self.levels.len() < 2 || value.is_nan() || value < first {
            return None;
        }
        let i = ((value - first) / self.interval).floor() as usize;
        (i < self.band_count()).then_some(i)
    }

    /// Fill color of band `i`, taken at its midpoint.
    pub fn band_color(&self, i: usize) -> Color {
        let (Some(&first), Some(&last)) = (self.levels.first(), self.levels.last()) else {
            return rd_yl_bu_r(0.5);
        };
        let span = last - first;
        if span <= 0.0 {
            return rd_yl_bu_r(0.5);
        }
        let mid = first + (i as f32 + 0.5) * self.interval;
        rd_yl_bu_r((mid - first) / span)
    }

    /// Colors of every band in order.
    pub fn band_colors(&self) -> Vec<Color> {
        (0..self.band_count()).map(|i| self.band_color(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapped_bounds() {
        let levels = ContourLevels::from_range(4873.0, 5921.0, 100.0).unwrap();
        assert_eq!(levels.levels().first(), Some(&4800.0));
        // 6000 is the snapped max and is excluded
        assert_eq!(levels.levels().last(), Some(&5900.0));
        assert_eq!(levels.len(), 12);
    }

    #[test]
    fn test_exact_multiples() {
        let levels = ContourLevels::from_range(5000.0, 5500.0, 100.0).unwrap();
        assert_eq!(levels.levels(), &[5000.0, 5100.0, 5200.0, 5300.0, 5400.0]);
    }

    #[test]
    fn test_band_of() {
        let levels = ContourLevels::from_range(5000.0, 5500.0, 100.0).unwrap();
        assert_eq!(levels.band_of(5000.0), Some(0));
        assert_eq!(levels.band_of(5099.9), Some(0));
        assert_eq!(levels.band_of(5100.0), Some(1));
        assert_eq!(levels.band_of(5399.0), Some(3));
        // Above the last level: unfilled
        assert_eq!(levels.band_of(5400.0), None);
        assert_eq!(levels.band_of(4999.0), None);
        assert_eq!(levels.band_of(f32::NAN), None);
    }

    #[test]
    fn test_band_colors_run_blue_to_red() {
        let levels = ContourLevels::from_range(5000.0, 6000.0, 100.0).unwrap();
        let colors = levels.band_colors();
        assert_eq!(colors.len(), levels.band_count());
        assert!(colors[0].b > colors[0].r);
        assert!(colors[colors.len() - 1].r > colors[colors.len() - 1].b);
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert!(ContourLevels::from_range(0.0, 10.0, 0.0).is_err());
        assert!(ContourLevels::from_range(0.0, 10.0, -5.0).is_err());
        assert!(ContourLevels::from_range(0.0, 10.0, f32::NAN).is_err());
    }

    #[test]
    fn test_rejects_range_without_bands() {
        // Constant field
        assert!(ContourLevels::from_range(5500.0, 5500.0, 100.0).is_err());
        // One level only: 5000, with 5100 excluded
        assert!(ContourLevels::from_range(5000.0, 5100.0, 100.0).is_err());
        assert!(ContourLevels::from_range(5010.0, 5090.0, 100.0).is_err());

        let two = ContourLevels::from_range(5000.0, 5150.0, 100.0).unwrap();
        assert_eq!(two.levels(), &[5000.0, 5100.0]);
        assert_eq!(two.band_count(), 1);
    }

    #[test]
    fn test_rejects_bad_range() {
        assert!(ContourLevels::from_range(f32::NAN, 10.0, 100.0).is_err());
        assert!(ContourLevels::from_range(10.0, 0.0, 100.0).is_err());
    }
}
