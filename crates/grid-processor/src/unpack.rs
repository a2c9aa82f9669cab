//! Unpacking of scaled integer heights.

use tracing::debug;

use reanalysis_common::{ReanalysisError, ReanalysisResult, ScaledVariable};

/// Apply `scale_factor` and `add_offset` to level 0 of a packed
/// `[time, level, lat, lon]` variable.
///
/// Returns `[time, lat, lon]` heights. Stored values equal to the fill value
/// become NaN.
pub fn unpack_heights(hgt: &ScaledVariable) -> ReanalysisResult<Vec<f32>> {
    let scale = hgt
        .scale_factor
        .ok_or_else(|| ReanalysisError::MissingMetadata("hgt has no scale_factor".to_string()))?;
    let offset = hgt
        .add_offset
        .ok_or_else(|| ReanalysisError::MissingMetadata("hgt has no add_offset".to_string()))?;

    let [nt, nlev, nlat, nlon] = hgt.shape;
    let plane = nlat * nlon;
    let mut out = Vec::with_capacity(nt * plane);

    for t in 0..nt {
        let start = t * nlev * plane;
        let stored = hgt.values.get(start..start + plane).ok_or_else(|| {
            ReanalysisError::InvalidArgument(format!("hgt is truncated at time step {}", t))
        })?;
        out.extend(stored.iter().map(|&v| {
            if hgt.fill_value == Some(v) {
                f32::NAN
            } else {
                (v * scale + offset) as f32
            }
        }));
    }

    debug!(
        values = out.len(),
        scale_factor = scale,
        add_offset = offset,
        dropped_levels = nlev.saturating_sub(1),
        "Unpacked heights"
    );

    Ok(out)
}
