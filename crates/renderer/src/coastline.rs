//! Coastline polylines from GeoJSON.
//!
//! Accepts a `FeatureCollection`, a single `Feature`, or a bare geometry.
//! `LineString`, `MultiLineString`, `Polygon`, `MultiPolygon` and
//! `GeometryCollection` contribute lines; points are ignored. Natural Earth's
//! `ne_110m_coastline.geojson` works as-is.
//!
//! A coarse world outline is embedded and used unless a file is configured.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use reanalysis_common::{ReanalysisError, ReanalysisResult};

/// Embedded coarse world coastlines (GeoJSON).
const COASTLINE_DATA: &str = include_str!("../assets/coastlines.geojson");

/// Coastline polylines as `(lon, lat)` points in degrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coastlines {
    pub lines: Vec<Vec<(f64, f64)>>,
}

impl Coastlines {
    /// The embedded world coastlines.
    pub fn embedded() -> ReanalysisResult<Self> {
        Self::from_geojson(COASTLINE_DATA).map_err(|e| {
            ReanalysisError::RenderFailed(format!("embedded coastlines are invalid: {}", e))
        })
    }

    /// Coastlines from `path` if given and readable, else the embedded set.
    pub fn with_override(path: Option<&Path>) -> ReanalysisResult<Self> {
        if let Some(path) = path {
            match Self::from_file(path) {
                Ok(coastlines) => return Ok(coastlines),
                Err(e) => warn!(error = %e, "Coastline override unusable, using embedded set"),
            }
        }
        Self::embedded()
    }

    /// Load coastlines from a GeoJSON file.
    pub fn from_file(path: &Path) -> ReanalysisResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReanalysisError::unreadable(path, e.to_string()))?;
        let coastlines = Self::from_geojson(&text)
            .map_err(|e| ReanalysisError::unreadable(path, e.to_string()))?;
        debug!(
            path = %path.display(),
            lines = coastlines.lines.len(),
            "Loaded coastlines"
        );
        Ok(coastlines)
    }

    /// Parse coastlines from GeoJSON text.
    pub fn from_geojson(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        let mut lines = Vec::new();
        collect(&value, &mut lines);
        Ok(Self { lines })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn collect(value: &Value, out: &mut Vec<Vec<(f64, f64)>>) {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or("");
    let coords = value.get("coordinates");

    match kind {
        "FeatureCollection" => {
            if let Some(features) = value.get("features").and_then(Value::as_array) {
                for feature in features {
                    collect(feature, out);
                }
            }
        }
        "Feature" => {
            if let Some(geometry) = value.get("geometry") {
                collect(geometry, out);
            }
        }
        "GeometryCollection" => {
            if let Some(geometries) = value.get("geometries").and_then(Value::as_array) {
                for geometry in geometries {
                    collect(geometry, out);
                }
            }
        }
        "LineString" => out.extend(coords.and_then(line)),
        "MultiLineString" | "Polygon" => {
            out.extend(lines(coords));
        }
        "MultiPolygon" => {
            for polygon in coords.and_then(Value::as_array).into_iter().flatten() {
                out.extend(lines(Some(polygon)));
            }
        }
        "Point" | "MultiPoint" | "Null" => {}
        other => warn!(geometry_type = other, "Skipping unsupported GeoJSON object"),
    }
}

fn lines(value: Option<&Value>) -> Vec<Vec<(f64, f64)>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(line)
        .collect()
}

fn line(value: &Value) -> Option<Vec<(f64, f64)>> {
    let points: Vec<(f64, f64)> = value
        .as_array()?
        .iter()
        .filter_map(|p| {
            let p = p.as_array()?;
            Some((p.first()?.as_f64()?, p.get(1)?.as_f64()?))
        })
        .collect();
    (points.len() >= 2).then_some(points)
}
