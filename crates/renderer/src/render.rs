//! One-day orthographic height map, from prepared data to PNG.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use projection::{Graticule, Orthographic};
use reanalysis_common::{PreparedDataset, ReanalysisError, ReanalysisResult};

use crate::annotations::{MapAnnotations, LABEL_PT, TITLE_PT};
use crate::canvas::Canvas;
use crate::coastline::Coastlines;
use crate::colorbar::draw_colorbar;
use crate::fill::fill_bands;
use crate::layout::Layout;
use crate::levels::{ContourLevels, DEFAULT_INTERVAL};
use crate::overlay::Overlay;
use crate::sampler::GridSampler;
use crate::text::{Align, TextPainter};

/// Day rendered when none is given (16 February for a 1 January start).
pub const DEFAULT_DAY_INDEX: usize = 46;

/// Output file used when none is given.
pub const DEFAULT_OUTPUT: &str = "gph.png";

/// Drawing options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Output resolution; the figure is always 8 x 6 inches
    pub dpi: u32,
    /// TrueType font replacing the embedded DejaVu Sans
    pub font_path: Option<PathBuf>,
    /// GeoJSON coastlines replacing the embedded world outline
    pub coastline_path: Option<PathBuf>,
    /// Spacing between contour levels (meters)
    pub contour_interval: f32,
    /// Longitude of the view center (degrees)
    pub center_lon: f64,
    /// Latitude of the view center (degrees)
    pub center_lat: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 96,
            font_path: None,
            coastline_path: None,
            contour_interval: DEFAULT_INTERVAL,
            center_lon: -105.0,
            center_lat: 60.0,
        }
    }
}

/// Where the finished image goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    /// Open in the system image viewer
    Display,
}

impl Default for OutputTarget {
    fn default() -> Self {
        OutputTarget::File(PathBuf::from(DEFAULT_OUTPUT))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub day_index: usize,
    pub target: OutputTarget,
    pub options: RenderOptions,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            day_index: DEFAULT_DAY_INDEX,
            target: OutputTarget::default(),
            options: RenderOptions::default(),
        }
    }
}

/// Where the image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    File(PathBuf),
    /// Written to this kept temporary file and handed to the viewer
    Displayed(PathBuf),
}

impl RenderOutcome {
    pub fn path(&self) -> &Path {
        match self {
            RenderOutcome::File(p) | RenderOutcome::Displayed(p) => p,
        }
    }
}

/// Render one day of `data` and deliver it to `request.target`.
///
/// # Errors
///
/// - `IndexOutOfRange` if `day_index` is not below the number of time steps
/// - `InvalidArgument` if the dataset has no finite heights or the options are invalid
/// - `InvalidArgument` if the heights span fewer than two contour levels
/// - `RenderFailed` if encoding, writing or launching the viewer fails
pub fn render(data: &PreparedDataset, request: &RenderRequest) -> ReanalysisResult<RenderOutcome> {
    let png = render_png(data, request.day_index, &request.options)?;

    match &request.target {
        OutputTarget::File(path) => {
            write_file(path, &png)?;
            info!(path = %path.display(), bytes = png.len(), "Wrote map");
            Ok(RenderOutcome::File(path.clone()))
        }
        OutputTarget::Display => {
            let path = write_temp(&png)?;
            open_viewer(&path)?;
            info!(path = %path.display(), "Opened map in viewer");
            Ok(RenderOutcome::Displayed(path))
        }
    }
}

/// Render one day of `data` to PNG bytes.
pub fn render_png(
    data: &PreparedDataset,
    day_index: usize,
    options: &RenderOptions,
) -> ReanalysisResult<Vec<u8>> {
    let len = data.time_len();
    let (Some(day), Some(date)) = (data.day(day_index), data.date(day_index)) else {
        return Err(ReanalysisError::IndexOutOfRange {
            index: day_index,
            len,
        });
    };
    if !options.center_lat.is_finite()
        || !options.center_lon.is_finite()
        || options.center_lat.abs() > 90.0
    {
        return Err(ReanalysisError::InvalidArgument(format!(
            "invalid view center ({}, {})",
            options.center_lon, options.center_lat
        )));
    }

    let levels = ContourLevels::from_dataset(data, options.contour_interval)?;
    let sampler = GridSampler::new(day, data.lat(), data.lon()).ok_or_else(|| {
        ReanalysisError::InvalidArgument("height slice does not match lat/lon axes".to_string())
    })?;
    let annotations = MapAnnotations::for_date(date);
    let proj = Orthographic::new(options.center_lon, options.center_lat);
    let layout = Layout::new(options.dpi);

    debug!(
        day_index,
        date,
        width = layout.width,
        height = layout.height,
        levels = levels.len(),
        "Rendering map"
    );

    let painter = TextPainter::with_override(options.font_path.as_deref())?;
    let coast = Coastlines::with_override(options.coastline_path.as_deref())?;
    let mut canvas = Canvas::new(layout.clone())?;

    fill_bands(canvas.pixmap_mut(), &layout, &proj, &sampler, &levels);

    let overlay = Overlay::new(&layout, &proj);
    overlay.draw_coastlines(canvas.pixmap_mut(), &coast.lines);
    overlay.draw_graticule(canvas.pixmap_mut(), &Graticule::default());
    overlay.draw_limb(canvas.pixmap_mut());

    let ticks = draw_colorbar(canvas.pixmap_mut(), layout.colorbar, &levels);

    // Text
    let title_px = layout.points(TITLE_PT);
    let label_px = layout.points(LABEL_PT);
    let gap = layout.points(6.0);

    canvas.text(
        annotations.title,
        layout.map.center_x(),
        layout.map.y - gap - title_px,
        title_px,
        Align::Center,
    );
    // Bottom-aligned a tenth of the map height below the map
    canvas.text(
        annotations.caption,
        layout.map.center_x(),
        layout.map.bottom() + layout.map.height * 0.1 - label_px,
        label_px,
        Align::Center,
    );
    let label_x = layout.colorbar.right() + layout.points(3.5);
    let mut widest = 0.0f32;
    for tick in &ticks {
        canvas.text(tick.label.clone(), label_x, tick.y - label_px / 2.0, label_px, Align::Left);
        widest = widest.max(painter.measure(&tick.label, label_px).0);
    }
    canvas.vertical_text(
        annotations.colorbar_label,
        label_x + widest + layout.points(4.0),
        layout.colorbar.y + layout.colorbar.height / 2.0,
        label_px,
    );

    canvas.finish(&painter)
}

fn write_file(path: &Path, png: &[u8]) -> ReanalysisResult<()> {
    std::fs::write(path, png).map_err(|e| {
        ReanalysisError::RenderFailed(format!("cannot write {}: {}", path.display(), e))
    })
}

/// Write to a temporary file that outlives this process.
fn write_temp(png: &[u8]) -> ReanalysisResult<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("gph-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| ReanalysisError::RenderFailed(format!("cannot create temp file: {}", e)))?;
    file.write_all(png)
        .map_err(|e| ReanalysisError::RenderFailed(format!("cannot write temp file: {}", e)))?;
    let (_, path) = file
        .keep()
        .map_err(|e| ReanalysisError::RenderFailed(format!("cannot keep temp file: {}", e)))?;
    Ok(path)
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

fn open_viewer(path: &Path) -> ReanalysisResult<()> {
    let mut cmd = viewer_command(path);
    debug!(command = ?cmd, "Launching image viewer");
    let status = cmd.status().map_err(|e| {
        ReanalysisError::RenderFailed(format!(
            "cannot open viewer for {}: {}",
            path.display(),
            e
        ))
    })?;
    if !status.success() {
        return Err(ReanalysisError::RenderFailed(format!(
            "viewer exited with {} for {}",
            status,
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = RenderRequest::default();
        assert_eq!(request.day_index, 46);
        assert_eq!(request.target, OutputTarget::File(PathBuf::from("gph.png")));
        assert_eq!(request.options.dpi, 96);
        assert_eq!(request.options.contour_interval, 100.0);
        assert_eq!((request.options.center_lon, request.options.center_lat), (-105.0, 60.0));
    }

    #[test]
    fn test_options_partial_deserialize() {
        let options: RenderOptions = serde_json::from_str(r#"{"dpi": 150}"#).unwrap();
        assert_eq!(options.dpi, 150);
        assert_eq!(options.font_path, None);
        assert_eq!(options.coastline_path, None);
    }

    #[test]
    fn test_viewer_command_targets_file() {
        let cmd = viewer_command(Path::new("/tmp/map.png"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args.last().map(|a| a.to_os_string()), Some("/tmp/map.png".into()));
    }

    #[test]
    fn test_outcome_path() {
        let outcome = RenderOutcome::Displayed(PathBuf::from("/tmp/x.png"));
        assert_eq!(outcome.path(), Path::new("/tmp/x.png"));
    }
}
