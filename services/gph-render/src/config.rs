//! Configuration for the gph-render command.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line flags. `font_path` and `coastline_path` replace the embedded
//! font and coastlines.
//!
//! ```yaml
//! render:
//!   day_index: 46
//!   output: gph.png
//!   dpi: 96
//!   font_path: /usr/share/fonts/truetype/dejavu/DejaVuSansCondensed.ttf
//!   coastline_path: /data/ne_110m_coastline.geojson
//!   contour_interval: 100
//!   center_lon: -105
//!   center_lat: 60
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use renderer::{OutputTarget, RenderOptions, RenderRequest, DEFAULT_DAY_INDEX};

/// Top-level YAML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub render: RenderSection,
}

/// `render:` block. Absent keys fall through to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSection {
    pub day_index: Option<usize>,
    pub output: Option<PathBuf>,
    pub dpi: Option<u32>,
    pub font_path: Option<PathBuf>,
    pub coastline_path: Option<PathBuf>,
    pub contour_interval: Option<f32>,
    pub center_lon: Option<f64>,
    pub center_lat: Option<f64>,
}

/// Flags given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub day: Option<usize>,
    pub output: Option<PathBuf>,
    pub show: bool,
    pub font: Option<PathBuf>,
    pub coastlines: Option<PathBuf>,
    pub dpi: Option<u32>,
}

impl FileConfig {
    /// Load a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path.as_ref()))?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file is a valid, empty config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: FileConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let r = &self.render;
        if r.dpi == Some(0) {
            bail!("render.dpi must be positive");
        }
        if let Some(interval) = r.contour_interval {
            if !(interval.is_finite() && interval > 0.0) {
                bail!("render.contour_interval must be positive, got {}", interval);
            }
        }
        if let Some(lat) = r.center_lat {
            if !(-90.0..=90.0).contains(&lat) {
                bail!("render.center_lat must be within -90..90, got {}", lat);
            }
        }
        Ok(())
    }

    /// Merge defaults, this file and command-line flags into a request.
    pub fn to_request(&self, cli: &CliOverrides) -> RenderRequest {
        let file = &self.render;
        let defaults = RenderOptions::default();

        let target = if cli.show {
            OutputTarget::Display
        } else {
            match cli.output.as_ref().or(file.output.as_ref()) {
                Some(path) => OutputTarget::File(path.clone()),
                None => OutputTarget::default(),
            }
        };

        RenderRequest {
            day_index: cli.day.or(file.day_index).unwrap_or(DEFAULT_DAY_INDEX),
            target,
            options: RenderOptions {
                dpi: cli.dpi.or(file.dpi).unwrap_or(defaults.dpi),
                font_path: cli.font.clone().or_else(|| file.font_path.clone()),
                coastline_path: cli.coastlines.clone().or_else(|| file.coastline_path.clone()),
                contour_interval: file.contour_interval.unwrap_or(defaults.contour_interval),
                center_lon: file.center_lon.unwrap_or(defaults.center_lon),
                center_lat: file.center_lat.unwrap_or(defaults.center_lat),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file_or_flags() {
        let request = FileConfig::default().to_request(&CliOverrides::default());
        assert_eq!(request, RenderRequest::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = FileConfig::from_yaml(
            r#"
render:
  day_index: 10
  output: /tmp/out.png
  dpi: 150
  coastline_path: /data/coast.geojson
  contour_interval: 60
  center_lon: 0
  center_lat: 45
"#,
        )
        .unwrap();
        let request = config.to_request(&CliOverrides::default());

        assert_eq!(request.day_index, 10);
        assert_eq!(request.target, OutputTarget::File(PathBuf::from("/tmp/out.png")));
        assert_eq!(request.options.dpi, 150);
        assert_eq!(
            request.options.coastline_path,
            Some(PathBuf::from("/data/coast.geojson"))
        );
        assert_eq!(request.options.contour_interval, 60.0);
        assert_eq!((request.options.center_lon, request.options.center_lat), (0.0, 45.0));
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = FileConfig::from_yaml("render:\n  day_index: 10\n  dpi: 150\n").unwrap();
        let cli = CliOverrides {
            day: Some(3),
            dpi: Some(72),
            font: Some(PathBuf::from("/fonts/a.ttf")),
            ..Default::default()
        };
        let request = config.to_request(&cli);

        assert_eq!(request.day_index, 3);
        assert_eq!(request.options.dpi, 72);
        assert_eq!(request.options.font_path, Some(PathBuf::from("/fonts/a.ttf")));
    }

    #[test]
    fn test_show_wins_over_output() {
        let config = FileConfig::from_yaml("render:\n  output: a.png\n").unwrap();
        let cli = CliOverrides {
            show: true,
            output: Some(PathBuf::from("b.png")),
            ..Default::default()
        };
        assert_eq!(config.to_request(&cli).target, OutputTarget::Display);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(FileConfig::from_yaml("  \n").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(FileConfig::from_yaml("render:\n  colour: red\n").is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(FileConfig::from_yaml("render:\n  dpi: 0\n").is_err());
        assert!(FileConfig::from_yaml("render:\n  contour_interval: -5\n").is_err());
        assert!(FileConfig::from_yaml("render:\n  center_lat: 95\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gph.yaml");
        fs::write(&path, "render:\n  day_index: 5\n").unwrap();
        assert_eq!(FileConfig::load(&path).unwrap().render.day_index, Some(5));
        assert!(FileConfig::load(dir.path().join("missing.yaml")).is_err());
    }
}
