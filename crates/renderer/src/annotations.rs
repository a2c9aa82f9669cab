//! Title, caption and colour bar label text.

use serde::Serialize;

pub const TITLE_PREFIX: &str = "500 mb Geopotential Heights : ";
pub const CAPTION: &str = "Data: NOAA-CIRES 20th Century Reanalysis, Version 2";
pub const COLORBAR_LABEL: &str = "Geopotential Height (m)";

/// Font sizes in points.
pub const TITLE_PT: f32 = 12.0;
pub const LABEL_PT: f32 = 10.0;

/// Strings drawn around the map for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapAnnotations {
    pub title: String,
    pub caption: String,
    pub colorbar_label: String,
}

impl MapAnnotations {
    pub fn for_date(date: &str) -> Self {
        Self {
            title: format!("{}{}", TITLE_PREFIX, date),
            caption: CAPTION.to_string(),
            colorbar_label: COLORBAR_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_includes_date() {
        let a = MapAnnotations::for_date("1900-02-16");
        assert_eq!(a.title, "500 mb Geopotential Heights : 1900-02-16");
        assert_eq!(a.caption, "Data: NOAA-CIRES 20th Century Reanalysis, Version 2");
        assert_eq!(a.colorbar_label, "Geopotential Height (m)");
    }
}
