//! Map rendering for reanalysis height fields.
//!
//! Draws one day of a [`PreparedDataset`](reanalysis_common::PreparedDataset)
//! as filled contour bands on an orthographic globe:
//! - Filled bands (inverse-projected raster, RdYlBu_r)
//! - Graticule, coastlines and limb (tiny-skia strokes)
//! - Colour bar, title and caption
//! - PNG output with DPI metadata

pub mod annotations;
pub mod canvas;
pub mod coastline;
pub mod colorbar;
pub mod colormap;
pub mod fill;
pub mod layout;
pub mod levels;
pub mod overlay;
pub mod png;
pub mod render;
pub mod sampler;
pub mod text;

pub use annotations::MapAnnotations;
pub use levels::ContourLevels;
pub use render::{
    render, render_png, OutputTarget, RenderOptions, RenderOutcome, RenderRequest,
    DEFAULT_DAY_INDEX,
};
