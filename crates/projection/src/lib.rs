//! Map projection for globe views.
//!
//! Implements the spherical orthographic projection from scratch, plus the
//! graticule and limb geometry drawn on top of it.

pub mod graticule;
pub mod orthographic;

pub use graticule::Graticule;
pub use orthographic::{Orthographic, EARTH_RADIUS_M};
