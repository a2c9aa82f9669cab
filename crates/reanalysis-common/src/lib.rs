//! Common types shared across the reanalysis map pipeline.
//!
//! The pipeline is `load -> prepare -> render`; each stage hands the next an
//! immutable value defined here.

pub mod dataset;
pub mod error;
pub mod time;

pub use dataset::{PreparedDataset, RawDataset, ScaledVariable, TimeAxis};
pub use error::{ReanalysisError, ReanalysisResult};
pub use time::{TimeUnit, TimeUnits};
