//! Sprint burn-up history and velocity-based completion forecasts.
//!
//! The core (`normalize`, `origin`, `sprints`, `projection`, `burnup`) is pure
//! and takes "now" explicitly; `source`, `cli`, `params` and `render` form the
//! I/O boundary used by the binary.

pub mod burnup;
pub mod cli;
pub mod ext;
pub mod model;
pub mod normalize;
pub mod origin;
pub mod params;
pub mod projection;
pub mod render;
pub mod source;
pub mod sprints;
pub mod util;
