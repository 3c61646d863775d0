//! # kepler-frames
//!
//! Per-frame kinematics for physics teaching animations.
//!
//! Computes the numeric time series an animation driver renders: Kepler
//! orbit positions (Newton-Raphson on Kepler's equation), area-sweep sectors
//! for the equal-areas law, free-fall energy bars and Lagrangians, and elastic collision
//! momenta. Rendering and video encoding are left to the caller.

pub mod constants;
pub mod elements;
pub mod kepler;
pub mod sweep;
pub mod timeline;
pub mod freefall;
pub mod collision;
pub mod scene;

#[cfg(feature = "python")]
mod pybridge;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn kepler_frames(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pybridge::register(m)?;
    Ok(())
}
