//! Physical and numerical constants shared by the animation kinematics.

/// Standard gravity used by the free-fall scenes (m/s²)
pub const G_STANDARD: f64 = 9.8;

/// Default animation frame rate (frames per second)
pub const DEFAULT_FPS: f64 = 60.0;

/// Convergence tolerance on successive eccentric anomaly iterates (rad)
pub const KEPLER_TOLERANCE: f64 = 1e-8;

/// Newton iteration cap for Kepler's equation
pub const KEPLER_MAX_ITER: usize = 100;

/// Two pi
pub const TAU: f64 = std::f64::consts::TAU;
