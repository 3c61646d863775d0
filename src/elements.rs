//! Orbit shape parameters and per-frame orbital state.
//!
//! The orbit lives in its own plane with the occupied focus at the origin
//! and periapsis on the +x axis:
//!   x = a (cos E - e),  y = b sin E
//! where E is the eccentric anomaly and b = a sqrt(1 - e²).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::constants::*;

/// Orbit parameter validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    #[error("Eccentricity must be in [0, 1), got {0}")]
    InvalidEccentricity(f64),

    #[error("Semi-major axis must be finite and positive, got {0}")]
    InvalidSemiMajorAxis(f64),

    #[error("Period must be finite and positive, got {0}")]
    InvalidPeriod(f64),
}

/// Shape and timing of a closed Kepler ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParameters {
    /// Eccentricity (dimensionless, 0 = circle)
    pub e: f64,
    /// Semi-major axis (scene length units)
    pub a: f64,
    /// Orbital period (s)
    pub period: f64,
}

/// Position and anomalies at one instant, relative to the occupied focus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalState {
    /// Position along the apse line (same units as a)
    pub x: f64,
    /// Position perpendicular to the apse line
    pub y: f64,
    /// True anomaly θ (rad)
    pub true_anomaly: f64,
    /// Eccentric anomaly E (rad)
    pub eccentric_anomaly: f64,
    /// Mean anomaly M (rad), reduced to [0, 2π)
    pub mean_anomaly: f64,
}

impl OrbitParameters {
    /// Create validated parameters. Parabolic and hyperbolic orbits are rejected.
    pub fn new(e: f64, a: f64, period: f64) -> Result<Self, OrbitError> {
        let params = Self { e, a, period };
        params.validate()?;
        Ok(params)
    }

    /// Check that the parameters describe a closed, non-degenerate ellipse.
    pub fn validate(&self) -> Result<(), OrbitError> {
        if !(0.0..1.0).contains(&self.e) {
            return Err(OrbitError::InvalidEccentricity(self.e));
        }
        if !self.a.is_finite() || self.a <= 0.0 {
            return Err(OrbitError::InvalidSemiMajorAxis(self.a));
        }
        if !self.period.is_finite() || self.period <= 0.0 {
            return Err(OrbitError::InvalidPeriod(self.period));
        }
        Ok(())
    }

    /// Semi-minor axis b = a sqrt(1 - e²).
    pub fn semi_minor_axis(&self) -> f64 {
        self.a * (1.0 - self.e.powi(2)).sqrt()
    }

    /// Distance from the ellipse center to either focus, c = a e.
    pub fn focal_distance(&self) -> f64 {
        self.a * self.e
    }

    /// Closest distance to the occupied focus.
    pub fn periapsis(&self) -> f64 {
        self.a * (1.0 - self.e)
    }

    /// Farthest distance from the occupied focus.
    pub fn apoapsis(&self) -> f64 {
        self.a * (1.0 + self.e)
    }

    /// Semi-latus rectum p = a (1 - e²).
    pub fn semi_latus_rectum(&self) -> f64 {
        self.a * (1.0 - self.e.powi(2))
    }

    /// Mean motion (rad/s).
    pub fn mean_motion(&self) -> f64 {
        TAU / self.period
    }

    /// Mean anomaly M = 2π t / T, with t first reduced modulo the period.
    pub fn mean_anomaly(&self, t: f64) -> f64 {
        let t_orbit = t.rem_euclid(self.period);
        normalize_angle(self.mean_motion() * t_orbit)
    }

    /// Area enclosed by the ellipse, π a b.
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.a * self.semi_minor_axis()
    }

    /// Area swept per unit time by the focus-to-body radius (constant, L / 2m).
    pub fn areal_velocity(&self) -> f64 {
        self.area() / self.period
    }

    /// Focal distance at true anomaly θ: r = p / (1 + e cos θ).
    pub fn radius_at(&self, true_anomaly: f64) -> f64 {
        self.semi_latus_rectum() / (1.0 + self.e * true_anomaly.cos())
    }
}

impl OrbitalState {
    /// Distance from the occupied focus.
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Position as a point pair, ready for a polyline.
    pub fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Normalize angle to [0, 2π).
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 { a + TAU } else { a }
}
