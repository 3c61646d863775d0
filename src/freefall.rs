//! Free-fall kinematics and energy bookkeeping.
//!
//! A body released from rest at height h0 falls as h = h0 - g t²/2. Once it
//! reaches the ground it stays there; its reported speed is then the impact
//! speed sqrt(2 g h0), so the kinetic energy bar stays full after landing.
//!
//! The Lagrangian L = T - V runs from -m g h0 at release to +m g h0 at
//! impact. Dropping a second body later gives the same curve shifted in time,
//! which is what the time-shift scene shows.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::constants::G_STANDARD;
use crate::timeline::FrameTimeline;

/// Time the time-shift scene keeps running after the second impact (s).
const TIME_SHIFT_TAIL: f64 = 0.5;

/// Free-fall parameter validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FreeFallError {
    #[error("Gravity must be finite and positive, got {0}")]
    InvalidGravity(f64),

    #[error("Release height must be finite and non-negative, got {0}")]
    InvalidHeight(f64),

    #[error("Mass must be finite and positive, got {0}")]
    InvalidMass(f64),

    #[error("Release delay must be finite and non-negative, got {0}")]
    InvalidDelay(f64),
}

/// A body dropped from rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeFall {
    /// Release height (m)
    pub h0: f64,
    /// Gravitational acceleration (m/s²)
    pub g: f64,
    /// Mass (kg). Cancels out of the motion, only scales the energies.
    pub mass: f64,
}

/// Kinematic and energy state at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallState {
    /// Height above ground (m)
    pub height: f64,
    /// Downward speed (m/s)
    pub speed: f64,
    /// Potential energy m g h (J)
    pub potential: f64,
    /// Kinetic energy m v² / 2 (J)
    pub kinetic: f64,
}

impl Default for FreeFall {
    fn default() -> Self {
        FreeFall {
            h0: 10.0,
            g: G_STANDARD,
            mass: 1.0,
        }
    }
}

impl FreeFall {
    /// Drop from `h0` under standard gravity with unit mass.
    pub fn from_height(h0: f64) -> Self {
        FreeFall { h0, ..Default::default() }
    }

    pub fn validate(&self) -> Result<(), FreeFallError> {
        if !self.g.is_finite() || self.g <= 0.0 {
            return Err(FreeFallError::InvalidGravity(self.g));
        }
        if !self.h0.is_finite() || self.h0 < 0.0 {
            return Err(FreeFallError::InvalidHeight(self.h0));
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(FreeFallError::InvalidMass(self.mass));
        }
        Ok(())
    }

    /// Time to reach the ground, sqrt(2 h0 / g).
    pub fn fall_time(&self) -> f64 {
        (2.0 * self.h0 / self.g).sqrt()
    }

    /// Speed at the ground, sqrt(2 g h0).
    pub fn impact_speed(&self) -> f64 {
        (2.0 * self.g * self.h0).sqrt()
    }

    /// Total mechanical energy m g h0 (conserved).
    pub fn total_energy(&self) -> f64 {
        self.mass * self.g * self.h0
    }

    /// State at elapsed time `t` after release.
    pub fn state_at(&self, t: f64) -> FallState {
        let mut height = self.h0 - 0.5 * self.g * t.powi(2);
        let mut speed = self.g * t;

        if height < 0.0 {
            height = 0.0;
            speed = self.impact_speed();
        }

        FallState {
            height,
            speed,
            potential: self.mass * self.g * height,
            kinetic: 0.5 * self.mass * speed.powi(2),
        }
    }

    /// State of a body released at `t_release`, observed at time `t`.
    ///
    /// None before release. After impact the body is held at its landing
    /// state.
    pub fn state_since(&self, t: f64, t_release: f64) -> Option<FallState> {
        let tau = t - t_release;
        if tau < 0.0 {
            return None;
        }
        Some(self.state_at(tau.min(self.fall_time())))
    }

    /// Lagrangian L = T - V at elapsed time `t` after release.
    pub fn lagrangian(&self, t: f64) -> f64 {
        self.state_at(t).lagrangian()
    }

    /// Lagrangian of a body released at `t_release`, None before release.
    pub fn lagrangian_since(&self, t: f64, t_release: f64) -> Option<f64> {
        self.state_since(t, t_release).map(|state| state.lagrangian())
    }

    /// Potential and kinetic energy as fractions of the total, (U/E, K/E).
    ///
    /// Both are zero for a body released at ground level.
    pub fn energy_fractions(&self, t: f64) -> (f64, f64) {
        let total = self.total_energy();
        if total <= 0.0 {
            return (0.0, 0.0);
        }
        let state = self.state_at(t);
        (state.potential / total, state.kinetic / total)
    }
}

impl FallState {
    /// L = T - V.
    pub fn lagrangian(&self) -> f64 {
        self.kinetic - self.potential
    }

    /// T + V.
    pub fn energy(&self) -> f64 {
        self.kinetic + self.potential
    }
}

/// Two identical drops, the second released `delay` seconds after the first lands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeShift {
    pub fall: FreeFall,
    /// Wait between the first impact and the second release (s).
    pub delay: f64,
}

impl Default for TimeShift {
    fn default() -> Self {
        TimeShift {
            fall: FreeFall::default(),
            delay: 1.0,
        }
    }
}

impl TimeShift {
    pub fn validate(&self) -> Result<(), FreeFallError> {
        self.fall.validate()?;
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(FreeFallError::InvalidDelay(self.delay));
        }
        Ok(())
    }

    /// Release time of the second body.
    pub fn second_release(&self) -> f64 {
        self.fall.fall_time() + self.delay
    }

    /// Scene length: both drops plus a short tail after the second impact.
    pub fn total_duration(&self) -> f64 {
        self.second_release() + self.fall.fall_time() + TIME_SHIFT_TAIL
    }

    /// States of the first and second body at scene time `t`.
    pub fn states_at(&self, t: f64) -> (Option<FallState>, Option<FallState>) {
        (
            self.fall.state_since(t, 0.0),
            self.fall.state_since(t, self.second_release()),
        )
    }

    /// Lagrangians of the first and second body at scene time `t`.
    pub fn lagrangians_at(&self, t: f64) -> (Option<f64>, Option<f64>) {
        let (first, second) = self.states_at(t);
        (first.map(|s| s.lagrangian()), second.map(|s| s.lagrangian()))
    }

    pub fn timeline(&self, fps: f64) -> FrameTimeline {
        FrameTimeline::new(self.total_duration(), fps)
    }
}
