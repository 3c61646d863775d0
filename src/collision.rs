//! Head-on elastic collision of two point bodies on a line.
//!
//! Bodies move at constant velocity until they meet, then leave the contact
//! point with the velocities fixed by conservation of momentum and kinetic
//! energy:
//!   v_a' = ((m_a - m_b) v_a + 2 m_b v_b) / (m_a + m_b)
//!   v_b' = ((m_b - m_a) v_b + 2 m_a v_a) / (m_a + m_b)
//! Equal masses simply exchange velocities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Collision setup validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    #[error("Mass of body {body} must be finite and positive, got {mass}")]
    InvalidMass { body: char, mass: f64 },

    #[error("Initial {field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Initial conditions for a 1-D two-body collision. Body A starts on the left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticCollision {
    pub mass_a: f64,
    pub mass_b: f64,
    /// Initial position of A
    pub x_a: f64,
    /// Initial position of B
    pub x_b: f64,
    /// Initial velocity of A (positive = rightward)
    pub v_a: f64,
    /// Initial velocity of B
    pub v_b: f64,
}

/// Positions and velocities at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionState {
    pub x_a: f64,
    pub x_b: f64,
    pub v_a: f64,
    pub v_b: f64,
}

impl Default for ElasticCollision {
    fn default() -> Self {
        ElasticCollision {
            mass_a: 1.0,
            mass_b: 1.0,
            x_a: 2.0,
            x_b: 8.0,
            v_a: 3.0,
            v_b: 0.0,
        }
    }
}

impl ElasticCollision {
    /// Check masses are positive and every initial condition is finite.
    pub fn validate(&self) -> Result<(), CollisionError> {
        for (body, mass) in [('A', self.mass_a), ('B', self.mass_b)] {
            if !mass.is_finite() || mass <= 0.0 {
                return Err(CollisionError::InvalidMass { body, mass });
            }
        }
        let fields = [("x_a", self.x_a), ("x_b", self.x_b), ("v_a", self.v_a), ("v_b", self.v_b)];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(CollisionError::NonFinite { field, value });
            }
        }
        Ok(())
    }

    /// Time at which the bodies meet. None if they never close on each other.
    pub fn collision_time(&self) -> Option<f64> {
        let closing_speed = self.v_a - self.v_b;
        if closing_speed <= 0.0 {
            return None;
        }
        let t = (self.x_b - self.x_a) / closing_speed;
        (t >= 0.0).then_some(t)
    }

    /// Contact point. None if the bodies never meet.
    pub fn collision_point(&self) -> Option<f64> {
        self.collision_time().map(|t| self.x_a + self.v_a * t)
    }

    /// Velocities (A, B) after the collision.
    pub fn final_velocities(&self) -> (f64, f64) {
        let (ma, mb) = (self.mass_a, self.mass_b);
        let total = ma + mb;
        let va = ((ma - mb) * self.v_a + 2.0 * mb * self.v_b) / total;
        let vb = ((mb - ma) * self.v_b + 2.0 * ma * self.v_a) / total;
        (va, vb)
    }

    /// State at elapsed time `t`.
    pub fn state_at(&self, t: f64) -> CollisionState {
        match (self.collision_time(), self.collision_point()) {
            (Some(t_c), Some(x_c)) if t >= t_c => {
                let (va, vb) = self.final_velocities();
                let dt = t - t_c;
                CollisionState {
                    x_a: x_c + va * dt,
                    x_b: x_c + vb * dt,
                    v_a: va,
                    v_b: vb,
                }
            }
            _ => CollisionState {
                x_a: self.x_a + self.v_a * t,
                x_b: self.x_b + self.v_b * t,
                v_a: self.v_a,
                v_b: self.v_b,
            },
        }
    }

    /// Total momentum (conserved).
    pub fn total_momentum(&self) -> f64 {
        self.mass_a * self.v_a + self.mass_b * self.v_b
    }

    /// Individual momenta (p_a, p_b) at time `t`.
    pub fn momentum_at(&self, t: f64) -> (f64, f64) {
        let state = self.state_at(t);
        (self.mass_a * state.v_a, self.mass_b * state.v_b)
    }

    /// Total kinetic energy at time `t`.
    pub fn kinetic_energy_at(&self, t: f64) -> f64 {
        let state = self.state_at(t);
        0.5 * self.mass_a * state.v_a.powi(2) + 0.5 * self.mass_b * state.v_b.powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equal_masses_exchange_velocities() {
        let collision = ElasticCollision::default();
        assert_eq!(collision.collision_time(), Some(2.0));
        assert_eq!(collision.collision_point(), Some(8.0));
        assert_eq!(collision.final_velocities(), (0.0, 3.0));
    }

    #[test]
    fn test_piecewise_motion() {
        let collision = ElasticCollision::default();

        let before = collision.state_at(1.0);
        assert_eq!(before.x_a, 5.0);
        assert_eq!(before.x_b, 8.0);

        let after = collision.state_at(3.0);
        assert_eq!(after.x_a, 8.0);
        assert_eq!(after.x_b, 11.0);
        assert_eq!(after.v_a, 0.0);
        assert_eq!(after.v_b, 3.0);
    }

    #[test]
    fn test_momentum_and_energy_conserved_unequal_masses() {
        let collision = ElasticCollision {
            mass_a: 2.0,
            mass_b: 0.5,
            x_a: 0.0,
            x_b: 4.0,
            v_a: 1.5,
            v_b: -1.0,
        };
        let p0 = collision.total_momentum();
        let ke0 = collision.kinetic_energy_at(0.0);

        for &t in &[0.5, 1.6, 2.0, 5.0] {
            let (pa, pb) = collision.momentum_at(t);
            assert_relative_eq!(pa + pb, p0, epsilon = 1e-12);
            assert_relative_eq!(collision.kinetic_energy_at(t), ke0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_separating_bodies_never_collide() {
        let collision = ElasticCollision { v_a: -1.0, ..Default::default() };
        assert_eq!(collision.collision_time(), None);

        let state = collision.state_at(10.0);
        assert_eq!(state.x_a, -8.0);
        assert_eq!(state.v_a, -1.0);
    }

    #[test]
    fn test_validate() {
        assert!(ElasticCollision::default().validate().is_ok());
        assert_eq!(
            ElasticCollision { mass_b: 0.0, ..Default::default() }.validate(),
            Err(CollisionError::InvalidMass { body: 'B', mass: 0.0 })
        );
        assert!(matches!(
            ElasticCollision { x_b: f64::INFINITY, ..Default::default() }.validate(),
            Err(CollisionError::NonFinite { field: "x_b", .. })
        ));
    }
}
