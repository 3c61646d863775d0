//! Kepler's equation solver.
//!
//! Maps elapsed time on a closed orbit to focus-centered position and true
//! anomaly. Kepler's equation M = E - e sin(E) is solved for the eccentric
//! anomaly with Newton-Raphson, starting from E₀ = M.
//!
//! # Convergence
//! Iteration stops once two successive iterates differ by less than the
//! configured tolerance, or after `max_iterations` steps. In the second case
//! the last iterate is still used: [`KeplerSolution`] records which of the two
//! happened so tests and callers can assert on it, but the returned state is
//! the same either way.
//!
//! # Example
//! ```
//! use kepler_frames::elements::OrbitParameters;
//! use kepler_frames::kepler::solve;
//!
//! let params = OrbitParameters::new(0.7, 4.0, 8.0).unwrap();
//! let state = solve(0.0, &params);
//! assert!((state.x - 1.2).abs() < 1e-12);
//! assert_eq!(state.y, 0.0);
//! ```

use serde::{Deserialize, Serialize};
use crate::constants::*;
use crate::elements::{normalize_angle, OrbitParameters, OrbitalState};

/// Newton iteration settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Stop when |E_{n+1} - E_n| falls below this (rad).
    pub tolerance: f64,
    /// Hard cap on Newton steps.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: KEPLER_TOLERANCE,
            max_iterations: KEPLER_MAX_ITER,
        }
    }
}

/// Outcome of a Newton solve of Kepler's equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KeplerSolution {
    /// Successive iterates met the tolerance after `iterations` steps.
    Converged { eccentric_anomaly: f64, iterations: usize },
    /// The iteration cap was hit; holds the last iterate.
    MaxIterationsExceeded { eccentric_anomaly: f64 },
}

impl KeplerSolution {
    /// Best-effort eccentric anomaly, whether or not the iteration converged.
    pub fn eccentric_anomaly(&self) -> f64 {
        match *self {
            KeplerSolution::Converged { eccentric_anomaly, .. } => eccentric_anomaly,
            KeplerSolution::MaxIterationsExceeded { eccentric_anomaly } => eccentric_anomaly,
        }
    }

    /// True if successive iterates met the tolerance before the iteration cap.
    pub fn is_converged(&self) -> bool {
        matches!(self, KeplerSolution::Converged { .. })
    }
}

/// Solve Kepler's equation M = E - e sin(E) for eccentric anomaly.
pub fn solve_kepler(m: f64, e: f64, config: &SolverConfig) -> KeplerSolution {
    // Newton-Raphson iteration
    let mut ea = m;

    for iteration in 1..=config.max_iterations {
        let f = ea - e * ea.sin() - m;
        let fp = 1.0 - e * ea.cos();
        let ea_next = ea - f / fp;
        if (ea_next - ea).abs() < config.tolerance {
            return KeplerSolution::Converged {
                eccentric_anomaly: ea_next,
                iterations: iteration,
            };
        }
        ea = ea_next;
    }

    log::debug!(
        "Kepler iteration hit cap of {} steps (M={m}, e={e}), using last iterate E={ea}",
        config.max_iterations
    );
    KeplerSolution::MaxIterationsExceeded { eccentric_anomaly: ea }
}

/// True anomaly from eccentric anomaly, quadrant-safe.
///
/// θ = 2 atan2(sqrt(1+e) sin(E/2), sqrt(1-e) cos(E/2))
pub fn eccentric_to_true_anomaly(ea: f64, e: f64) -> f64 {
    2.0 * ((1.0 + e).sqrt() * (ea / 2.0).sin())
        .atan2((1.0 - e).sqrt() * (ea / 2.0).cos())
}

/// Mean anomaly implied by an eccentric anomaly (the forward Kepler equation).
pub fn eccentric_to_mean_anomaly(ea: f64, e: f64) -> f64 {
    ea - e * ea.sin()
}

/// Evaluates orbital state for a fixed orbit, one frame at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeplerSolver {
    pub params: OrbitParameters,
    pub config: SolverConfig,
}

impl KeplerSolver {
    pub fn new(params: OrbitParameters) -> Self {
        KeplerSolver {
            params,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Orbital state at elapsed time `t` (s).
    pub fn solve(&self, t: f64) -> OrbitalState {
        self.solve_detailed(t).0
    }

    /// Orbital state at `t` together with the Newton convergence outcome.
    pub fn solve_detailed(&self, t: f64) -> (OrbitalState, KeplerSolution) {
        let OrbitParameters { e, a, .. } = self.params;
        let b = self.params.semi_minor_axis();

        let m = self.params.mean_anomaly(t);
        let solution = solve_kepler(m, e, &self.config);
        let ea = solution.eccentric_anomaly();

        let state = OrbitalState {
            x: a * (ea.cos() - e),
            y: b * ea.sin(),
            true_anomaly: eccentric_to_true_anomaly(ea, e),
            eccentric_anomaly: ea,
            mean_anomaly: m,
        };
        (state, solution)
    }

    /// Focus-centered position at `t`.
    pub fn position_at(&self, t: f64) -> [f64; 2] {
        self.solve(t).position()
    }

    /// True anomaly at `t` (rad).
    pub fn true_anomaly_at(&self, t: f64) -> f64 {
        self.solve(t).true_anomaly
    }

    /// Closed outline of the orbit path, `n_points` samples of the eccentric
    /// anomaly over [0, 2π] (first and last points coincide).
    pub fn outline(&self, n_points: usize) -> Vec<[f64; 2]> {
        let a = self.params.a;
        let b = self.params.semi_minor_axis();
        let c = self.params.focal_distance();
        let denom = n_points.saturating_sub(1).max(1) as f64;

        (0..n_points)
            .map(|i| {
                let phi = TAU * i as f64 / denom;
                [a * phi.cos() - c, b * phi.sin()]
            })
            .collect()
    }
}

/// Orbital state at elapsed time `t` with the default solver settings.
pub fn solve(t: f64, params: &OrbitParameters) -> OrbitalState {
    KeplerSolver::new(*params).solve(t)
}

/// Normalized true anomaly in [0, 2π), for callers that compare angles across frames.
pub fn normalized_true_anomaly(state: &OrbitalState) -> f64 {
    normalize_angle(state.true_anomaly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_orbit() -> OrbitParameters {
        OrbitParameters::new(0.7, 4.0, 8.0).unwrap()
    }

    #[test]
    fn test_periapsis_at_epoch() {
        let (state, solution) = KeplerSolver::new(reference_orbit()).solve_detailed(0.0);

        assert!(solution.is_converged());
        assert_eq!(state.eccentric_anomaly, 0.0);
        assert_relative_eq!(state.x, 1.2, epsilon = 1e-12);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.true_anomaly, 0.0);
    }

    #[test]
    fn test_apoapsis_at_half_period() {
        let state = solve(4.0, &reference_orbit());
        assert_relative_eq!(state.x, -6.8, epsilon = 1e-9);
        assert!(state.y.abs() < 1e-9);
        assert_relative_eq!(state.true_anomaly, std::f64::consts::PI, epsilon = 1e-9);
    }

    #[test]
    fn test_positions_lie_on_ellipse() {
        for &e in &[0.0, 0.1, 0.3, 0.7, 0.9, 0.95] {
            let params = OrbitParameters::new(e, 2.5, 3.0).unwrap();
            let solver = KeplerSolver::new(params);
            let b = params.semi_minor_axis();
            let c = params.focal_distance();

            for i in 0..240 {
                let t = params.period * i as f64 / 240.0;
                let state = solver.solve(t);
                let lhs = ((state.x + c) / params.a).powi(2) + (state.y / b).powi(2);
                assert_relative_eq!(lhs, 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_kepler_equation_round_trip() {
        for &e in &[0.0, 0.2, 0.5, 0.8, 0.95] {
            let params = OrbitParameters::new(e, 1.0, 10.0).unwrap();
            let solver = KeplerSolver::new(params);

            for i in 0..100 {
                let t = 0.1 * i as f64;
                let (state, solution) = solver.solve_detailed(t);
                assert!(solution.is_converged(), "e={e}, t={t} did not converge");

                let m = eccentric_to_mean_anomaly(state.eccentric_anomaly, e);
                assert_relative_eq!(m, state.mean_anomaly, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_true_anomaly_matches_position() {
        let solver = KeplerSolver::new(reference_orbit());
        for i in 0..80 {
            let state = solver.solve(0.1 * i as f64);
            let r = solver.params.radius_at(state.true_anomaly);
            assert_relative_eq!(state.radius(), r, epsilon = 1e-9);
            assert_relative_eq!(state.x, r * state.true_anomaly.cos(), epsilon = 1e-9);
            assert_relative_eq!(state.y, r * state.true_anomaly.sin(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_periodic_in_period() {
        let params = reference_orbit();
        for &t in &[0.0, 0.37, 1.0, 2.5, 5.125, 7.9] {
            let s0 = solve(t, &params);
            let s1 = solve(t + params.period, &params);
            assert_relative_eq!(s0.x, s1.x, epsilon = 1e-9);
            assert_relative_eq!(s0.y, s1.y, epsilon = 1e-9);
            assert_relative_eq!(s0.true_anomaly, s1.true_anomaly, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_circular_orbit_constant_radius() {
        let params = OrbitParameters::new(0.0, 3.0, 5.0).unwrap();
        let solver = KeplerSolver::new(params);
        for i in 0..100 {
            let state = solver.solve(0.05 * i as f64);
            assert_relative_eq!(state.radius(), 3.0, epsilon = 1e-12);
            assert_relative_eq!(state.true_anomaly, state.mean_anomaly, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_true_anomaly_monotonic_over_period() {
        let params = OrbitParameters::new(0.9, 4.0, 8.0).unwrap();
        let solver = KeplerSolver::new(params);

        let mut previous = normalized_true_anomaly(&solver.solve(0.0));
        for i in 1..480 {
            let t = params.period * i as f64 / 480.0;
            let theta = normalized_true_anomaly(&solver.solve(t));
            assert!(theta > previous, "θ decreased at t={t}: {previous} -> {theta}");
            previous = theta;
        }
    }

    #[test]
    fn test_true_anomaly_leads_mean_anomaly() {
        // For 0 < M < π the body is past where uniform motion would put it
        let solution = solve_kepler(1.0, 0.5, &SolverConfig::default());
        let nu = eccentric_to_true_anomaly(solution.eccentric_anomaly(), 0.5);
        assert!(nu > 1.0);
    }

    #[test]
    fn test_iteration_cap_returns_last_iterate() {
        let capped = SolverConfig { tolerance: 1e-15, max_iterations: 1 };
        let solution = solve_kepler(1.0, 0.9, &capped);

        assert!(!solution.is_converged());
        let one_step = 1.0 - (1.0 - 0.9 * 1.0f64.sin() - 1.0) / (1.0 - 0.9 * 1.0f64.cos());
        assert_relative_eq!(solution.eccentric_anomaly(), one_step, epsilon = 1e-15);
    }

    #[test]
    fn test_capped_state_uses_best_effort_value() {
        let solver = KeplerSolver::new(reference_orbit())
            .with_config(SolverConfig { tolerance: 1e-8, max_iterations: 2 });
        let (state, solution) = solver.solve_detailed(1.3);
        assert!(!solution.is_converged());
        assert_eq!(state.eccentric_anomaly, solution.eccentric_anomaly());
    }

    #[test]
    fn test_outline_is_closed_and_on_ellipse() {
        let solver = KeplerSolver::new(reference_orbit());
        let outline = solver.outline(200);
        assert_eq!(outline.len(), 200);

        let first = outline[0];
        let last = outline[199];
        assert_relative_eq!(first[0], last[0], epsilon = 1e-12);
        assert_relative_eq!(first[1], last[1], epsilon = 1e-12);
        assert_relative_eq!(first[0], 1.2, epsilon = 1e-12);
    }
}
