//! Python bindings via PyO3, so plotting scripts can pull frame data directly.
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::collision::ElasticCollision;
use crate::elements::OrbitParameters;
use crate::freefall::{FreeFall, TimeShift};
use crate::kepler::{KeplerSolver, SolverConfig};
use crate::scene::SceneConfig;
use crate::sweep::{self, SweepSchedule};
use crate::timeline::{self, FrameTimeline};

fn value_error<E: ToString>(err: E) -> PyErr {
    PyValueError::new_err(err.to_string())
}

// Kepler orbit
#[pyclass(name = "KeplerOrbit")]
#[derive(Clone)]
pub struct PyKeplerOrbit {
    pub(crate) inner: KeplerSolver,
}

#[pymethods]
impl PyKeplerOrbit {
    #[new]
    #[pyo3(signature = (e, a, period, tolerance=1e-8, max_iterations=100))]
    fn new(e: f64, a: f64, period: f64, tolerance: f64, max_iterations: usize) -> PyResult<Self> {
        let params = OrbitParameters::new(e, a, period).map_err(value_error)?;
        let config = SolverConfig { tolerance, max_iterations };
        Ok(PyKeplerOrbit { inner: KeplerSolver::new(params).with_config(config) })
    }

    /// State at time t as (x, y, true_anomaly).
    fn solve(&self, t: f64) -> (f64, f64, f64) {
        let s = self.inner.solve(t);
        (s.x, s.y, s.true_anomaly)
    }

    /// Whether the Newton iteration converged at time t.
    fn converged(&self, t: f64) -> bool {
        self.inner.solve_detailed(t).1.is_converged()
    }

    /// Positions [[x, y], ...] at every frame of one period.
    #[pyo3(signature = (fps=60.0))]
    fn track(&self, fps: f64) -> PyResult<Vec<[f64; 2]>> {
        let timeline = FrameTimeline::new(self.inner.params.period, fps);
        timeline.validate().map_err(value_error)?;
        Ok(timeline::sample_orbit_par(&self.inner, &timeline)
            .iter()
            .map(|s| s.state.position())
            .collect())
    }

    /// Orbit outline for drawing the path.
    #[pyo3(signature = (n_points=200))]
    fn outline(&self, n_points: usize) -> Vec<[f64; 2]> {
        self.inner.outline(n_points)
    }

    /// Fan polygon swept between t_start and t_end.
    #[pyo3(signature = (t_start, t_end, n_points=50))]
    fn sector_polygon(&self, t_start: f64, t_end: f64, n_points: usize) -> Vec<[f64; 2]> {
        sweep::sector_polygon(&self.inner, t_start, t_end, n_points)
    }

    /// Sectors visible at time t: {"completed": [(index, t0, t1), ...], "growing": (index, t0, t1) | None}.
    #[pyo3(signature = (t, interval=1.0))]
    fn sweep_frame<'py>(&self, py: Python<'py>, t: f64, interval: f64) -> PyResult<Bound<'py, PyDict>> {
        let schedule = SweepSchedule::new(interval, SweepSchedule::default().min_growth)
            .map_err(value_error)?;
        let frame = schedule.frame(t);

        let dict = PyDict::new_bound(py);
        let completed: Vec<(usize, f64, f64)> = frame
            .completed
            .iter()
            .map(|s| (s.index, s.t_start, s.t_end))
            .collect();
        dict.set_item("completed", completed)?;
        dict.set_item("growing", frame.growing.map(|s| (s.index, s.t_start, s.t_end)))?;
        Ok(dict)
    }

    #[getter] fn e(&self) -> f64 { self.inner.params.e }
    #[getter] fn a(&self) -> f64 { self.inner.params.a }
    #[getter] fn b(&self) -> f64 { self.inner.params.semi_minor_axis() }
    #[getter] fn c(&self) -> f64 { self.inner.params.focal_distance() }
    #[getter] fn period(&self) -> f64 { self.inner.params.period }
    #[getter] fn areal_velocity(&self) -> f64 { self.inner.params.areal_velocity() }

    fn __repr__(&self) -> String {
        format!(
            "KeplerOrbit(e={:.4}, a={:.4}, period={:.4} s)",
            self.inner.params.e, self.inner.params.a, self.inner.params.period,
        )
    }
}

// Free fall
#[pyclass(name = "FreeFall")]
#[derive(Clone)]
pub struct PyFreeFall {
    inner: FreeFall,
}

#[pymethods]
impl PyFreeFall {
    #[new]
    #[pyo3(signature = (h0, g=9.8, mass=1.0))]
    fn new(h0: f64, g: f64, mass: f64) -> PyResult<Self> {
        let inner = FreeFall { h0, g, mass };
        inner.validate().map_err(value_error)?;
        Ok(PyFreeFall { inner })
    }

    fn fall_time(&self) -> f64 { self.inner.fall_time() }

    fn total_energy(&self) -> f64 { self.inner.total_energy() }

    /// (height, speed, potential, kinetic) at time t.
    fn state_at(&self, t: f64) -> (f64, f64, f64, f64) {
        let s = self.inner.state_at(t);
        (s.height, s.speed, s.potential, s.kinetic)
    }

    fn energy_fractions(&self, t: f64) -> (f64, f64) {
        self.inner.energy_fractions(t)
    }

    /// L = T - V at time t after release.
    fn lagrangian(&self, t: f64) -> f64 {
        self.inner.lagrangian(t)
    }

    /// State of a body released at t_release, or None before release.
    fn state_since(&self, t: f64, t_release: f64) -> Option<(f64, f64, f64, f64)> {
        self.inner
            .state_since(t, t_release)
            .map(|s| (s.height, s.speed, s.potential, s.kinetic))
    }

    fn lagrangian_since(&self, t: f64, t_release: f64) -> Option<f64> {
        self.inner.lagrangian_since(t, t_release)
    }
}

// Time shift
#[pyclass(name = "TimeShift")]
#[derive(Clone)]
pub struct PyTimeShift {
    inner: TimeShift,
}

#[pymethods]
impl PyTimeShift {
    #[new]
    #[pyo3(signature = (h0=10.0, delay=1.0, g=9.8, mass=1.0))]
    fn new(h0: f64, delay: f64, g: f64, mass: f64) -> PyResult<Self> {
        let inner = TimeShift { fall: FreeFall { h0, g, mass }, delay };
        inner.validate().map_err(value_error)?;
        Ok(PyTimeShift { inner })
    }

    fn second_release(&self) -> f64 { self.inner.second_release() }

    fn total_duration(&self) -> f64 { self.inner.total_duration() }

    /// Lagrangians (first, second) at scene time t; None for a body not yet released.
    fn lagrangians_at(&self, t: f64) -> (Option<f64>, Option<f64>) {
        self.inner.lagrangians_at(t)
    }

    /// Heights (first, second) at scene time t.
    fn heights_at(&self, t: f64) -> (Option<f64>, Option<f64>) {
        let (first, second) = self.inner.states_at(t);
        (first.map(|s| s.height), second.map(|s| s.height))
    }
}

// Elastic collision
#[pyclass(name = "ElasticCollision")]
#[derive(Clone)]
pub struct PyElasticCollision {
    inner: ElasticCollision,
}

#[pymethods]
impl PyElasticCollision {
    #[new]
    #[pyo3(signature = (x_a, x_b, v_a, v_b=0.0, mass_a=1.0, mass_b=1.0))]
    fn new(x_a: f64, x_b: f64, v_a: f64, v_b: f64, mass_a: f64, mass_b: f64) -> PyResult<Self> {
        let inner = ElasticCollision { mass_a, mass_b, x_a, x_b, v_a, v_b };
        inner.validate().map_err(value_error)?;
        Ok(PyElasticCollision { inner })
    }

    fn collision_time(&self) -> Option<f64> { self.inner.collision_time() }

    /// (x_a, x_b, v_a, v_b) at time t.
    fn state_at(&self, t: f64) -> (f64, f64, f64, f64) {
        let s = self.inner.state_at(t);
        (s.x_a, s.x_b, s.v_a, s.v_b)
    }

    fn momentum_at(&self, t: f64) -> (f64, f64) { self.inner.momentum_at(t) }

    fn total_momentum(&self) -> f64 { self.inner.total_momentum() }
}

// Free functions
#[pyfunction]
#[pyo3(signature = (duration, fps=60.0))]
fn frame_times(duration: f64, fps: f64) -> PyResult<Vec<f64>> {
    let timeline = FrameTimeline::new(duration, fps);
    timeline.validate().map_err(value_error)?;
    Ok(timeline.times())
}

/// Load a scene config JSON and return the orbit it describes.
#[pyfunction]
fn load_orbit(path: &str) -> PyResult<PyKeplerOrbit> {
    let config = SceneConfig::load_from_file(path).map_err(value_error)?;
    Ok(PyKeplerOrbit { inner: config.kepler_solver() })
}

// Module registration
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyKeplerOrbit>()?;
    m.add_class::<PyFreeFall>()?;
    m.add_class::<PyTimeShift>()?;
    m.add_class::<PyElasticCollision>()?;
    m.add_function(wrap_pyfunction!(frame_times, m)?)?;
    m.add_function(wrap_pyfunction!(load_orbit, m)?)?;
    Ok(())
}
