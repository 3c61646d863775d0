//! Area-sweep geometry for Kepler's second law.
//!
//! The focus-to-body radius sweeps equal areas in equal times. A sweep is
//! drawn as a fan polygon anchored at the occupied focus; the schedule splits
//! elapsed time into fixed intervals so each interval's sector can be shown
//! once complete, next to the sector still growing in the current interval.
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::elements::OrbitParameters;
use crate::kepler::KeplerSolver;

/// Most sectors a single frame will report.
pub const MAX_SECTORS: usize = 1 << 20;

/// Sweep schedule validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("Sweep interval must be finite and positive, got {0}")]
    InvalidInterval(f64),

    #[error("Minimum growth must be finite and non-negative, got {0}")]
    InvalidMinGrowth(f64),
}

/// One swept interval of the orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Interval number (0 for the first interval after t = 0).
    pub index: usize,
    /// Start of the interval (s).
    pub t_start: f64,
    /// End of the interval (s). Equal to the current time for a growing sector.
    pub t_end: f64,
}

/// Interval layout for sector bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSchedule {
    /// Length of each sector in time (s).
    pub interval: f64,
    /// A growing sector is hidden until it is at least this old (s).
    pub min_growth: f64,
}

/// Sectors visible at one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepFrame {
    /// Fully swept intervals, oldest first.
    pub completed: Vec<Sector>,
    /// Partial sector of the current interval, if old enough to show.
    pub growing: Option<Sector>,
}

impl Sector {
    /// Duration of the sector (s).
    pub fn duration(&self) -> f64 {
        self.t_end - self.t_start
    }

    /// Color slot for cycling through a palette of `n_colors` entries.
    pub fn palette_index(&self, n_colors: usize) -> usize {
        if n_colors == 0 { 0 } else { self.index % n_colors }
    }

    /// Fan polygon for this sector.
    pub fn polygon(&self, solver: &KeplerSolver, n_points: usize) -> Vec<[f64; 2]> {
        sector_polygon(solver, self.t_start, self.t_end, n_points)
    }
}

impl Default for SweepSchedule {
    fn default() -> Self {
        SweepSchedule {
            interval: 1.0,
            min_growth: 0.01,
        }
    }
}

impl SweepSchedule {
    /// Validated schedule.
    pub fn new(interval: f64, min_growth: f64) -> Result<Self, SweepError> {
        let schedule = SweepSchedule { interval, min_growth };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err(SweepError::InvalidInterval(self.interval));
        }
        if !self.min_growth.is_finite() || self.min_growth < 0.0 {
            return Err(SweepError::InvalidMinGrowth(self.min_growth));
        }
        Ok(())
    }

    /// Number of whole intervals that fit in `duration`, capped at [`MAX_SECTORS`].
    ///
    /// Zero for an invalid interval or a non-finite duration.
    pub fn sector_count(&self, duration: f64) -> usize {
        if self.validate().is_err() || !duration.is_finite() {
            return 0;
        }
        let count = (duration / self.interval).floor();
        if count <= 0.0 {
            return 0;
        }
        count.min(MAX_SECTORS as f64) as usize
    }

    /// Sector bookkeeping at elapsed time `t`.
    ///
    /// An invalid schedule reports no sectors at all.
    pub fn frame(&self, t: f64) -> SweepFrame {
        if self.validate().is_err() || !t.is_finite() {
            return SweepFrame { completed: Vec::new(), growing: None };
        }

        let current = self.sector_count(t);
        let current_start = current as f64 * self.interval;

        let completed = (0..current)
            .map(|index| Sector {
                index,
                t_start: index as f64 * self.interval,
                t_end: (index + 1) as f64 * self.interval,
            })
            .collect();

        let growing = (t - current_start > self.min_growth).then_some(Sector {
            index: current,
            t_start: current_start,
            t_end: t,
        });

        SweepFrame { completed, growing }
    }
}

/// Fan polygon swept between `t_start` and `t_end`.
///
/// Starts at the focus, visits `n_points` orbit positions evenly spaced in
/// time (both endpoints included), and closes back at the focus.
pub fn sector_polygon(
    solver: &KeplerSolver,
    t_start: f64,
    t_end: f64,
    n_points: usize,
) -> Vec<[f64; 2]> {
    let mut points = Vec::with_capacity(n_points + 2);
    points.push([0.0, 0.0]);

    let denom = n_points.saturating_sub(1).max(1) as f64;
    for i in 0..n_points {
        let t = t_start + (t_end - t_start) * i as f64 / denom;
        points.push(solver.position_at(t));
    }

    points.push([0.0, 0.0]);
    points
}

/// Area of a simple polygon (shoelace formula). Orientation is ignored.
pub fn polygon_area(points: &[[f64; 2]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p[0] * q[1] - q[0] * p[1])
        .sum();
    twice_area.abs() / 2.0
}

/// Exact area swept between two times no more than one period apart.
///
/// dA/dt = π a b / T is constant, so the area is linear in elapsed time.
pub fn swept_area(params: &OrbitParameters, t_start: f64, t_end: f64) -> f64 {
    params.areal_velocity() * (t_end - t_start).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_solver() -> KeplerSolver {
        KeplerSolver::new(OrbitParameters::new(0.7, 4.0, 8.0).unwrap())
    }

    #[test]
    fn test_polygon_anchored_at_focus() {
        let solver = reference_solver();
        let poly = sector_polygon(&solver, 0.0, 1.0, 50);

        assert_eq!(poly.len(), 52);
        assert_eq!(poly[0], [0.0, 0.0]);
        assert_eq!(poly[51], [0.0, 0.0]);
        assert_relative_eq!(poly[1][0], 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_equal_areas_in_equal_times() {
        let solver = reference_solver();
        let expected = swept_area(&solver.params, 0.0, 1.0);

        for k in 0..8 {
            let t0 = k as f64;
            let poly = sector_polygon(&solver, t0, t0 + 1.0, 200);
            let area = polygon_area(&poly);
            assert_relative_eq!(area, expected, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_full_period_sweeps_ellipse_area() {
        let solver = reference_solver();
        let area: f64 = (0..8)
            .map(|k| polygon_area(&sector_polygon(&solver, k as f64, k as f64 + 1.0, 200)))
            .sum();
        assert_relative_eq!(area, solver.params.area(), max_relative = 1e-3);
    }

    #[test]
    fn test_polygon_area_unit_square() {
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert_relative_eq!(polygon_area(&square), 1.0, epsilon = 1e-15);
        assert_eq!(polygon_area(&square[..2]), 0.0);
    }

    #[test]
    fn test_schedule_mid_interval() {
        let schedule = SweepSchedule::default();
        let frame = schedule.frame(3.5);

        assert_eq!(frame.completed.len(), 3);
        assert_eq!(frame.completed[2].t_start, 2.0);
        assert_eq!(frame.completed[2].t_end, 3.0);

        let growing = frame.growing.unwrap();
        assert_eq!(growing.index, 3);
        assert_eq!(growing.t_start, 3.0);
        assert_eq!(growing.t_end, 3.5);
    }

    #[test]
    fn test_schedule_hides_fresh_sector() {
        let schedule = SweepSchedule::default();

        let frame = schedule.frame(0.0);
        assert!(frame.completed.is_empty());
        assert!(frame.growing.is_none());

        let frame = schedule.frame(2.005);
        assert_eq!(frame.completed.len(), 2);
        assert!(frame.growing.is_none());
    }

    #[test]
    fn test_schedule_at_end_of_period() {
        let frame = SweepSchedule::default().frame(8.0);
        assert_eq!(frame.completed.len(), 8);
        assert!(frame.growing.is_none());
    }

    #[test]
    fn test_degenerate_interval_reports_nothing() {
        let zero = SweepSchedule { interval: 0.0, min_growth: 0.01 };
        assert_eq!(zero.validate(), Err(SweepError::InvalidInterval(0.0)));
        assert_eq!(zero.sector_count(3.5), 0);

        let frame = zero.frame(3.5);
        assert!(frame.completed.is_empty());
        assert!(frame.growing.is_none());

        assert!(SweepSchedule::new(f64::NAN, 0.01).is_err());
        assert!(SweepSchedule::new(1.0, -1.0).is_err());
        assert_eq!(SweepSchedule::new(1.0, 0.01), Ok(SweepSchedule::default()));
    }

    #[test]
    fn test_sector_count_is_bounded() {
        let schedule = SweepSchedule::default();
        assert_eq!(schedule.sector_count(1e300), MAX_SECTORS);
        assert_eq!(schedule.sector_count(f64::INFINITY), 0);
        assert_eq!(schedule.sector_count(-4.0), 0);
    }

    #[test]
    fn test_palette_cycles() {
        let sector = Sector { index: 9, t_start: 9.0, t_end: 10.0 };
        assert_eq!(sector.palette_index(8), 1);
        assert_eq!(sector.palette_index(0), 0);
        assert_relative_eq!(sector.duration(), 1.0);
    }
}
