//! Frame timelines and batch orbit sampling.
//!
//! A timeline covers [0, duration] with `floor(duration * fps) + 1` frames
//! spaced evenly, so the first and last frames land exactly on the endpoints.
//! Frame counts are capped at [`MAX_FRAMES`]; [`FrameTimeline::validate`]
//! rejects timelines that would need more.
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::constants::DEFAULT_FPS;
use crate::elements::OrbitalState;
use crate::kepler::KeplerSolver;

/// Upper bound on frames in one timeline (about 46 hours at 60 fps).
pub const MAX_FRAMES: usize = 10_000_000;

/// Timeline validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error("Frame rate must be finite and positive, got {0}")]
    InvalidFps(f64),

    #[error("Duration must be finite and non-negative, got {0}")]
    InvalidDuration(f64),

    #[error("Timeline of {duration} s at {fps} fps exceeds {max} frames")]
    TooManyFrames { duration: f64, fps: f64, max: usize },
}

/// Evenly spaced animation frames over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTimeline {
    /// Total animated time (s).
    pub duration: f64,
    /// Frames per second.
    pub fps: f64,
}

/// Orbital state rendered at one frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameSample {
    pub frame: usize,
    /// Elapsed time (s).
    pub t: f64,
    pub state: OrbitalState,
}

impl FrameTimeline {
    /// Unchecked timeline; see [`FrameTimeline::validate`].
    pub fn new(duration: f64, fps: f64) -> Self {
        FrameTimeline { duration, fps }
    }

    /// Check that the timeline is finite and fits in [`MAX_FRAMES`].
    pub fn validate(&self) -> Result<(), TimelineError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(TimelineError::InvalidFps(self.fps));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(TimelineError::InvalidDuration(self.duration));
        }
        if (self.duration * self.fps).floor() >= MAX_FRAMES as f64 {
            return Err(TimelineError::TooManyFrames {
                duration: self.duration,
                fps: self.fps,
                max: MAX_FRAMES,
            });
        }
        Ok(())
    }

    /// Timeline at the default frame rate.
    pub fn with_default_fps(duration: f64) -> Self {
        Self::new(duration, DEFAULT_FPS)
    }

    /// Number of frames, endpoints included, capped at [`MAX_FRAMES`].
    ///
    /// A NaN duration or frame rate yields a single frame.
    pub fn frame_count(&self) -> usize {
        let intervals = (self.duration * self.fps).floor();
        if intervals.is_nan() || intervals <= 0.0 {
            return 1;
        }
        (intervals.min((MAX_FRAMES - 1) as f64) as usize) + 1
    }

    /// Playback interval between frames (s).
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.fps
    }

    /// Elapsed time at `frame`.
    pub fn time_at(&self, frame: usize) -> f64 {
        let n = self.frame_count();
        if n <= 1 {
            return 0.0;
        }
        self.duration * frame as f64 / (n - 1) as f64
    }

    /// All frame times, in order.
    pub fn times(&self) -> Vec<f64> {
        (0..self.frame_count()).map(|i| self.time_at(i)).collect()
    }
}

/// Solve the orbit at every frame of `timeline`.
pub fn sample_orbit(solver: &KeplerSolver, timeline: &FrameTimeline) -> Vec<FrameSample> {
    let n_frames = timeline.frame_count();
    let mut samples = Vec::with_capacity(n_frames);

    for frame in 0..n_frames {
        let t = timeline.time_at(frame);
        samples.push(FrameSample {
            frame,
            t,
            state: solver.solve(t),
        });
    }

    log::debug!("Sampled {} frames over {} s", n_frames, timeline.duration);
    samples
}

/// Same as [`sample_orbit`], with frames solved in parallel. Output order is preserved.
pub fn sample_orbit_par(solver: &KeplerSolver, timeline: &FrameTimeline) -> Vec<FrameSample> {
    use rayon::prelude::*;

    (0..timeline.frame_count())
        .into_par_iter()
        .map(|frame| {
            let t = timeline.time_at(frame);
            FrameSample {
                frame,
                t,
                state: solver.solve(t),
            }
        })
        .collect()
}
