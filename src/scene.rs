//! Scene configuration.
//!
//! Groups the parameters of every animated scene so one JSON file can drive a
//! rendering run. Defaults reproduce the stock scenes: an e = 0.7 orbit with an
//! 8 s period, a 10 m drop, and a 3 m/s body striking one at rest.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::{CollisionError, ElasticCollision};
use crate::constants::DEFAULT_FPS;
use crate::elements::{OrbitError, OrbitParameters};
use crate::freefall::{FreeFall, FreeFallError, TimeShift};
use crate::kepler::{KeplerSolver, SolverConfig};
use crate::sweep::{SweepError, SweepSchedule};
use crate::timeline::{FrameTimeline, TimelineError};

/// How long the collision scene keeps running, as a multiple of the time to impact.
const COLLISION_RUNTIME_FACTOR: f64 = 2.5;

/// Scene configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid orbit: {0}")]
    Orbit(#[from] OrbitError),

    #[error("Frame rate must be finite and positive, got {0}")]
    InvalidFps(f64),

    #[error("Invalid sweep schedule: {0}")]
    Sweep(#[from] SweepError),

    #[error("Invalid free fall: {0}")]
    FreeFall(#[from] FreeFallError),

    #[error("Invalid collision: {0}")]
    Collision(#[from] CollisionError),

    #[error("Invalid {scene} timeline: {source}")]
    Timeline {
        scene: &'static str,
        source: TimelineError,
    },
}

/// Parameters for all scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub orbit: OrbitParameters,
    pub solver: SolverConfig,
    /// Frames per second for every scene.
    pub fps: f64,
    pub sweep: SweepSchedule,
    pub free_fall: FreeFall,
    pub time_shift: TimeShift,
    pub collision: ElasticCollision,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            orbit: OrbitParameters { e: 0.7, a: 4.0, period: 8.0 },
            solver: SolverConfig::default(),
            fps: DEFAULT_FPS,
            sweep: SweepSchedule::default(),
            free_fall: FreeFall::default(),
            time_shift: TimeShift::default(),
            collision: ElasticCollision::default(),
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SceneConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orbit.validate()?;
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        self.sweep.validate()?;
        self.free_fall.validate()?;
        self.time_shift.validate()?;
        self.collision.validate()?;

        let timelines = [
            ("orbit", self.orbit_timeline()),
            ("free fall", self.free_fall_timeline()),
            ("time shift", self.time_shift_timeline()),
            ("collision", self.collision_timeline()),
        ];
        for (scene, timeline) in timelines {
            timeline
                .validate()
                .map_err(|source| ConfigError::Timeline { scene, source })?;
        }
        Ok(())
    }

    /// Solver for the orbit scene.
    pub fn kepler_solver(&self) -> KeplerSolver {
        KeplerSolver::new(self.orbit).with_config(self.solver)
    }

    /// One full orbital period.
    pub fn orbit_timeline(&self) -> FrameTimeline {
        FrameTimeline::new(self.orbit.period, self.fps)
    }

    /// Release to impact.
    pub fn free_fall_timeline(&self) -> FrameTimeline {
        FrameTimeline::new(self.free_fall.fall_time(), self.fps)
    }

    /// Both drops of the time-shift scene.
    pub fn time_shift_timeline(&self) -> FrameTimeline {
        self.time_shift.timeline(self.fps)
    }

    /// Runs past the impact so the outgoing motion is visible. Zero-length if
    /// the bodies never meet.
    pub fn collision_timeline(&self) -> FrameTimeline {
        let duration = self
            .collision
            .collision_time()
            .map_or(0.0, |t| t * COLLISION_RUNTIME_FACTOR);
        FrameTimeline::new(duration, self.fps)
    }
}
