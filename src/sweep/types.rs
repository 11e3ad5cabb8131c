//! Core data types for parameter sweeps.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::capture::TrialOutcome;
use crate::config::{MetricConfig, SweepDimension};
use crate::simulator::{SimulationParams, TrialStatus};

/// One value of the swept parameter with the full parameter set it yields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Position in the sweep, starting at 0
    pub index: usize,
    pub value: f64,
    pub params: SimulationParams,
}

impl SweepPoint {
    /// Directory-safe name, e.g. `node_speed-0.5`
    pub fn label(&self, dimension: SweepDimension) -> String {
        format!("{}-{}", dimension.slug(), self.value)
    }
}

/// One simulator execution for a sweep point and a seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub point_index: usize,
    /// Attempt number within the point; replacements continue the numbering
    pub repeat: u32,
    pub seed: u64,
    pub output_dir: PathBuf,
    /// Adversary capture files the simulator is expected to write
    pub capture_files: Vec<PathBuf>,
    pub status: TrialStatus,
    /// Present only for trials whose simulator run completed
    pub outcome: Option<TrialOutcome>,
}

impl Trial {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Aggregated result of one sweep point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointResult {
    pub value: f64,
    /// `None` when no trial produced data
    pub metric: Option<f64>,
    pub attempted: u32,
    pub completed: u32,
    pub failed: u32,
    pub captured: u32,
    pub total_packets: u64,
    pub trials: Vec<Trial>,
}

/// Finished sweep: one entry per sweep point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub dimension: SweepDimension,
    pub metric: MetricConfig,
    pub points: Vec<PointResult>,
}

impl SweepResult {
    /// `(value, metric)` pairs sorted by value
    pub fn series(&self) -> Vec<(f64, Option<f64>)> {
        let mut series: Vec<(f64, Option<f64>)> =
            self.points.iter().map(|p| (p.value, p.metric)).collect();
        series.sort_by(|a, b| a.0.total_cmp(&b.0));
        series
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total_trials(&self) -> u32 {
        self.points.iter().map(|p| p.attempted).sum()
    }
}

/// Progress of the sweep point currently being processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointState {
    Pending,
    Running { trial: u32 },
    Evaluated { trial: u32 },
    Aggregated,
}

impl PointState {
    /// Whether `next` is a legal successor of this state
    pub fn can_advance_to(&self, next: PointState) -> bool {
        use PointState::*;
        match (*self, next) {
            (Pending, Running { .. }) => true,
            (Running { trial: a }, Evaluated { trial: b }) => a == b,
            (Evaluated { .. }, Running { .. }) => true,
            (Evaluated { .. }, Aggregated) => true,
            (Aggregated, Pending) => true,
            _ => false,
        }
    }
}
