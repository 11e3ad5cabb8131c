//! External simulator contract.
//!
//! The simulator is an opaque process: it receives a typed parameter set and
//! a seed, writes one capture file per node into the trial's output directory,
//! and reports success through its exit status.

pub mod params;
pub mod command;
pub mod process;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use params::{MobilityModel, RoutingProtocol, SimulationParams};
pub use process::ProcessSimulator;

/// Everything needed to launch one trial
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub params: SimulationParams,
    pub seed: u64,
    /// Isolated directory that receives this trial's capture files
    pub output_dir: PathBuf,
}

/// How a trial's simulator process ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrialStatus {
    Completed,
    /// Non-zero exit or termination by signal
    Exited { detail: String },
    TimedOut { after_secs: f64 },
    /// The process could not be started for a reason other than a missing program
    LaunchFailed { reason: String },
}

impl TrialStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TrialStatus::Completed)
    }
}

/// Conditions that make every further trial pointless
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("Simulator program {} cannot be started", program.display())]
    Unavailable {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create simulator log {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs one trial to completion
pub trait Simulator: Sync {
    /// Block until the trial ends. `Ok` covers both successful and failed
    /// trials; `Err` is reserved for conditions that abort the sweep.
    fn run(&self, invocation: &Invocation) -> Result<TrialStatus, SimulatorError>;
}
