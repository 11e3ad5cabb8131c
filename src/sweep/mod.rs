//! Parameter sweeps: enumerate sweep points, run repeated trials of the
//! simulator for each, and reduce the trial outcomes to one metric per point.

pub mod types;
pub mod aggregate;
pub mod driver;

pub use types::*;
pub use aggregate::aggregate;
pub use driver::{run_sweep, sweep_points, SweepContext, SweepError};
