//! Packet capture analysis for simulator output.
//!
//! Reads the per-node pcap files written by the simulator and decides whether
//! the adversary nodes captured the target flow.

pub mod types;
pub mod decode;
pub mod reader;
pub mod evaluator;
pub mod inventory;

pub use types::*;
pub use reader::{summarize, CaptureReader};
pub use evaluator::{adversary_indices, evaluate, CaptureWindow};
pub use inventory::{discover, inspect, CaptureFile, NodeCapture};
