//! Capture detection for a single trial.
//!
//! Walks the adversary capture files of one trial in node-index order and
//! decides whether the target flow was captured before the end of the
//! simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::reader::CaptureReader;
use super::types::*;

/// Time bound inside which an observed packet counts as a capture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureWindow {
    /// Simulation duration in seconds
    pub total_time: SimTime,
    /// Packets seen within `margin` seconds of the end do not count
    pub margin: SimTime,
}

impl CaptureWindow {
    pub fn new(total_time: SimTime, margin: SimTime) -> Self {
        Self { total_time, margin }
    }

    pub fn deadline(&self) -> SimTime {
        self.total_time - self.margin
    }

    pub fn is_capture(&self, timestamp: SimTime) -> bool {
        timestamp > 0.0 && timestamp < self.deadline()
    }
}

/// Packets and last timestamp contributed by one capture file
struct FileContribution {
    packets: u64,
    last_timestamp: Option<SimTime>,
}

fn read_contribution(path: &Path) -> Result<FileContribution, CaptureError> {
    let mut contribution = FileContribution {
        packets: 0,
        last_timestamp: None,
    };
    for record in CaptureReader::open(path)? {
        let record = record?;
        contribution.packets += 1;
        contribution.last_timestamp = Some(record.timestamp);
    }
    Ok(contribution)
}

/// Node indices `[base_index, base_index + adversary_nodes)`, cut short at
/// `u32::MAX`
pub fn adversary_indices(base_index: u32, adversary_nodes: u32) -> impl Iterator<Item = u32> {
    (0..adversary_nodes).map_while(move |offset| base_index.checked_add(offset))
}

/// Evaluate the adversary captures of one trial.
///
/// Adversary nodes occupy indices `[base_index, base_index + adversary_nodes)`.
/// Indices past `u32::MAX` cannot name a file and count as missing. Missing files contribute nothing. Corrupt files are excluded entirely
/// (packets and timestamps) and logged. The candidate capture time is the
/// timestamp of the last record read, walking files in index order.
pub fn evaluate(
    dir: &Path,
    layout: &CaptureLayout,
    base_index: u32,
    adversary_nodes: u32,
    window: CaptureWindow,
) -> TrialOutcome {
    let mut total_packets = 0;
    let mut candidate: SimTime = 0.0;
    let mut missing_files = 0;
    let mut corrupt_files = 0;
    let mut visited = 0;

    for index in adversary_indices(base_index, adversary_nodes) {
        visited += 1;
        let path = layout.path(dir, NodeRole::Adversary, index);
        match read_contribution(&path) {
            Ok(contribution) => {
                log::debug!(
                    "Adversary {}: {} packets, last at {:?}",
                    index,
                    contribution.packets,
                    contribution.last_timestamp
                );
                total_packets += contribution.packets;
                if let Some(ts) = contribution.last_timestamp {
                    candidate = ts;
                }
            }
            Err(e) if e.is_unavailable() => {
                log::debug!("Adversary {}: no capture file at {}", index, path.display());
                missing_files += 1;
            }
            Err(e) => {
                log::warn!("Ignoring adversary {} capture: {}", index, e);
                corrupt_files += 1;
            }
        }
    }
    missing_files += adversary_nodes - visited;

    let captured = window.is_capture(candidate);
    TrialOutcome {
        captured,
        capture_time: captured.then_some(candidate),
        last_timestamp: candidate,
        total_packets,
        missing_files,
        corrupt_files,
    }
}
