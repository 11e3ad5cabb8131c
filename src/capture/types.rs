//! Core data types for packet capture analysis.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Simulation-relative timestamp in seconds
pub type SimTime = f64;

/// UDP header fields decoded from a captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdpSummary {
    pub source_port: u16,
    pub destination_port: u16,
    pub length: u16,
    pub checksum: u16,
}

/// One packet observed in a capture file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    pub timestamp: SimTime,
    /// Bytes stored in the file for this frame
    pub captured_len: u32,
    /// Bytes on the wire
    pub original_len: u32,
    /// Transport header, if the frame carries IPv4/UDP
    pub udp: Option<UdpSummary>,
}

/// Errors raised while reading a single capture file
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture file not found: {}", path.display())]
    Unavailable { path: PathBuf },

    #[error("Corrupt capture file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to read capture file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaptureError {
    pub fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        CaptureError::Corrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Missing files are evidence of "nothing captured", not a failure
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CaptureError::Unavailable { .. })
    }
}

/// Role of a simulated node, as encoded in the capture file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Adhoc,
    Adversary,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Adhoc => write!(f, "adhoc"),
            NodeRole::Adversary => write!(f, "adversary"),
        }
    }
}

/// Naming convention of the per-node capture files written by the simulator:
/// `<prefix>-<index>-<device>.<extension>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureLayout {
    pub adhoc_prefix: String,
    pub adversary_prefix: String,
    pub device: u32,
    pub extension: String,
}

impl Default for CaptureLayout {
    fn default() -> Self {
        Self {
            adhoc_prefix: "adhocNode".to_string(),
            adversary_prefix: "advNode".to_string(),
            device: 0,
            extension: "pcap".to_string(),
        }
    }
}

impl CaptureLayout {
    pub fn prefix(&self, role: NodeRole) -> &str {
        match role {
            NodeRole::Adhoc => &self.adhoc_prefix,
            NodeRole::Adversary => &self.adversary_prefix,
        }
    }

    pub fn file_name(&self, role: NodeRole, index: u32) -> String {
        format!("{}-{}-{}.{}", self.prefix(role), index, self.device, self.extension)
    }

    pub fn path(&self, dir: &Path, role: NodeRole, index: u32) -> PathBuf {
        dir.join(self.file_name(role, index))
    }
}

/// Per-file statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub packets: u64,
    pub udp_packets: u64,
    pub first_timestamp: Option<SimTime>,
    pub last_timestamp: Option<SimTime>,
}

impl CaptureSummary {
    pub fn record(&mut self, record: &CaptureRecord) {
        self.packets += 1;
        if record.udp.is_some() {
            self.udp_packets += 1;
        }
        if self.first_timestamp.is_none() {
            self.first_timestamp = Some(record.timestamp);
        }
        self.last_timestamp = Some(record.timestamp);
    }
}

/// Result of evaluating the adversary captures of one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub captured: bool,
    /// Only set when `captured` is true
    pub capture_time: Option<SimTime>,
    /// Timestamp of the last record seen across all adversary files (0 if none)
    pub last_timestamp: SimTime,
    pub total_packets: u64,
    pub missing_files: u32,
    pub corrupt_files: u32,
}

impl TrialOutcome {
    /// Outcome used when a failed trial is counted as a non-capture
    pub fn miss() -> Self {
        Self {
            captured: false,
            capture_time: None,
            last_timestamp: 0.0,
            total_packets: 0,
            missing_files: 0,
            corrupt_files: 0,
        }
    }
}
