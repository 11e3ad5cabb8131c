//! Discovery and per-node summaries of the capture files in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regex::Regex;

use super::reader::summarize;
use super::types::*;

/// A capture file recognised by its name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CaptureFile {
    pub role: NodeRole,
    pub index: u32,
    pub device: u32,
    pub path: PathBuf,
}

/// Inventory line for one capture file
#[derive(Debug)]
pub struct NodeCapture {
    pub file: CaptureFile,
    pub summary: Result<CaptureSummary, CaptureError>,
}

fn file_pattern(layout: &CaptureLayout) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"^({}|{})-(\d+)-(\d+)\.{}$",
        regex::escape(&layout.adhoc_prefix),
        regex::escape(&layout.adversary_prefix),
        regex::escape(&layout.extension)
    ))
}

/// List the capture files of `dir`, ordered by role then node index.
/// Files whose names do not follow the layout are ignored.
pub fn discover(dir: &Path, layout: &CaptureLayout) -> std::io::Result<Vec<CaptureFile>> {
    let pattern = file_pattern(layout)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(caps) = pattern.captures(name) else {
            continue;
        };
        let role = if &caps[1] == layout.adversary_prefix {
            NodeRole::Adversary
        } else {
            NodeRole::Adhoc
        };
        // Indices too large for u32 cannot name a node
        let (Ok(index), Ok(device)) = (caps[2].parse(), caps[3].parse()) else {
            continue;
        };
        files.push(CaptureFile {
            role,
            index,
            device,
            path: entry.path(),
        });
    }

    files.sort();
    Ok(files)
}

/// Summarize every capture file of `dir` in parallel
pub fn inspect(dir: &Path, layout: &CaptureLayout) -> std::io::Result<Vec<NodeCapture>> {
    let files = discover(dir, layout)?;
    log::info!("Found {} capture files in {}", files.len(), dir.display());

    Ok(files
        .into_par_iter()
        .map(|file| {
            let summary = summarize(&file.path);
            NodeCapture { file, summary }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::testutil::write_timestamps;
    use tempfile::TempDir;

    #[test]
    fn test_discover_orders_by_role_and_index() {
        let dir = TempDir::new().unwrap();
        for name in [
            "adhocNode-10-0.pcap",
            "adhocNode-2-0.pcap",
            "advNode-100-0.pcap",
            "adhocNode-3-1.pcap",
            "simulator.log",
            "advNode-x-0.pcap",
            "adhocNode-4-0.pcapng",
        ] {
            write_timestamps(&dir.path().join(name), &[1.0]);
        }

        let files = discover(dir.path(), &CaptureLayout::default()).unwrap();
        let keys: Vec<(NodeRole, u32, u32)> =
            files.iter().map(|f| (f.role, f.index, f.device)).collect();
        assert_eq!(
            keys,
            vec![
                (NodeRole::Adhoc, 2, 0),
                (NodeRole::Adhoc, 3, 1),
                (NodeRole::Adhoc, 10, 0),
                (NodeRole::Adversary, 100, 0),
            ]
        );
    }

    #[test]
    fn test_inspect_reports_counts_and_corruption() {
        let dir = TempDir::new().unwrap();
        write_timestamps(&dir.path().join("adhocNode-0-0.pcap"), &[10.0, 11.5, 12.0]);
        write_timestamps(&dir.path().join("advNode-1-0.pcap"), &[]);
        fs::write(dir.path().join("advNode-2-0.pcap"), b"not a capture").unwrap();

        let nodes = inspect(dir.path(), &CaptureLayout::default()).unwrap();
        assert_eq!(nodes.len(), 3);

        let adhoc = nodes[0].summary.as_ref().unwrap();
        assert_eq!(adhoc.packets, 3);
        assert_eq!(adhoc.first_timestamp, Some(10.0));
        assert_eq!(adhoc.last_timestamp, Some(12.0));

        let quiet = nodes[1].summary.as_ref().unwrap();
        assert_eq!(quiet.packets, 0);
        assert_eq!(quiet.last_timestamp, None);

        assert!(matches!(nodes[2].summary, Err(CaptureError::Corrupt { .. })));
    }

    #[test]
    fn test_custom_prefixes() {
        let dir = TempDir::new().unwrap();
        write_timestamps(&dir.path().join("sink-1-0.pcap"), &[1.0]);
        write_timestamps(&dir.path().join("adhocNode-1-0.pcap"), &[1.0]);
        let layout = CaptureLayout {
            adhoc_prefix: "node".to_string(),
            adversary_prefix: "sink".to_string(),
            ..CaptureLayout::default()
        };

        let files = discover(dir.path(), &layout).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].role, NodeRole::Adversary);
    }
}
