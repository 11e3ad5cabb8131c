//! Streaming reader for per-node pcap files.
//!
//! Records are decoded lazily in file order. The reader is single-pass; reopen
//! the file to iterate again.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapBlock, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError};

use super::decode::decode_udp;
use super::types::{CaptureError, CaptureRecord, CaptureSummary};

/// Must hold one record of the largest snaplen (65535) plus its 16-byte header
const READ_BUFFER_SIZE: usize = 128 * 1024;
const MAX_STALLED_REFILLS: u32 = 16;

/// What one step of the underlying block reader produced
enum Step {
    Header { offset: usize, linktype: Linktype, nanosecond: bool },
    Record { offset: usize, record: CaptureRecord },
    Refill,
    Eof,
    Fail(String),
}

/// Lazy iterator over the records of one capture file
pub struct CaptureReader {
    path: PathBuf,
    reader: LegacyPcapReader<BufReader<File>>,
    linktype: Linktype,
    nanosecond: bool,
    /// Refills since the last decoded block
    stalled_refills: u32,
    finished: bool,
}

impl CaptureReader {
    /// Open a capture file and validate its global header
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CaptureError::Unavailable {
                path: path.to_path_buf(),
            },
            _ => CaptureError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let reader = LegacyPcapReader::new(READ_BUFFER_SIZE, BufReader::new(file))
            .map_err(|e| CaptureError::corrupt(path, format!("invalid pcap header: {:?}", e)))?;

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            linktype: Linktype::ETHERNET,
            nanosecond: false,
            stalled_refills: 0,
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Link type declared in the file header
    pub fn linktype(&self) -> Linktype {
        self.linktype
    }

    fn step(&mut self) -> Step {
        match self.reader.next() {
            Ok((offset, block)) => {
                let step = match block {
                    PcapBlockOwned::LegacyHeader(ref header) => Step::Header {
                        offset,
                        linktype: header.network,
                        nanosecond: header.is_nanosecond_precision(),
                    },
                    PcapBlockOwned::Legacy(ref packet) => Step::Record {
                        offset,
                        record: to_record(self.linktype, self.nanosecond, packet),
                    },
                    PcapBlockOwned::NG(_) => {
                        Step::Fail("pcapng blocks are not supported".to_string())
                    }
                };
                drop(block);
                step
            }
            Err(PcapError::Eof) => Step::Eof,
            Err(PcapError::Incomplete { .. }) => Step::Refill,
            Err(e) => Step::Fail(format!("{:?}", e)),
        }
    }

    fn fail(&mut self, reason: impl Into<String>) -> Option<Result<CaptureRecord, CaptureError>> {
        self.finished = true;
        Some(Err(CaptureError::corrupt(&self.path, reason)))
    }
}

impl Iterator for CaptureReader {
    type Item = Result<CaptureRecord, CaptureError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.step() {
                Step::Header {
                    offset,
                    linktype,
                    nanosecond,
                } => {
                    self.linktype = linktype;
                    self.nanosecond = nanosecond;
                    self.stalled_refills = 0;
                    self.reader.consume(offset);
                }
                Step::Record { offset, record } => {
                    self.stalled_refills = 0;
                    self.reader.consume(offset);
                    return Some(Ok(record));
                }
                Step::Refill => {
                    if self.stalled_refills >= MAX_STALLED_REFILLS {
                        return self.fail("truncated record at end of file");
                    }
                    self.stalled_refills += 1;
                    if let Err(e) = self.reader.refill() {
                        let reason = format!("refill error: {:?}", e);
                        return self.fail(reason);
                    }
                }
                Step::Eof => {
                    self.finished = true;
                    return None;
                }
                Step::Fail(reason) => return self.fail(reason),
            }
        }
    }
}

fn to_record(linktype: Linktype, nanosecond: bool, packet: &LegacyPcapBlock) -> CaptureRecord {
    let fraction = if nanosecond { 1e9 } else { 1e6 };
    CaptureRecord {
        timestamp: packet.ts_sec as f64 + packet.ts_usec as f64 / fraction,
        captured_len: packet.caplen,
        original_len: packet.origlen,
        udp: decode_udp(linktype, packet.data),
    }
}

/// Read a whole capture file and summarize it
pub fn summarize(path: &Path) -> Result<CaptureSummary, CaptureError> {
    let mut summary = CaptureSummary::default();
    for record in CaptureReader::open(path)? {
        summary.record(&record?);
    }
    Ok(summary)
}
