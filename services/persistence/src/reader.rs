//! Ledger Reader: Line scanner with corruption and integrity checks
//!
//! Features:
//! - Line-by-line parse of the NDJSON ledger
//! - Corrupt or torn lines reported by line number without stopping the scan
//! - Per-entry integrity: output hash against `total_cents`, presence of the
//!   append timestamp, and the snapshot back-reference

use crate::ledger::LedgerEntry;
use crate::snapshot::SnapshotStore;
use rate_types::trace::output_hash;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Scan results ────────────────────────────────────────────────────

/// A line that could not be decoded as a ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CorruptLine {
    /// 1-based line number in the ledger file.
    pub line_number: usize,
    pub detail: String,
}

/// Everything read from one ledger file.
#[derive(Debug, Clone, Default)]
pub struct LedgerScan {
    pub entries: Vec<LedgerEntry>,
    pub corrupt_lines: Vec<CorruptLine>,
}

impl LedgerScan {
    pub fn is_clean(&self) -> bool {
        self.corrupt_lines.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityIssue {
    OutputHashMismatch { expected: String, recorded: String },
    MissingTimestamp,
    DanglingSnapshot { location: String },
}

// ── Ledger Reader ───────────────────────────────────────────────────

pub struct LedgerReader {
    path: PathBuf,
}

impl LedgerReader {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse every line of the ledger. A missing file reads as empty.
    pub fn read_all(&self) -> Result<LedgerScan, ReaderError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LedgerScan::default()),
            Err(e) => return Err(e.into()),
        };

        let mut scan = LedgerScan::default();
        for (idx, line) in BufReader::new(file).split(b'\n').enumerate() {
            let line = line?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice::<LedgerEntry>(&line) {
                Ok(entry) => scan.entries.push(entry),
                Err(e) => {
                    tracing::warn!(line = idx + 1, error = %e, "corrupt ledger line");
                    scan.corrupt_lines.push(CorruptLine {
                        line_number: idx + 1,
                        detail: e.to_string(),
                    });
                }
            }
        }
        Ok(scan)
    }
}

/// Cross-check one entry against its recorded hashes and its snapshot.
pub fn verify_entry(entry: &LedgerEntry, snapshots: &dyn SnapshotStore) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    let expected = output_hash(entry.total_cents);
    if expected != entry.output_hash {
        issues.push(IntegrityIssue::OutputHashMismatch {
            expected,
            recorded: entry.output_hash.clone(),
        });
    }
    if entry.created_at.is_none() {
        issues.push(IntegrityIssue::MissingTimestamp);
    }
    if !snapshots.contains(&entry.snapshot_path) {
        issues.push(IntegrityIssue::DanglingSnapshot {
            location: entry.snapshot_path.clone(),
        });
    }
    issues
}

// ── Tests ───────────────────────────────────────────────────────────
