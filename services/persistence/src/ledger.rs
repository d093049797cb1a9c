//! Ledger: Append-only, newline-delimited log of persisted quotes
//!
//! One JSON object per line, monetary fields in integer cents. Appends are
//! serialized by a lock owned by the log instance, and each line (newline
//! included) goes out in a single write so readers never observe an
//! interleaved or partial prefix record.
//!
//! # Line Format
//! ```text
//! {"id":"…","route_id":"…","config_version":"…","service_version":"…",
//!  "rate_cents":3125,"total_cents":9375,"parcel_count":3,
//!  "planned_distance_km":10.0,"snapshot_path":"…","input_hash":"…",
//!  "output_hash":"…","created_at":"2026-03-14T09:26:53Z"}\n
//! ```

use chrono::{DateTime, Utc};
use rate_types::ids::{DriverId, LedgerEntryId, RouteId};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ── Ledger Entry ────────────────────────────────────────────────────

/// A single ledger row. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub route_id: RouteId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<DriverId>,
    pub config_version: String,
    pub service_version: String,
    pub rate_cents: i64,
    pub total_cents: i64,
    pub parcel_count: u32,
    pub planned_distance_km: f64,
    /// Location of the snapshot this row was derived from
    pub snapshot_path: String,
    pub input_hash: String,
    pub output_hash: String,
    /// Stamped by the appender when left unset
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ── Log abstraction ─────────────────────────────────────────────────

/// Ordered, durable, append-only log of ledger entries.
///
/// Implementations own their synchronization: concurrent callers may append
/// through a shared reference.
pub trait LedgerLog: Send + Sync {
    /// Append one entry, returning it as stored (with `created_at` set).
    fn append(&self, entry: LedgerEntry) -> Result<LedgerEntry, LedgerError>;
}

fn stamp(mut entry: LedgerEntry) -> LedgerEntry {
    if entry.created_at.is_none() {
        entry.created_at = Some(Utc::now());
    }
    entry
}

// ── Fsync Policy ────────────────────────────────────────────────────

/// Controls when `fsync` (durable write) is called.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FsyncPolicy {
    /// Fsync after every append.
    EveryAppend,
    /// Leave write-back to the OS.
    OsManaged,
}

// ── NDJSON file log ─────────────────────────────────────────────────

/// Configuration for the file-backed ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Ledger file; parent directories are created on first append.
    pub path: PathBuf,
    pub fsync_policy: FsyncPolicy,
}

impl LedgerConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fsync_policy: FsyncPolicy::EveryAppend,
        }
    }
}

/// File-backed ledger writing one JSON line per entry.
///
/// The file is opened in append mode for each entry while the lock is held
/// and closed again afterwards.
#[derive(Debug)]
pub struct NdjsonLedger {
    config: LedgerConfig,
    lock: Mutex<()>,
}

impl NdjsonLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

impl LedgerLog for NdjsonLedger {
    fn append(&self, entry: LedgerEntry) -> Result<LedgerEntry, LedgerError> {
        // the lock guards the file, not data; a panicked holder leaves nothing to repair
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.path)?;

        let entry = stamp(entry);
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        file.write_all(&line)?;

        if self.config.fsync_policy == FsyncPolicy::EveryAppend {
            file.sync_data()?;
        }

        tracing::debug!(id = %entry.id, bytes = line.len(), "ledger entry appended");
        Ok(entry)
    }
}

// ── In-memory log ───────────────────────────────────────────────────

/// Volatile ledger kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all entries in append order.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerLog for MemoryLedger {
    fn append(&self, entry: LedgerEntry) -> Result<LedgerEntry, LedgerError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = stamp(entry);
        entries.push(entry.clone());
        Ok(entry)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
