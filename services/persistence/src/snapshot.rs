//! Snapshot Store: One indented JSON audit file per persisted quote
//!
//! Features:
//! - Full denormalized copy of the quote input and derived values
//! - Location named `<UTC %Y%m%dT%H%M%SZ>_<sanitized route>.json`
//! - Never overwrites: the name is reserved with create-new semantics and a
//!   `-N` suffix is added when the same route is snapshotted twice in one second
//! - Atomic body write: tmp file, fsync, rename over the reservation

use chrono::{DateTime, Utc};
use rate_types::ids::{DriverId, RouteId};
use rate_types::quote::Metadata;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("No free snapshot name for {stem} after {attempts} attempts")]
    NameExhausted { stem: String, attempts: u32 },
}

/// Upper bound on `-N` suffixes tried for one timestamp/route pair.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Placeholder used in file names when the route id is empty.
pub const EMPTY_ROUTE_PLACEHOLDER: &str = "route";

// ── Snapshot Record ─────────────────────────────────────────────────

/// Full audit copy of one persisted quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub route_id: RouteId,
    pub driver_id: Option<DriverId>,
    pub planned_distance_km: f64,
    pub parcel_count: u32,
    pub metadata: Option<Metadata>,
    pub rate_per_parcel: f64,
    pub total_payout: f64,
    pub input_hash: String,
    pub output_hash: String,
    pub config_version: String,
    pub service_version: String,
    pub created_at: DateTime<Utc>,
}

// ── Store abstraction ───────────────────────────────────────────────

/// Durable, individually addressable storage for snapshot records.
pub trait SnapshotStore: Send + Sync {
    /// Persist `record` and return its location handle.
    fn save(&self, route_id: &RouteId, record: &SnapshotRecord) -> Result<String, SnapshotError>;

    /// Read back the record stored at `location`.
    fn load(&self, location: &str) -> Result<SnapshotRecord, SnapshotError>;

    /// Whether a record exists at `location`.
    fn contains(&self, location: &str) -> bool;
}

// ── Filesystem store ────────────────────────────────────────────────

/// Writes snapshots as pretty-printed JSON files under one directory.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    dir: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a snapshot named after `now`: reserve name → write tmp → fsync → rename.
    pub fn save_at(
        &self,
        route_id: &RouteId,
        record: &SnapshotRecord,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, SnapshotError> {
        fs::create_dir_all(&self.dir)?;

        let mut body = serde_json::to_vec_pretty(record)?;
        body.push(b'\n');

        let path = self.reserve(&snapshot_stem(route_id, now))?;
        let tmp_path = path.with_extension("json.tmp");

        let written = write_synced(&tmp_path, &body).and_then(|_| fs::rename(&tmp_path, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), bytes = body.len(), "snapshot written");
        Ok(path)
    }

    /// Claim the first free `<stem>[-N].json` name in the directory.
    fn reserve(&self, stem: &str) -> Result<PathBuf, SnapshotError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(snapshot_file_name(stem, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(SnapshotError::NameExhausted {
            stem: stem.to_string(),
            attempts: MAX_NAME_ATTEMPTS,
        })
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn save(&self, route_id: &RouteId, record: &SnapshotRecord) -> Result<String, SnapshotError> {
        let path = self.save_at(route_id, record, Utc::now())?;
        Ok(path.to_string_lossy().into_owned())
    }

    fn load(&self, location: &str) -> Result<SnapshotRecord, SnapshotError> {
        let data = fs::read(location).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SnapshotError::NotFound(location.to_string()),
            _ => SnapshotError::Io(e),
        })?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn contains(&self, location: &str) -> bool {
        Path::new(location).is_file()
    }
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

// ── Naming ──────────────────────────────────────────────────────────

/// Replace path-unsafe characters (`/`, `\`, space, `:`) with `_`.
///
/// An empty route id maps to [`EMPTY_ROUTE_PLACEHOLDER`].
pub fn sanitize_route_id(route_id: &str) -> String {
    if route_id.is_empty() {
        return EMPTY_ROUTE_PLACEHOLDER.to_string();
    }
    route_id
        .chars()
        .map(|c| match c {
            '/' | '\\' | ' ' | ':' => '_',
            other => other,
        })
        .collect()
}

/// `<UTC timestamp, second precision>_<sanitized route>`
pub fn snapshot_stem(route_id: &RouteId, now: DateTime<Utc>) -> String {
    format!(
        "{}_{}",
        now.format("%Y%m%dT%H%M%SZ"),
        sanitize_route_id(route_id.as_str())
    )
}

fn snapshot_file_name(stem: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}.json", stem)
    } else {
        format!("{}-{}.json", stem, attempt)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
