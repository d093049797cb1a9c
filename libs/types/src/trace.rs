//! Canonical content hashes for quotes
//!
//! The trace is a SHA-256 over a fixed-shape JSON encoding of the input:
//! field order is fixed, optional fields are always present (empty driver id
//! as `""`, absent metadata as `{}`), and metadata keys are sorted. It is a
//! correlation and idempotency aid, not a security boundary.

use crate::quote::{Metadata, QuoteInput};
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalInput<'a> {
    route_id: &'a str,
    planned_distance_km: f64,
    parcel_count: i64,
    driver_id: &'a str,
    metadata: &'a Metadata,
}

/// Canonical byte encoding of a quote input.
pub fn canonical_bytes(input: &QuoteInput) -> Vec<u8> {
    let empty = Metadata::new();
    let canonical = CanonicalInput {
        route_id: input.route_id.as_str(),
        planned_distance_km: input.planned_distance_km,
        parcel_count: input.parcel_count,
        driver_id: input.driver_id.as_ref().map(|d| d.as_str()).unwrap_or(""),
        metadata: input.metadata.as_ref().unwrap_or(&empty),
    };
    serde_json::to_vec(&canonical).expect("canonical input serialization should never fail")
}

/// Lowercase hex SHA-256 of the canonical input.
pub fn input_trace(input: &QuoteInput) -> String {
    sha256_hex(&canonical_bytes(input))
}

/// Lowercase hex SHA-256 of the total payout in cents, rendered in decimal.
pub fn output_hash(total_cents: i64) -> String {
    sha256_hex(total_cents.to_string().as_bytes())
}

pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
