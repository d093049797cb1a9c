//! Rate Engine: orchestrator
//!
//! Ties together validation, pricing, the canonical trace and the two
//! persistence steps. The snapshot is always written first; the ledger row
//! is appended only after the snapshot succeeded, so a row never points at
//! a missing snapshot.

use chrono::Utc;
use rate_persistence::ledger::{LedgerEntry, LedgerLog};
use rate_persistence::snapshot::{SnapshotRecord, SnapshotStore};
use rate_types::errors::ValidationError;
use rate_types::ids::LedgerEntryId;
use rate_types::pricing::{compute_total_payout, round_half_up, to_cents, PricingParameters};
use rate_types::quote::{QuoteInput, QuoteResult};
use rate_types::trace::{input_trace, output_hash};
use std::sync::Arc;

use crate::errors::QuoteError;

/// Recorded in every snapshot and ledger row.
pub const SERVICE_VERSION: &str = "rate-engine-v1.0.0";

/// Validate and price a quote. Pure: no I/O, no clock.
pub fn quote(input: &QuoteInput, params: &PricingParameters) -> Result<QuoteResult, ValidationError> {
    let parcel_count = input.validate()?;
    Ok(price(input, parcel_count, params))
}

fn price(input: &QuoteInput, parcel_count: u32, params: &PricingParameters) -> QuoteResult {
    let rate = round_half_up(params.rate_for(input.planned_distance_km));
    QuoteResult {
        rate_per_parcel: rate,
        total_payout: compute_total_payout(rate, parcel_count),
        config_version: params.version.clone(),
        trace: input_trace(input),
    }
}

/// Where a persisted quote ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistReceipt {
    pub snapshot_location: String,
    /// The row as stored, including its append timestamp
    pub ledger_entry: LedgerEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteOutcome {
    pub result: QuoteResult,
    /// Present only when persistence was requested
    pub receipt: Option<PersistReceipt>,
}

/// Quote engine service
#[derive(Clone)]
pub struct QuoteEngine {
    snapshots: Arc<dyn SnapshotStore>,
    ledger: Arc<dyn LedgerLog>,
    service_version: String,
}

impl QuoteEngine {
    pub fn new(snapshots: Arc<dyn SnapshotStore>, ledger: Arc<dyn LedgerLog>) -> Self {
        Self {
            snapshots,
            ledger,
            service_version: SERVICE_VERSION.to_string(),
        }
    }

    /// Price a quote and, when `persist` is set, record snapshot then ledger row.
    ///
    /// Validation failures return before anything is computed or written.
    /// A snapshot failure aborts before the ledger is touched; a ledger
    /// failure leaves the already written snapshot in place.
    pub fn process(
        &self,
        input: &QuoteInput,
        params: &PricingParameters,
        persist: bool,
    ) -> Result<QuoteOutcome, QuoteError> {
        let parcel_count = input.validate()?;
        let result = price(input, parcel_count, params);

        let receipt = if persist {
            Some(self.persist(input, parcel_count, &result)?)
        } else {
            None
        };

        Ok(QuoteOutcome { result, receipt })
    }

    fn persist(
        &self,
        input: &QuoteInput,
        parcel_count: u32,
        result: &QuoteResult,
    ) -> Result<PersistReceipt, QuoteError> {
        let rate_cents = to_cents(result.rate_per_parcel);
        let total_cents = to_cents(result.total_payout);
        let out_hash = output_hash(total_cents);

        let record = SnapshotRecord {
            route_id: input.route_id.clone(),
            driver_id: input.driver_id.clone(),
            planned_distance_km: input.planned_distance_km,
            parcel_count,
            metadata: input.metadata.clone(),
            rate_per_parcel: result.rate_per_parcel,
            total_payout: result.total_payout,
            input_hash: result.trace.clone(),
            output_hash: out_hash.clone(),
            config_version: result.config_version.clone(),
            service_version: self.service_version.clone(),
            created_at: Utc::now(),
        };

        let snapshot_location = self
            .snapshots
            .save(&input.route_id, &record)
            .inspect_err(|e| {
                tracing::error!(route_id = %input.route_id, trace = %result.trace, error = %e, "snapshot write failed");
            })?;

        let entry = LedgerEntry {
            id: LedgerEntryId::new(),
            route_id: input.route_id.clone(),
            driver_id: input.driver_id.clone(),
            config_version: result.config_version.clone(),
            service_version: self.service_version.clone(),
            rate_cents,
            total_cents,
            parcel_count,
            planned_distance_km: input.planned_distance_km,
            snapshot_path: snapshot_location.clone(),
            input_hash: result.trace.clone(),
            output_hash: out_hash,
            created_at: None,
        };

        let ledger_entry = self.ledger.append(entry).inspect_err(|e| {
            tracing::error!(
                route_id = %input.route_id,
                snapshot = %snapshot_location,
                error = %e,
                "ledger append failed, snapshot left orphaned"
            );
        })?;

        tracing::info!(
            route_id = %input.route_id,
            trace = %result.trace,
            ledger_id = %ledger_entry.id,
            snapshot = %snapshot_location,
            total_cents,
            "quote persisted"
        );

        Ok(PersistReceipt {
            snapshot_location,
            ledger_entry,
        })
    }
}
