//! Persistence for priced quotes
//!
//! Provides the audit snapshot store, the append-only ledger log and a
//! ledger reader with corruption and integrity checks. A snapshot is always
//! written before the ledger row that points at it; ordering is the
//! caller's job (see the `rate-engine` crate), these modules only store.

pub mod snapshot;
pub mod ledger;
pub mod reader;
