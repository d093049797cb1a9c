//! Rate Engine Service
//!
//! Prices parcel quotes and, on request, records them: validation, rate
//! clamp, canonical trace, then snapshot followed by a ledger row that
//! references it.

pub mod engine;
pub mod errors;

pub use engine::{quote, QuoteEngine, QuoteOutcome, PersistReceipt, SERVICE_VERSION};
pub use errors::QuoteError;
