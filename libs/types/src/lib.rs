//! Types library for the parcel rate engine
//!
//! Core type definitions and pure computations shared by the persistence,
//! engine and gateway crates. Nothing in here performs I/O.
//!
//! # Modules
//! - `ids`: Identifiers (LedgerEntryId, RouteId, DriverId)
//! - `quote`: Quote request/result types and free-form metadata
//! - `pricing`: Pricing parameters, rate clamp and cents rounding
//! - `trace`: Canonical input hash and output hash
//! - `errors`: Validation error taxonomy

// Public modules
pub mod ids;
pub mod quote;
pub mod pricing;
pub mod trace;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::quote::*;
    pub use crate::pricing::*;
    pub use crate::trace::*;
    pub use crate::errors::*;
}
