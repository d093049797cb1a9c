//! Error types for quote processing

use rate_persistence::ledger::LedgerError;
use rate_persistence::snapshot::SnapshotError;
use rate_types::errors::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Snapshot write failed: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Ledger append failed: {0}")]
    Ledger(#[from] LedgerError),
}

impl QuoteError {
    /// Snapshot or ledger failure, as opposed to a rejected request.
    pub fn is_persistence(&self) -> bool {
        matches!(self, QuoteError::Snapshot(_) | QuoteError::Ledger(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_validation_is_not_persistence() {
        let err: QuoteError = ValidationError::ParcelCountTooLow(0).into();
        assert!(!err.is_persistence());
        assert!(err.to_string().contains("parcelCount"));
    }

    #[test]
    fn test_storage_errors_are_persistence() {
        let snap: QuoteError = SnapshotError::Io(io::Error::other("disk full")).into();
        let ledger: QuoteError = LedgerError::Io(io::Error::other("disk full")).into();
        assert!(snap.is_persistence());
        assert!(ledger.is_persistence());
    }
}
