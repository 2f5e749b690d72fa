//! Error types for the snapshotter.

use thiserror::Error;

use super::policy::{Operation, Step};
use crate::identifier::IdentifierError;
use crate::record::RecordError;
use crate::volume::ProviderError;

/// Errors surfaced to the orchestrator.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SnapshotterError {
    /// Raised when a volume or snapshot id cannot be decoded.
    #[error(transparent)]
    MalformedIdentifier(#[from] IdentifierError),
    /// Raised when a fatal provider call fails.
    #[error("{operation}: {step} failed: {source}")]
    ProviderRequestFailed {
        /// Operation that was running.
        operation: Operation,
        /// Provider call that failed.
        step: Step,
        /// Error reported by the provider client.
        #[source]
        source: ProviderError,
    },
    /// Raised when a persisted volume record cannot be read or rewritten.
    #[error(transparent)]
    Record(#[from] RecordError),
}
