//! Display contracts for the errors surfaced to the orchestrator.

use linode_snapshotter::snapshotter::{Operation, Step};
use linode_snapshotter::{IdentifierError, ProviderError, RecordError, SnapshotterError};

#[test]
fn provider_failure_names_operation_and_step() {
    let error = SnapshotterError::ProviderRequestFailed {
        operation: Operation::CreateSnapshot,
        step: Step::Clone,
        source: ProviderError::rejected("clone volume 42", 400, "label: too long"),
    };
    assert_eq!(
        error.to_string(),
        "create_snapshot: clone failed: clone volume 42 failed: label: too long"
    );
}

#[test]
fn transport_failures_have_no_status() {
    let error = ProviderError::transport("delete volume 7", "connection refused");
    assert_eq!(error.status, None);
    assert_eq!(error.to_string(), "delete volume 7 failed: connection refused");
}

#[test]
fn malformed_identifier_is_transparent() {
    let error = SnapshotterError::from(IdentifierError::MalformedIdentifier {
        value: String::from("abc"),
        reason: String::from("missing separator"),
    });
    assert_eq!(
        error.to_string(),
        "malformed volume identifier 'abc': missing separator"
    );
}

#[test]
fn record_errors_are_transparent() {
    let error = SnapshotterError::from(RecordError::MissingIdentifier);
    assert_eq!(error.to_string(), "persisted volume has no CSI volume handle");
}
