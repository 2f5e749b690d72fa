//! BDD scenarios for the snapshot lifecycle.

use rstest_bdd_macros::scenario;

use super::test_helpers::{SnapshotContext, snapshot_context};

#[scenario(
    path = "tests/features/snapshot_lifecycle.feature",
    name = "Snapshot a volume and tag the clone"
)]
fn scenario_snapshot_and_tag(snapshot_context: SnapshotContext) {
    drop(snapshot_context);
}

#[scenario(
    path = "tests/features/snapshot_lifecycle.feature",
    name = "Keep the snapshot when tagging fails"
)]
fn scenario_tag_failure_is_advisory(snapshot_context: SnapshotContext) {
    drop(snapshot_context);
}

#[scenario(
    path = "tests/features/snapshot_lifecycle.feature",
    name = "Fail the snapshot when cloning fails"
)]
fn scenario_clone_failure_is_fatal(snapshot_context: SnapshotContext) {
    drop(snapshot_context);
}

#[scenario(
    path = "tests/features/snapshot_lifecycle.feature",
    name = "Restore a volume from a snapshot"
)]
fn scenario_restore(snapshot_context: SnapshotContext) {
    drop(snapshot_context);
}

#[scenario(
    path = "tests/features/snapshot_lifecycle.feature",
    name = "Surface delete failures"
)]
fn scenario_delete_failure(snapshot_context: SnapshotContext) {
    drop(snapshot_context);
}

#[scenario(
    path = "tests/features/snapshot_lifecycle.feature",
    name = "Reject malformed identifiers before calling the provider"
)]
fn scenario_malformed_identifier(snapshot_context: SnapshotContext) {
    drop(snapshot_context);
}
