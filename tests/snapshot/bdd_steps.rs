//! BDD step definitions for the snapshot lifecycle.

use linode_snapshotter::test_support::{FailingCall, VolumeCall};
use linode_snapshotter::{SnapshotTags, SnapshotterError, VolumeSnapshotter};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{LifecycleOutcome, SnapshotContext, block_on};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a snapshotter backed by a scripted provider")]
fn scripted_snapshotter(snapshot_context: SnapshotContext) -> SnapshotContext {
    snapshot_context
}

#[given("the provider rejects tag updates")]
fn provider_rejects_tags(snapshot_context: SnapshotContext) -> SnapshotContext {
    snapshot_context.api.fail(FailingCall::ReplaceTags);
    snapshot_context
}

#[given("the provider rejects clones")]
fn provider_rejects_clones(snapshot_context: SnapshotContext) -> SnapshotContext {
    snapshot_context.api.fail(FailingCall::Clone);
    snapshot_context
}

#[given("the provider rejects deletes")]
fn provider_rejects_deletes(snapshot_context: SnapshotContext) -> SnapshotContext {
    snapshot_context.api.fail(FailingCall::Delete);
    snapshot_context
}

#[when("I snapshot volume \"{volume_id}\" with tag \"{key}\" set to \"{value}\"")]
fn snapshot_volume(
    mut snapshot_context: SnapshotContext,
    volume_id: String,
    key: String,
    value: String,
) -> SnapshotContext {
    let snapshotter = snapshot_context.snapshotter();
    let tags: SnapshotTags = [(key, value)].into_iter().collect();
    let result = block_on(snapshotter.create_snapshot(volume_id.trim(), "us-east", &tags));
    snapshot_context.outcome = Some(match result {
        Ok(id) => LifecycleOutcome::Id(id),
        Err(err) => LifecycleOutcome::Failure(err),
    });
    snapshot_context
}

#[when("I restore snapshot \"{snapshot_id}\"")]
fn restore_snapshot(mut snapshot_context: SnapshotContext, snapshot_id: String) -> SnapshotContext {
    let snapshotter = snapshot_context.snapshotter();
    let result = block_on(snapshotter.create_volume_from_snapshot(
        snapshot_id.trim(),
        "auto",
        "us-east",
        None,
    ));
    snapshot_context.outcome = Some(match result {
        Ok(id) => LifecycleOutcome::Id(id),
        Err(err) => LifecycleOutcome::Failure(err),
    });
    snapshot_context
}

#[when("I delete snapshot \"{snapshot_id}\"")]
fn delete_snapshot(mut snapshot_context: SnapshotContext, snapshot_id: String) -> SnapshotContext {
    let snapshotter = snapshot_context.snapshotter();
    let result = block_on(snapshotter.delete_snapshot(snapshot_id.trim()));
    snapshot_context.outcome = Some(match result {
        Ok(()) => LifecycleOutcome::Deleted,
        Err(err) => LifecycleOutcome::Failure(err),
    });
    snapshot_context
}

#[then("the operation returns id \"{expected}\"")]
fn returns_id(snapshot_context: &SnapshotContext, expected: String) -> Result<(), StepError> {
    match snapshot_context.outcome.as_ref() {
        Some(LifecycleOutcome::Id(id)) if id == expected.trim() => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected id {expected}, got {other:?}"
        ))),
    }
}

#[then("the operation fails at the \"{step}\" step")]
fn fails_at_step(snapshot_context: &SnapshotContext, step: String) -> Result<(), StepError> {
    let Some(LifecycleOutcome::Failure(err)) = snapshot_context.outcome.as_ref() else {
        return Err(StepError::Assertion(format!(
            "expected failure, got {:?}",
            snapshot_context.outcome
        )));
    };
    match err {
        SnapshotterError::ProviderRequestFailed { step: failed, .. }
            if failed.as_str() == step.trim() =>
        {
            Ok(())
        }
        other => Err(StepError::Assertion(format!(
            "expected {step} failure, got {other}"
        ))),
    }
}

#[then("the operation fails with a malformed identifier")]
fn fails_with_malformed_identifier(snapshot_context: &SnapshotContext) -> Result<(), StepError> {
    match snapshot_context.outcome.as_ref() {
        Some(LifecycleOutcome::Failure(SnapshotterError::MalformedIdentifier(_))) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected malformed identifier, got {other:?}"
        ))),
    }
}

#[then("the provider cloned volume {volume_id}")]
fn provider_cloned(snapshot_context: &SnapshotContext, volume_id: u64) -> Result<(), StepError> {
    let cloned = snapshot_context.api.calls().iter().any(|call| {
        matches!(call, VolumeCall::Clone { volume_id: source, .. } if *source == volume_id)
    });
    if cloned {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected a clone of volume {volume_id}"
        )))
    }
}

#[then("the clone carries tag \"{tag}\"")]
fn clone_carries_tag(snapshot_context: &SnapshotContext, tag: String) -> Result<(), StepError> {
    let calls = snapshot_context.api.calls();
    let tagged = calls.iter().any(|call| {
        matches!(call, VolumeCall::ReplaceTags { tags, .. } if tags.iter().any(|t| t == tag.trim()))
    });
    if tagged {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected tag {tag} in calls {calls:?}"
        )))
    }
}

#[then("no tags are applied")]
fn no_tags_applied(snapshot_context: &SnapshotContext) -> Result<(), StepError> {
    let calls = snapshot_context.api.calls();
    if calls
        .iter()
        .any(|call| matches!(call, VolumeCall::ReplaceTags { .. }))
    {
        return Err(StepError::Assertion(format!(
            "expected no tag update, got {calls:?}"
        )));
    }
    Ok(())
}

#[then("no volume is deleted")]
fn no_volume_deleted(snapshot_context: &SnapshotContext) -> Result<(), StepError> {
    let calls = snapshot_context.api.calls();
    if calls
        .iter()
        .any(|call| matches!(call, VolumeCall::Delete { .. }))
    {
        return Err(StepError::Assertion(format!(
            "expected no delete, got {calls:?}"
        )));
    }
    Ok(())
}

#[then("the provider was not called")]
fn provider_not_called(snapshot_context: &SnapshotContext) -> Result<(), StepError> {
    let calls = snapshot_context.api.calls();
    if calls.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected no provider calls, got {calls:?}"
        )))
    }
}
