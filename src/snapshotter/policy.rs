//! Which provider failures abort an operation and which are only logged.

use std::fmt;

/// Snapshotter operations that talk to the provider.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// Restoring a volume from a snapshot.
    CreateVolumeFromSnapshot,
    /// Snapshotting a volume.
    CreateSnapshot,
    /// Deleting a snapshot.
    DeleteSnapshot,
    /// Looking up volume type and IOPS.
    GetVolumeInfo,
}

impl Operation {
    /// Stable name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateVolumeFromSnapshot => "create_volume_from_snapshot",
            Self::CreateSnapshot => "create_snapshot",
            Self::DeleteSnapshot => "delete_snapshot",
            Self::GetVolumeInfo => "get_volume_info",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider calls made within an operation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Step {
    /// Fetching the source volume; the result is discarded.
    ExistenceCheck,
    /// Cloning the source volume.
    Clone,
    /// Replacing the tag set of a fresh clone.
    ApplyTags,
    /// Deleting a volume.
    Delete,
}

impl Step {
    /// Stable name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExistenceCheck => "existence check",
            Self::Clone => "clone",
            Self::ApplyTags => "tag update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consequence of a failed step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailurePolicy {
    /// The operation stops and returns the error.
    Fatal,
    /// The error is logged and the operation carries on.
    Advisory,
}

/// Looks up how a failure of `step` is handled within `operation`.
///
/// | operation                     | step            | policy   |
/// |-------------------------------|-----------------|----------|
/// | create_volume_from_snapshot   | existence check | advisory |
/// | create_volume_from_snapshot   | clone           | fatal    |
/// | create_snapshot               | existence check | advisory |
/// | create_snapshot               | clone           | fatal    |
/// | create_snapshot               | tag update      | advisory |
/// | delete_snapshot               | delete          | fatal    |
/// | get_volume_info               | existence check | advisory |
///
/// Pairs outside the table are fatal.
#[must_use]
pub const fn failure_policy(operation: Operation, step: Step) -> FailurePolicy {
    match (operation, step) {
        (
            Operation::CreateVolumeFromSnapshot | Operation::CreateSnapshot | Operation::GetVolumeInfo,
            Step::ExistenceCheck,
        )
        | (Operation::CreateSnapshot, Step::ApplyTags) => FailurePolicy::Advisory,
        _ => FailurePolicy::Fatal,
    }
}
