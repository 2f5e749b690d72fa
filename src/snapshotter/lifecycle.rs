//! Clone-based snapshot lifecycle steps.

use crate::backend::{SnapshotTags, VolumeInfo};
use crate::identifier::{self, generate_label, parse_provider_id, resolve_provider_id};
use crate::volume::VolumeApi;

use super::{LinodeSnapshotter, Operation, SYNTHETIC_VOLUME_TYPE, SnapshotterError, Step};

const RESTORE_LABEL_PREFIX: &str = "restore-";
const SNAPSHOT_LABEL_PREFIX: &str = "vol";

/// Flattens tags into Linode's `key:value` strings.
pub(super) fn flatten_tags(tags: &SnapshotTags) -> Vec<String> {
    tags.iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect()
}

impl<A: VolumeApi> LinodeSnapshotter<A> {
    async fn check_exists(
        &self,
        operation: Operation,
        volume_id: u64,
    ) -> Result<(), SnapshotterError> {
        let result = self.api.get_volume(volume_id).await;
        Self::settle(operation, Step::ExistenceCheck, volume_id, result).map(drop)
    }

    /// Clones the snapshot volume into a new volume and returns its bare id.
    pub(super) async fn restore_volume(&self, snapshot_id: &str) -> Result<String, SnapshotterError> {
        let operation = Operation::CreateVolumeFromSnapshot;
        let source = parse_provider_id(snapshot_id)
            .inspect_err(|err| tracing::error!(%operation, error = %err, "rejecting snapshot id"))?;

        self.check_exists(operation, source).await?;

        let label = generate_label(&format!("{RESTORE_LABEL_PREFIX}{snapshot_id}"));
        let result = self.api.clone_volume(source, &label).await;
        let volume = Self::require(operation, Step::Clone, source, result)?;

        tracing::info!(source, volume_id = volume.id, %label, "restored volume from snapshot");
        Ok(volume.id.to_string())
    }

    /// Clones the volume behind `volume_id`, tags the clone, and returns the
    /// clone's bare id.
    ///
    /// A failed tag update leaves an untagged clone behind; it is neither
    /// retried nor deleted.
    pub(super) async fn snapshot_volume(
        &self,
        volume_id: &str,
        tags: &SnapshotTags,
    ) -> Result<String, SnapshotterError> {
        let operation = Operation::CreateSnapshot;
        let source = identifier::decode(volume_id)
            .inspect_err(|err| tracing::error!(%operation, error = %err, "rejecting volume id"))?
            .provider_id();

        self.check_exists(operation, source).await?;

        let label = generate_label(&format!("{SNAPSHOT_LABEL_PREFIX}{volume_id}"));
        let result = self.api.clone_volume(source, &label).await;
        let snapshot = Self::require(operation, Step::Clone, source, result)?;
        tracing::info!(source, snapshot_id = snapshot.id, %label, "cloned volume as snapshot");

        // The clone starts without tags, so replacing the set is safe here.
        let result = self
            .api
            .replace_volume_tags(snapshot.id, flatten_tags(tags))
            .await;
        Self::settle(operation, Step::ApplyTags, snapshot.id, result)?;

        Ok(snapshot.id.to_string())
    }

    /// Deletes the volume standing in for a snapshot.
    pub(super) async fn remove_snapshot(&self, snapshot_id: &str) -> Result<(), SnapshotterError> {
        let operation = Operation::DeleteSnapshot;
        let volume_id = resolve_provider_id(snapshot_id)
            .inspect_err(|err| tracing::error!(%operation, error = %err, "rejecting snapshot id"))?;

        let result = self.api.delete_volume(volume_id).await;
        Self::settle(operation, Step::Delete, volume_id, result)?;
        tracing::info!(volume_id, "deleted snapshot volume");
        Ok(())
    }

    /// Reports the synthetic volume type; Linode exposes neither type nor
    /// IOPS per volume.
    pub(super) async fn describe_volume(
        &self,
        volume_id: &str,
    ) -> Result<VolumeInfo, SnapshotterError> {
        let operation = Operation::GetVolumeInfo;
        let source = identifier::decode(volume_id)
            .inspect_err(|err| tracing::error!(%operation, error = %err, "rejecting volume id"))?
            .provider_id();

        self.check_exists(operation, source).await?;

        Ok(VolumeInfo {
            volume_type: SYNTHETIC_VOLUME_TYPE.to_owned(),
            iops: None,
        })
    }
}
