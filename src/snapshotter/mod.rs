//! Snapshot backend for Linode Block Storage.
//!
//! Linode has no snapshot object, only volumes and a clone operation. A
//! snapshot is therefore a cloned volume, and deleting a snapshot is the
//! same provider call as deleting a volume.

mod error;
mod lifecycle;
pub mod policy;

use crate::backend::{BackendFuture, PluginOptions, SnapshotTags, VolumeInfo, VolumeSnapshotter};
use crate::config::LinodeConfig;
use crate::linode::LinodeClient;
use crate::record::{self, PersistedVolume};
use crate::volume::{ProviderError, VolumeApi};

pub use error::SnapshotterError;
pub use policy::{FailurePolicy, Operation, Step, failure_policy};

/// Volume type reported for every volume; Linode does not expose one.
pub const SYNTHETIC_VOLUME_TYPE: &str = "auto";

/// Volume snapshot backend built on a [`VolumeApi`].
///
/// The backend keeps no state between calls. Concurrent requests share the
/// provider client and are neither serialised nor deduplicated.
#[derive(Clone, Debug)]
pub struct LinodeSnapshotter<A = LinodeClient> {
    api: A,
    options: PluginOptions,
}

impl LinodeSnapshotter<LinodeClient> {
    /// Stores `options` and binds a Linode client to the configured token.
    ///
    /// The token is not checked here; a bad or missing token surfaces on the
    /// first provider call.
    #[must_use]
    pub fn init(options: PluginOptions, config: &LinodeConfig) -> Self {
        tracing::info!(
            options = options.len(),
            api_url = %config.api_url,
            "initialising linode snapshotter"
        );
        Self::with_api(LinodeClient::from_config(config), options)
    }
}

impl<A: VolumeApi> LinodeSnapshotter<A> {
    /// Builds a backend around an existing provider client.
    #[must_use]
    pub const fn with_api(api: A, options: PluginOptions) -> Self {
        Self { api, options }
    }

    /// Options captured at initialisation. They are stored but not
    /// interpreted.
    #[must_use]
    pub const fn options(&self) -> &PluginOptions {
        &self.options
    }

    /// Provider client used by the backend.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Applies the failure policy to the result of a provider call.
    ///
    /// Advisory failures are logged and yield `Ok(None)`.
    fn settle<T>(
        operation: Operation,
        step: Step,
        volume_id: u64,
        result: Result<T, ProviderError>,
    ) -> Result<Option<T>, SnapshotterError> {
        match (result, failure_policy(operation, step)) {
            (Ok(value), _) => Ok(Some(value)),
            (Err(source), FailurePolicy::Advisory) => {
                tracing::warn!(
                    %operation,
                    %step,
                    volume_id,
                    error = %source,
                    "advisory provider call failed; continuing"
                );
                Ok(None)
            }
            (Err(source), FailurePolicy::Fatal) => {
                Self::require(operation, step, volume_id, Err(source)).map(Some)
            }
        }
    }

    /// Unwraps the result of a step whose output the operation needs.
    fn require<T>(
        operation: Operation,
        step: Step,
        volume_id: u64,
        result: Result<T, ProviderError>,
    ) -> Result<T, SnapshotterError> {
        result.map_err(|source| {
            tracing::error!(%operation, %step, volume_id, error = %source, "provider call failed");
            SnapshotterError::ProviderRequestFailed {
                operation,
                step,
                source,
            }
        })
    }
}

impl<A: VolumeApi> VolumeSnapshotter for LinodeSnapshotter<A> {
    type Error = SnapshotterError;

    fn create_volume_from_snapshot<'a>(
        &'a self,
        snapshot_id: &'a str,
        volume_type: &'a str,
        zone: &'a str,
        iops: Option<i64>,
    ) -> BackendFuture<'a, String, Self::Error> {
        Box::pin(async move {
            tracing::info!(snapshot_id, volume_type, zone, ?iops, "create_volume_from_snapshot called");
            self.restore_volume(snapshot_id).await
        })
    }

    fn get_volume_info<'a>(
        &'a self,
        volume_id: &'a str,
        zone: &'a str,
    ) -> BackendFuture<'a, VolumeInfo, Self::Error> {
        Box::pin(async move {
            tracing::info!(volume_id, zone, "get_volume_info called");
            self.describe_volume(volume_id).await
        })
    }

    fn is_volume_ready(&self, volume_id: &str, zone: &str) -> bool {
        tracing::debug!(volume_id, zone, "is_volume_ready called; volumes are always ready");
        true
    }

    fn create_snapshot<'a>(
        &'a self,
        volume_id: &'a str,
        zone: &'a str,
        tags: &'a SnapshotTags,
    ) -> BackendFuture<'a, String, Self::Error> {
        Box::pin(async move {
            tracing::info!(volume_id, zone, tags = tags.len(), "create_snapshot called");
            self.snapshot_volume(volume_id, tags).await
        })
    }

    fn delete_snapshot<'a>(&'a self, snapshot_id: &'a str) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move {
            tracing::info!(snapshot_id, "delete_snapshot called");
            self.remove_snapshot(snapshot_id).await
        })
    }

    fn get_volume_id(&self, record: &PersistedVolume) -> Result<String, Self::Error> {
        let volume_id = record::get_volume_id(record)?;
        tracing::info!(%volume_id, "get_volume_id resolved volume handle");
        Ok(volume_id)
    }

    fn set_volume_id(
        &self,
        record: &PersistedVolume,
        volume_id: &str,
    ) -> Result<PersistedVolume, Self::Error> {
        tracing::info!(volume_id, "set_volume_id called");
        Ok(record::set_volume_id(record, volume_id)?)
    }
}
