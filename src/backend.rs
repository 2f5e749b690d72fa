//! Orchestrator-facing abstraction for volume snapshot backends.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use crate::record::PersistedVolume;

/// Tags supplied by the orchestrator when snapshotting a volume.
pub type SnapshotTags = BTreeMap<String, String>;

/// Named options handed to the backend at initialisation.
pub type PluginOptions = BTreeMap<String, String>;

/// Future returned by backend operations.
pub type BackendFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Type and provisioned IOPS of a volume.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeInfo {
    /// Provider volume type.
    pub volume_type: String,
    /// Provisioned IOPS, when the provider exposes them.
    pub iops: Option<i64>,
}

/// Operations the orchestrator invokes on a snapshot backend.
pub trait VolumeSnapshotter {
    /// Error type returned by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates a volume from a snapshot and returns the new volume id.
    fn create_volume_from_snapshot<'a>(
        &'a self,
        snapshot_id: &'a str,
        volume_type: &'a str,
        zone: &'a str,
        iops: Option<i64>,
    ) -> BackendFuture<'a, String, Self::Error>;

    /// Returns the type and IOPS of a volume.
    fn get_volume_info<'a>(
        &'a self,
        volume_id: &'a str,
        zone: &'a str,
    ) -> BackendFuture<'a, VolumeInfo, Self::Error>;

    /// Reports whether a volume can be used.
    fn is_volume_ready(&self, volume_id: &str, zone: &str) -> bool;

    /// Snapshots a volume, tags the snapshot, and returns the snapshot id.
    fn create_snapshot<'a>(
        &'a self,
        volume_id: &'a str,
        zone: &'a str,
        tags: &'a SnapshotTags,
    ) -> BackendFuture<'a, String, Self::Error>;

    /// Deletes a snapshot.
    fn delete_snapshot<'a>(&'a self, snapshot_id: &'a str) -> BackendFuture<'a, (), Self::Error>;

    /// Extracts the provider volume handle from a persisted volume record.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the record has no usable handle.
    fn get_volume_id(&self, record: &PersistedVolume) -> Result<String, Self::Error>;

    /// Returns a copy of `record` pointing at `volume_id`.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the record cannot carry a handle.
    fn set_volume_id(
        &self,
        record: &PersistedVolume,
        volume_id: &str,
    ) -> Result<PersistedVolume, Self::Error>;
}
