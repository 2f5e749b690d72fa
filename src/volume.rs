//! Provider-facing volume operations consumed by the snapshotter.

use serde::Deserialize;
use thiserror::Error;

use crate::backend::BackendFuture;

/// Volume as reported by the provider.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ProviderVolume {
    /// Provider-assigned numeric identifier.
    pub id: u64,
    /// Volume label (at most 32 characters on Linode).
    #[serde(default)]
    pub label: String,
    /// Lifecycle status such as `creating` or `active`.
    #[serde(default)]
    pub status: String,
    /// Region hosting the volume.
    #[serde(default)]
    pub region: String,
    /// Size in gigabytes.
    #[serde(default)]
    pub size: u64,
    /// Tags attached to the volume.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Failure reported by a provider call.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{operation} failed: {message}")]
pub struct ProviderError {
    /// Provider operation that failed (for example `clone volume 42`).
    pub operation: String,
    /// HTTP status when the provider answered at all.
    pub status: Option<u16>,
    /// Message returned by the provider or transport.
    pub message: String,
}

impl ProviderError {
    /// Creates an error for a call that never received a response.
    #[must_use]
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Creates an error for a call the provider rejected.
    #[must_use]
    pub fn rejected(operation: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Volume operations exposed by a block-storage provider.
///
/// Implementations must be safe to share between concurrent requests.
pub trait VolumeApi: Send + Sync {
    /// Fetches a volume by id.
    fn get_volume(&self, volume_id: u64) -> BackendFuture<'_, ProviderVolume, ProviderError>;

    /// Clones `volume_id` into a new volume named `label`.
    fn clone_volume<'a>(
        &'a self,
        volume_id: u64,
        label: &'a str,
    ) -> BackendFuture<'a, ProviderVolume, ProviderError>;

    /// Replaces the full tag set of a volume.
    fn replace_volume_tags(
        &self,
        volume_id: u64,
        tags: Vec<String>,
    ) -> BackendFuture<'_, ProviderVolume, ProviderError>;

    /// Deletes a volume.
    fn delete_volume(&self, volume_id: u64) -> BackendFuture<'_, (), ProviderError>;
}
