//! Volume snapshot backend for Linode Block Storage.
//!
//! Linode offers volumes and a clone operation but no snapshot object. The
//! crate maps an orchestrator's snapshot lifecycle (create, restore, delete,
//! volume-handle access on persisted volume records) onto volume clones, and
//! encodes Linode volume ids into the orchestrator's identifier strings.

pub mod backend;
pub mod config;
pub mod identifier;
pub mod linode;
pub mod record;
pub mod snapshotter;
pub mod test_support;
pub mod volume;

pub use backend::{BackendFuture, PluginOptions, SnapshotTags, VolumeInfo, VolumeSnapshotter};
pub use config::{ConfigError, Credentials, LinodeConfig};
pub use identifier::{IdentifierError, VolumeIdentifier};
pub use linode::LinodeClient;
pub use record::{PersistedVolume, RecordError};
pub use snapshotter::{LinodeSnapshotter, SnapshotterError};
pub use volume::{ProviderError, ProviderVolume, VolumeApi};
