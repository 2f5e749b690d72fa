//! Access to the CSI volume handle stored in persisted volume records.
//!
//! The orchestrator hands over records as untyped JSON objects. They are
//! converted into a minimal `PersistentVolume` shape that keeps every field
//! it does not know about, so rewriting the handle leaves the rest of the
//! record untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Untyped persisted volume record as exchanged with the orchestrator.
pub type PersistedVolume = Map<String, Value>;

/// Errors raised by the record adapter.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RecordError {
    /// Raised when the record lacks the expected CSI structure.
    #[error("persisted volume does not match the expected schema: {message}")]
    SchemaMismatch {
        /// Description of the mismatch.
        message: String,
    },
    /// Raised when the volume handle is absent or empty.
    #[error("persisted volume has no CSI volume handle")]
    MissingIdentifier,
}

impl RecordError {
    fn schema(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct PersistentVolume {
    #[serde(default)]
    spec: PersistentVolumeSpec,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct PersistentVolumeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    csi: Option<CsiVolumeSource>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CsiVolumeSource {
    #[serde(default)]
    volume_handle: String,
    #[serde(flatten)]
    other: Map<String, Value>,
}

impl PersistentVolume {
    fn from_record(record: &PersistedVolume) -> Result<Self, RecordError> {
        serde_json::from_value(Value::Object(record.clone()))
            .map_err(|err| RecordError::schema(err.to_string()))
    }

    fn into_record(self) -> Result<PersistedVolume, RecordError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(record)) => Ok(record),
            Ok(_) => Err(RecordError::schema("record did not serialise to an object")),
            Err(err) => Err(RecordError::schema(err.to_string())),
        }
    }

    fn csi_mut(&mut self) -> Result<&mut CsiVolumeSource, RecordError> {
        self.spec
            .csi
            .as_mut()
            .ok_or_else(|| RecordError::schema("spec.csi is missing"))
    }
}

/// Returns the CSI volume handle stored in `record`.
///
/// # Errors
///
/// Returns [`RecordError::SchemaMismatch`] when the record has no
/// `spec.csi` section and [`RecordError::MissingIdentifier`] when the handle
/// is empty.
pub fn get_volume_id(record: &PersistedVolume) -> Result<String, RecordError> {
    let mut volume = PersistentVolume::from_record(record)?;
    let csi = volume.csi_mut()?;
    if csi.volume_handle.is_empty() {
        return Err(RecordError::MissingIdentifier);
    }
    Ok(std::mem::take(&mut csi.volume_handle))
}

/// Returns a copy of `record` with its CSI volume handle set to `volume_id`.
///
/// The CSI section is never created; records without one are rejected.
///
/// # Errors
///
/// Returns [`RecordError::SchemaMismatch`] when the record has no
/// `spec.csi` section and [`RecordError::MissingIdentifier`] when
/// `volume_id` is empty.
pub fn set_volume_id(
    record: &PersistedVolume,
    volume_id: &str,
) -> Result<PersistedVolume, RecordError> {
    let mut volume = PersistentVolume::from_record(record)?;
    let csi = volume.csi_mut()?;
    if volume_id.is_empty() {
        return Err(RecordError::MissingIdentifier);
    }
    csi.volume_handle = volume_id.to_owned();
    volume.into_record()
}
