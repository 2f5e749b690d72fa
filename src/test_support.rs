//! Test support utilities shared across unit and integration tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::BackendFuture;
use crate::volume::{ProviderError, ProviderVolume, VolumeApi};

/// Id handed to the first clone made through [`ScriptedVolumeApi`].
pub const FIRST_CLONE_ID: u64 = 99;

/// Provider call recorded by [`ScriptedVolumeApi`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VolumeCall {
    /// `get_volume` was invoked.
    Get {
        /// Requested volume.
        volume_id: u64,
    },
    /// `clone_volume` was invoked.
    Clone {
        /// Source volume.
        volume_id: u64,
        /// Label requested for the clone.
        label: String,
    },
    /// `replace_volume_tags` was invoked.
    ReplaceTags {
        /// Volume whose tags were replaced.
        volume_id: u64,
        /// Full replacement tag set.
        tags: Vec<String>,
    },
    /// `delete_volume` was invoked.
    Delete {
        /// Deleted volume.
        volume_id: u64,
    },
}

/// Provider calls that can be scripted to fail.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum FailingCall {
    /// Make `get_volume` fail.
    Get,
    /// Make `clone_volume` fail.
    Clone,
    /// Make `replace_volume_tags` fail.
    ReplaceTags,
    /// Make `delete_volume` fail.
    Delete,
}

#[derive(Debug)]
struct State {
    calls: Vec<VolumeCall>,
    failures: BTreeSet<FailingCall>,
    next_id: u64,
}

/// In-memory [`VolumeApi`] that records calls and fails on request.
///
/// Clones share state, so a copy kept by the test observes every call made
/// through the backend.
#[derive(Clone, Debug)]
pub struct ScriptedVolumeApi {
    state: Arc<Mutex<State>>,
}

impl Default for ScriptedVolumeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedVolumeApi {
    /// Creates an API whose calls all succeed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                calls: Vec::new(),
                failures: BTreeSet::new(),
                next_id: FIRST_CLONE_ID,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every subsequent call of the given kind fail.
    pub fn fail(&self, call: FailingCall) {
        self.lock().failures.insert(call);
    }

    /// Returns the calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<VolumeCall> {
        self.lock().calls.clone()
    }

    fn record(&self, call: VolumeCall, kind: FailingCall) -> Result<(), ProviderError> {
        let mut state = self.lock();
        let operation = describe(&call);
        state.calls.push(call);
        if state.failures.contains(&kind) {
            return Err(ProviderError::rejected(operation, 500, "scripted failure"));
        }
        Ok(())
    }

    fn allocate_id(&self) -> u64 {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        id
    }
}

fn describe(call: &VolumeCall) -> String {
    match call {
        VolumeCall::Get { volume_id } => format!("get volume {volume_id}"),
        VolumeCall::Clone { volume_id, .. } => format!("clone volume {volume_id}"),
        VolumeCall::ReplaceTags { volume_id, .. } => {
            format!("update tags of volume {volume_id}")
        }
        VolumeCall::Delete { volume_id } => format!("delete volume {volume_id}"),
    }
}

impl VolumeApi for ScriptedVolumeApi {
    fn get_volume(&self, volume_id: u64) -> BackendFuture<'_, ProviderVolume, ProviderError> {
        Box::pin(async move {
            self.record(VolumeCall::Get { volume_id }, FailingCall::Get)?;
            Ok(ProviderVolume {
                id: volume_id,
                status: String::from("active"),
                ..ProviderVolume::default()
            })
        })
    }

    fn clone_volume<'a>(
        &'a self,
        volume_id: u64,
        label: &'a str,
    ) -> BackendFuture<'a, ProviderVolume, ProviderError> {
        Box::pin(async move {
            self.record(
                VolumeCall::Clone {
                    volume_id,
                    label: label.to_owned(),
                },
                FailingCall::Clone,
            )?;
            Ok(ProviderVolume {
                id: self.allocate_id(),
                label: label.to_owned(),
                status: String::from("creating"),
                ..ProviderVolume::default()
            })
        })
    }

    fn replace_volume_tags(
        &self,
        volume_id: u64,
        tags: Vec<String>,
    ) -> BackendFuture<'_, ProviderVolume, ProviderError> {
        Box::pin(async move {
            self.record(
                VolumeCall::ReplaceTags {
                    volume_id,
                    tags: tags.clone(),
                },
                FailingCall::ReplaceTags,
            )?;
            Ok(ProviderVolume {
                id: volume_id,
                tags,
                ..ProviderVolume::default()
            })
        })
    }

    fn delete_volume(&self, volume_id: u64) -> BackendFuture<'_, (), ProviderError> {
        Box::pin(async move { self.record(VolumeCall::Delete { volume_id }, FailingCall::Delete) })
    }
}
