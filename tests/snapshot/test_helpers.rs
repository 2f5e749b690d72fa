//! Shared fixtures for snapshot lifecycle BDD scenarios.

use std::future::Future;

use linode_snapshotter::test_support::ScriptedVolumeApi;
use linode_snapshotter::{LinodeSnapshotter, PluginOptions, SnapshotterError};
use rstest::fixture;
use tokio::runtime::Runtime;

#[derive(Clone, Debug)]
pub enum LifecycleOutcome {
    Id(String),
    Deleted,
    Failure(SnapshotterError),
}

#[derive(Clone, Debug)]
pub struct SnapshotContext {
    pub api: ScriptedVolumeApi,
    pub outcome: Option<LifecycleOutcome>,
}

impl SnapshotContext {
    pub fn snapshotter(&self) -> LinodeSnapshotter<ScriptedVolumeApi> {
        LinodeSnapshotter::with_api(self.api.clone(), PluginOptions::new())
    }
}

#[fixture]
pub fn snapshot_context() -> SnapshotContext {
    SnapshotContext {
        api: ScriptedVolumeApi::new(),
        outcome: None,
    }
}

pub fn block_on<F: Future>(future: F) -> F::Output {
    Runtime::new()
        .unwrap_or_else(|err| panic!("tokio runtime should start: {err}"))
        .block_on(future)
}
