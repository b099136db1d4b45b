//! Index maintenance operations over a [`ClusterTransport`].
//!
//! Queries run immediately and return typed values. Mutations are returned
//! as [`Task`]s so they can be composed, printed in a plan, and executed with
//! [`ClusterOperations::run`].

use esmaint_client::{
    ClusterTransport, ElasticsearchIndex, ElasticsearchRecovery, FlatSettings, SettingsPatch,
};
use tracing::info;

use crate::cancellation::Context;
use crate::error::TaskError;
use crate::recovery::RecoveryWaiter;
use crate::task::{Step, Task};

pub const SETTING_CODEC: &str = "index.codec";
pub const CODEC_BEST_COMPRESSION: &str = "best_compression";
pub const SETTING_BLOCKS_WRITE: &str = "index.blocks.write";
pub const SETTING_EXCLUDE_DISKTYPE: &str = "index.routing.allocation.exclude.disktype";
pub const SETTING_REQUIRE_DISKTYPE: &str = "index.routing.allocation.require.disktype";
pub const DISKTYPE_HDD: &str = "hdd";

/// Operations against one cluster.
#[derive(Debug, Clone)]
pub struct ClusterOperations<T> {
    transport: T,
    waiter: RecoveryWaiter,
}

impl<T: ClusterTransport> ClusterOperations<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            waiter: RecoveryWaiter::default(),
        }
    }

    /// Use `waiter` for [`Self::wait_for_recoveries`] tasks.
    pub fn with_recovery_waiter(mut self, waiter: RecoveryWaiter) -> Self {
        self.waiter = waiter;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a task built by this type (or any other) against the cluster.
    pub async fn run(&self, task: &Task, ctx: &Context) -> Result<(), TaskError> {
        info!(%task, "running task");
        task.run(&self.transport, ctx).await
    }

    // Queries

    pub async fn list(&self, ctx: &Context) -> Result<Vec<ElasticsearchIndex>, TaskError> {
        ctx.run(self.transport.list_indices()).await
    }

    /// Flat settings of `index`.
    ///
    /// # Errors
    ///
    /// `SettingsNotFound` when the cluster returns nothing for the index.
    pub async fn get_settings(
        &self,
        index: &str,
        ctx: &Context,
    ) -> Result<FlatSettings, TaskError> {
        ctx.run(self.transport.get_settings(index))
            .await?
            .ok_or_else(|| TaskError::SettingsNotFound {
                index: index.to_string(),
            })
    }

    pub async fn is_best_compression(&self, index: &str, ctx: &Context) -> Result<bool, TaskError> {
        let settings = self.get_settings(index, ctx).await?;
        Ok(settings.get_str(SETTING_CODEC) == Some(CODEC_BEST_COMPRESSION))
    }

    /// True when no disk type is excluded and hdd is required.
    pub async fn is_routing_hdd(&self, index: &str, ctx: &Context) -> Result<bool, TaskError> {
        let settings = self.get_settings(index, ctx).await?;
        let exclude = settings.get_str(SETTING_EXCLUDE_DISKTYPE).unwrap_or_default();
        let require = settings.get_str(SETTING_REQUIRE_DISKTYPE);
        Ok(exclude.is_empty() && require == Some(DISKTYPE_HDD))
    }

    pub async fn active_recoveries(
        &self,
        ctx: &Context,
    ) -> Result<Vec<ElasticsearchRecovery>, TaskError> {
        ctx.run(self.transport.list_active_recoveries()).await
    }

    // Task builders

    pub fn open(&self, index: &str) -> Task {
        Step::Open {
            index: index.to_string(),
        }
        .into()
    }

    pub fn close(&self, index: &str) -> Task {
        Step::Close {
            index: index.to_string(),
        }
        .into()
    }

    pub fn set_settings(&self, index: &str, patch: SettingsPatch) -> Task {
        Step::PutSettings {
            index: index.to_string(),
            patch,
        }
        .into()
    }

    /// Close, switch the codec, and always reopen.
    pub fn set_best_compression(&self, index: &str) -> Task {
        Task::fail_safe(
            Task::serial([
                self.close(index),
                self.set_settings(
                    index,
                    SettingsPatch::new().set(SETTING_CODEC, CODEC_BEST_COMPRESSION),
                ),
            ]),
            self.open(index),
        )
    }

    /// Drop any disk type exclusion and require hdd nodes.
    pub fn set_routing_hdd(&self, index: &str) -> Task {
        self.set_settings(
            index,
            SettingsPatch::new()
                .clear(SETTING_EXCLUDE_DISKTYPE)
                .set(SETTING_REQUIRE_DISKTYPE, DISKTYPE_HDD),
        )
    }

    /// Block writes, or remove the block so the cluster default applies.
    pub fn set_read_only(&self, index: &str, read_only: bool) -> Task {
        let patch = if read_only {
            SettingsPatch::new().set(SETTING_BLOCKS_WRITE, true)
        } else {
            SettingsPatch::new().clear(SETTING_BLOCKS_WRITE)
        };
        self.set_settings(index, patch)
    }

    /// Block writes, merge to a single segment, and always unblock.
    pub fn merge_index(&self, index: &str) -> Task {
        Task::fail_safe(
            Task::serial([
                self.set_read_only(index, true),
                Step::ForceMerge {
                    index: index.to_string(),
                    max_num_segments: 1,
                }
                .into(),
            ]),
            self.set_read_only(index, false),
        )
    }

    pub fn delete(&self, index: &str) -> Task {
        Step::Delete {
            index: index.to_string(),
        }
        .into()
    }

    pub fn wait_for_recoveries(&self) -> Task {
        Step::WaitForRecoveries {
            waiter: self.waiter,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCluster;

    #[test]
    fn test_set_best_compression_shape() {
        let ops = ClusterOperations::new(FakeCluster::new());
        assert_eq!(
            ops.set_best_compression("logs-2020-01-01").to_string(),
            "failsafe(serial(close logs-2020-01-01, put-settings logs-2020-01-01 {index.codec=\"best_compression\"}), then open logs-2020-01-01)"
        );
    }

    #[test]
    fn test_merge_index_shape() {
        let ops = ClusterOperations::new(FakeCluster::new());
        assert_eq!(
            ops.merge_index("logs-2020-01-01").to_string(),
            "failsafe(serial(put-settings logs-2020-01-01 {index.blocks.write=true}, force-merge logs-2020-01-01 max_num_segments=1), then put-settings logs-2020-01-01 {index.blocks.write=null})"
        );
    }

    #[test]
    fn test_set_routing_hdd_patch() {
        let ops = ClusterOperations::new(FakeCluster::new());
        let task = ops.set_routing_hdd("logs-2020-01-01");
        assert_eq!(
            task.to_string(),
            "put-settings logs-2020-01-01 {index.routing.allocation.exclude.disktype=null, index.routing.allocation.require.disktype=\"hdd\"}"
        );
    }
}
