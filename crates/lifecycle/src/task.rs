//! Composable cluster tasks.
//!
//! A [`Task`] is a data description of work against a cluster: a single
//! [`Step`], a serial chain, or a failsafe pair whose compensating half always
//! runs once the primary half has settled. Tasks hold no cluster state, so the
//! same task can be printed in a plan, run, and run again.
//!
//! Outcome of `FailSafe { primary, compensate }`:
//!
//! | primary | compensate | result                      |
//! |---------|------------|-----------------------------|
//! | ok      | ok         | ok                          |
//! | ok      | err        | compensating error          |
//! | err     | ok         | primary error               |
//! | err     | err        | `TaskError::Compensation`   |

use std::fmt;

use esmaint_client::{ClusterTransport, SettingUpdate, SettingsPatch};
use futures::future::BoxFuture;
use tracing::debug;

use crate::cancellation::Context;
use crate::error::TaskError;
use crate::recovery::RecoveryWaiter;

/// One cluster mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Open an index and wait for all shards to become active.
    Open { index: String },
    Close { index: String },
    PutSettings { index: String, patch: SettingsPatch },
    ForceMerge { index: String, max_num_segments: u32 },
    Delete { index: String },
    /// Block until the cluster reports no active recoveries.
    WaitForRecoveries { waiter: RecoveryWaiter },
}

impl Step {
    /// The index this step mutates, if any.
    pub fn index(&self) -> Option<&str> {
        match self {
            Self::Open { index }
            | Self::Close { index }
            | Self::PutSettings { index, .. }
            | Self::ForceMerge { index, .. }
            | Self::Delete { index } => Some(index),
            Self::WaitForRecoveries { .. } => None,
        }
    }

    pub async fn run<T: ClusterTransport>(
        &self,
        transport: &T,
        ctx: &Context,
    ) -> Result<(), TaskError> {
        debug!(step = %self, "running step");
        match self {
            Self::Open { index } => ctx.run(transport.open_index(index)).await,
            Self::Close { index } => ctx.run(transport.close_index(index)).await,
            Self::PutSettings { index, patch } => {
                ctx.run(transport.put_settings(index, patch)).await
            }
            Self::ForceMerge {
                index,
                max_num_segments,
            } => {
                ctx.run(transport.force_merge(index, *max_num_segments))
                    .await
            }
            Self::Delete { index } => ctx.run(transport.delete_index(index)).await,
            Self::WaitForRecoveries { waiter } => waiter.wait(transport, ctx).await,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { index } => write!(f, "open {index}"),
            Self::Close { index } => write!(f, "close {index}"),
            Self::PutSettings { index, patch } => {
                write!(f, "put-settings {index} {{")?;
                let mut first = true;
                for (key, update) in patch.iter() {
                    let value = match update {
                        SettingUpdate::Unset => continue,
                        SettingUpdate::Set(value) => value.to_string(),
                        SettingUpdate::Clear => "null".to_string(),
                    };
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
            Self::ForceMerge {
                index,
                max_num_segments,
            } => write!(f, "force-merge {index} max_num_segments={max_num_segments}"),
            Self::Delete { index } => write!(f, "delete {index}"),
            Self::WaitForRecoveries { .. } => f.write_str("wait-for-recoveries"),
        }
    }
}

/// A composable unit of cluster work.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Step(Step),
    /// Run children in order, stopping at the first failure.
    Serial(Vec<Task>),
    /// Run `primary`, then always run `compensate`.
    FailSafe {
        primary: Box<Task>,
        compensate: Box<Task>,
    },
}

impl Task {
    pub fn serial(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self::Serial(tasks.into_iter().collect())
    }

    pub fn fail_safe(primary: Task, compensate: Task) -> Self {
        Self::FailSafe {
            primary: Box::new(primary),
            compensate: Box::new(compensate),
        }
    }

    /// Leaf steps in execution order, assuming every step succeeds.
    pub fn steps(&self) -> Vec<&Step> {
        match self {
            Self::Step(step) => vec![step],
            Self::Serial(tasks) => tasks.iter().flat_map(Task::steps).collect(),
            Self::FailSafe {
                primary,
                compensate,
            } => {
                let mut steps = primary.steps();
                steps.extend(compensate.steps());
                steps
            }
        }
    }

    /// Execute against `transport`.
    ///
    /// The compensating half of a failsafe runs under a detached context, so
    /// it is still attempted after the primary was cancelled; it remains
    /// bound by the deadline.
    pub fn run<'a, T: ClusterTransport>(
        &'a self,
        transport: &'a T,
        ctx: &'a Context,
    ) -> BoxFuture<'a, Result<(), TaskError>> {
        Box::pin(async move {
            match self {
                Self::Step(step) => step.run(transport, ctx).await,
                Self::Serial(tasks) => {
                    for task in tasks {
                        task.run(transport, ctx).await?;
                    }
                    Ok(())
                }
                Self::FailSafe {
                    primary,
                    compensate,
                } => {
                    let primary_result = primary.run(transport, ctx).await;
                    let compensate_ctx = ctx.detached();
                    let compensate_result = compensate.run(transport, &compensate_ctx).await;
                    match (primary_result, compensate_result) {
                        (Ok(()), Ok(())) => Ok(()),
                        (Ok(()), Err(compensating)) => Err(compensating),
                        (Err(primary), Ok(())) => Err(primary),
                        (Err(primary), Err(compensating)) => Err(TaskError::Compensation {
                            primary: Box::new(primary),
                            compensating: Box::new(compensating),
                        }),
                    }
                }
            }
        })
    }
}

impl From<Step> for Task {
    fn from(step: Step) -> Self {
        Self::Step(step)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => step.fmt(f),
            Self::Serial(tasks) => {
                f.write_str("serial(")?;
                for (i, task) in tasks.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    task.fmt(f)?;
                }
                f.write_str(")")
            }
            Self::FailSafe {
                primary,
                compensate,
            } => write!(f, "failsafe({primary}, then {compensate})"),
        }
    }
}
