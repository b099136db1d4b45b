//! One maintenance sweep over every index in the cluster.
//!
//! Responsibilities:
//! - List indices (fresh on every pass), extract dates and resolve rules.
//! - Compute due transitions and either report them (plan) or apply them.
//! - Keep going after a per-index failure; stop at cancellation.
//!
//! Does NOT handle:
//! - Scheduling passes (the binary runs exactly one).
//! - Archiving segments (delegated to an [`Archiver`]).

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use esmaint_client::{ClusterTransport, ElasticsearchIndex};
use esmaint_config::{IndicesConfig, Resolution, Rule};
use tracing::{info, warn};

use crate::archive::Archiver;
use crate::cancellation::Context;
use crate::dates::{age_in_days, date_from_index};
use crate::error::TaskError;
use crate::operations::ClusterOperations;
use crate::policy::{Transition, due_transitions};

/// Whether a pass mutates the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report due transitions only.
    Plan,
    /// Apply due transitions.
    Apply,
}

/// Due transitions for one dated, governed index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexPlan {
    pub date: NaiveDate,
    pub age_days: i64,
    /// Rule table key that governs the index; `None` when no key matched.
    pub prefix: Option<String>,
    #[serde(serialize_with = "serialize_rule")]
    pub rule: Rule,
    pub transitions: Vec<Transition>,
}

fn serialize_rule<S: serde::Serializer>(rule: &Rule, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(rule)
}

/// Why an index was left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The name has no `YYYY-MM-DD` suffix.
    Undated,
    /// System index or ignore pattern.
    Ignored(String),
    /// Governed and dated, but no threshold reached.
    NothingDue,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undated => f.write_str("no date suffix"),
            Self::Ignored(reason) => write!(f, "ignored ({reason})"),
            Self::NothingDue => f.write_str("nothing due"),
        }
    }
}

/// Result of a pass for one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IndexOutcome {
    Skipped { reason: SkipReason },
    Planned { plan: IndexPlan },
    Applied { plan: IndexPlan, notes: Vec<String> },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub index: String,
    #[serde(flatten)]
    pub outcome: IndexOutcome,
}

/// Every index's outcome for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub indices: Vec<IndexReport>,
}

impl PassReport {
    pub fn failed(&self) -> impl Iterator<Item = &IndexReport> {
        self.indices
            .iter()
            .filter(|report| matches!(report.outcome, IndexOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Count of (skipped, planned, applied, failed) outcomes.
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        self.indices
            .iter()
            .fold((0, 0, 0, 0), |(s, p, a, f), report| match report.outcome {
                IndexOutcome::Skipped { .. } => (s + 1, p, a, f),
                IndexOutcome::Planned { .. } => (s, p + 1, a, f),
                IndexOutcome::Applied { .. } => (s, p, a + 1, f),
                IndexOutcome::Failed { .. } => (s, p, a, f + 1),
            })
    }
}

/// A single sweep over the cluster.
pub struct MaintenancePass<'a, T, A> {
    ops: &'a ClusterOperations<T>,
    archiver: &'a A,
    indices: &'a IndicesConfig,
    today: NaiveDate,
}

impl<'a, T: ClusterTransport, A: Archiver> MaintenancePass<'a, T, A> {
    pub fn new(
        ops: &'a ClusterOperations<T>,
        archiver: &'a A,
        indices: &'a IndicesConfig,
        today: NaiveDate,
    ) -> Self {
        Self {
            ops,
            archiver,
            indices,
            today,
        }
    }

    /// Run the pass.
    ///
    /// # Errors
    ///
    /// Listing failures and cancellation abort the pass. Every other failure
    /// is recorded on the index it happened to.
    pub async fn run(&self, mode: Mode, ctx: &Context) -> Result<PassReport, TaskError> {
        let listed = self.ops.list(ctx).await?;
        info!(count = listed.len(), ?mode, "starting maintenance pass");

        let mut report = PassReport::default();
        for index in listed {
            let outcome = match self.evaluate(&index) {
                Ok(plan) if plan.transitions.is_empty() => IndexOutcome::Skipped {
                    reason: SkipReason::NothingDue,
                },
                Ok(plan) => match mode {
                    Mode::Plan => IndexOutcome::Planned { plan },
                    Mode::Apply => match self.apply(&index, &plan, ctx).await {
                        Ok(notes) => IndexOutcome::Applied { plan, notes },
                        Err(e) if e.is_cancellation() => return Err(e),
                        Err(e) => {
                            warn!(index = %index.name, error = %e, "maintenance failed");
                            IndexOutcome::Failed {
                                error: e.to_string(),
                            }
                        }
                    },
                },
                Err(outcome) => outcome,
            };
            report.indices.push(IndexReport {
                index: index.name,
                outcome,
            });
        }

        let (skipped, planned, applied, failed) = report.counts();
        info!(skipped, planned, applied, failed, "maintenance pass finished");
        Ok(report)
    }

    /// Date, rule and due transitions of one index, or the outcome that
    /// ends its processing early.
    fn evaluate(&self, index: &ElasticsearchIndex) -> Result<IndexPlan, IndexOutcome> {
        let Some(date) = date_from_index(&index.name) else {
            return Err(IndexOutcome::Skipped {
                reason: SkipReason::Undated,
            });
        };

        let (prefix, rule) = match self.indices.resolver().resolve(&index.name) {
            Ok(Resolution::Ignored(reason)) => {
                return Err(IndexOutcome::Skipped {
                    reason: SkipReason::Ignored(reason.to_string()),
                });
            }
            Ok(Resolution::Governed { prefix, rule }) => (prefix.map(str::to_string), rule),
            Err(e) => {
                warn!(index = %index.name, error = %e, "invalid rule");
                return Err(IndexOutcome::Failed {
                    error: e.to_string(),
                });
            }
        };

        let age_days = age_in_days(date, self.today);
        Ok(IndexPlan {
            date,
            age_days,
            prefix,
            rule,
            transitions: due_transitions(&rule, age_days),
        })
    }

    /// Apply every due transition of one index, stopping at its first failure.
    async fn apply(
        &self,
        index: &ElasticsearchIndex,
        plan: &IndexPlan,
        ctx: &Context,
    ) -> Result<Vec<String>, TaskError> {
        let name = index.name.as_str();
        let mut notes = Vec::new();

        for transition in &plan.transitions {
            info!(index = name, %transition, age_days = plan.age_days, "applying transition");
            match transition {
                Transition::Warm => {
                    if !index.open {
                        warn!(index = name, "index is closed, skipping warm");
                        notes.push("warm skipped: index is closed".to_string());
                        continue;
                    }
                    if !index.merged {
                        self.ops.run(&self.ops.merge_index(name), ctx).await?;
                        notes.push("merged".to_string());
                    }
                    if !self.ops.is_best_compression(name, ctx).await? {
                        self.ops
                            .run(&self.ops.set_best_compression(name), ctx)
                            .await?;
                        notes.push("best compression set".to_string());
                    }
                    self.ops.run(&self.ops.wait_for_recoveries(), ctx).await?;
                }
                Transition::Move => {
                    if self.archiver.is_archived(name, ctx).await? {
                        continue;
                    }
                    match self.archiver.archive(name, ctx).await {
                        Ok(()) => notes.push("archived".to_string()),
                        Err(TaskError::ArchivalUnavailable(reason)) => {
                            warn!(index = name, %reason, "archival unavailable, skipping move");
                            notes.push(format!("move skipped: {reason}"));
                        }
                        Err(e) => return Err(e),
                    }
                }
                Transition::Cold => {
                    if !self.ops.is_routing_hdd(name, ctx).await? {
                        self.ops.run(&self.ops.set_routing_hdd(name), ctx).await?;
                        notes.push("routed to hdd".to_string());
                    }
                    self.ops.run(&self.ops.wait_for_recoveries(), ctx).await?;
                }
                Transition::Delete => {
                    self.ops.run(&self.ops.delete(name), ctx).await?;
                    notes.push("deleted".to_string());
                }
            }
        }

        Ok(notes)
    }
}
