//! End-to-end maintenance pass tests against the in-memory cluster.
//!
//! # Invariants
//! - Plan mode never mutates the cluster
//! - A due delete is the only transition applied
//! - One index failing does not stop the pass
//! - Cancellation aborts the pass

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use esmaint_config::IndicesConfig;
use esmaint_lifecycle::testing::{Call, FakeCluster, FakeIndex};
use esmaint_lifecycle::{
    ArchiveDisabled, Archiver, CancellationToken, ClusterOperations, Context, IndexOutcome,
    MaintenancePass, Mode, PassReport, SkipReason, TaskError, Transition,
};

const INDICES: &str = r#"
ignores: ["-2019-"]
rules:
  info: "3, 5, 7, 30"
  audit: "-, -, -, 7"
  broken: "1, 2"
"#;

fn indices() -> IndicesConfig {
    serde_yaml::from_str(INDICES).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 6, 1).unwrap()
}

fn outcome<'a>(report: &'a PassReport, index: &str) -> &'a IndexOutcome {
    &report
        .indices
        .iter()
        .find(|r| r.index == index)
        .unwrap_or_else(|| panic!("{index} missing from report"))
        .outcome
}

fn notes<'a>(report: &'a PassReport, index: &str) -> &'a [String] {
    match outcome(report, index) {
        IndexOutcome::Applied { notes, .. } => notes,
        other => panic!("{index} was not applied: {other:?}"),
    }
}

async fn run_pass<A: Archiver>(
    cluster: &FakeCluster,
    archiver: &A,
    mode: Mode,
    ctx: &Context,
) -> Result<PassReport, TaskError> {
    let ops = ClusterOperations::new(cluster.clone());
    let indices = indices();
    MaintenancePass::new(&ops, archiver, &indices, today())
        .run(mode, ctx)
        .await
}

/// Archiver that remembers what it archived.
#[derive(Default)]
struct RecordingArchiver {
    archived: Mutex<HashSet<String>>,
}

impl Archiver for RecordingArchiver {
    async fn is_archived(&self, index: &str, _ctx: &Context) -> Result<bool, TaskError> {
        Ok(self.archived.lock().unwrap().contains(index))
    }

    async fn archive(&self, index: &str, _ctx: &Context) -> Result<(), TaskError> {
        self.archived.lock().unwrap().insert(index.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn test_plan_reports_without_mutating() {
    let cluster = FakeCluster::new()
        .with_index("info-2020-05-31")
        .with_index("info-2020-05-28")
        .with_index("info-2020-04-01")
        .with_index("info-prod-2019-12-12")
        .with_index(".kibana-2020-01-01")
        .with_index("scratch");

    let report = run_pass(&cluster, &ArchiveDisabled, Mode::Plan, &Context::background())
        .await
        .unwrap();

    assert!(cluster.mutations().is_empty());
    assert_eq!(report.indices.len(), 6);

    assert_eq!(
        outcome(&report, "info-2020-05-31"),
        &IndexOutcome::Skipped {
            reason: SkipReason::NothingDue
        }
    );
    assert_eq!(
        outcome(&report, "scratch"),
        &IndexOutcome::Skipped {
            reason: SkipReason::Undated
        }
    );
    assert!(matches!(
        outcome(&report, ".kibana-2020-01-01"),
        IndexOutcome::Skipped {
            reason: SkipReason::Ignored(reason)
        } if reason == "system index"
    ));
    assert!(matches!(
        outcome(&report, "info-prod-2019-12-12"),
        IndexOutcome::Skipped {
            reason: SkipReason::Ignored(reason)
        } if reason.contains("-2019-")
    ));

    let IndexOutcome::Planned { plan } = outcome(&report, "info-2020-05-28") else {
        panic!("expected a plan");
    };
    assert_eq!(plan.age_days, 4);
    assert_eq!(plan.prefix.as_deref(), Some("info"));
    assert_eq!(plan.transitions, vec![Transition::Warm]);

    let IndexOutcome::Planned { plan } = outcome(&report, "info-2020-04-01") else {
        panic!("expected a plan");
    };
    assert_eq!(plan.transitions, vec![Transition::Delete]);
}

#[tokio::test]
async fn test_apply_warm() {
    let index = "info-2020-05-28";
    let cluster = FakeCluster::new().with_index(index);

    let report = run_pass(&cluster, &ArchiveDisabled, Mode::Apply, &Context::background())
        .await
        .unwrap();

    assert_eq!(notes(&report, index), ["merged", "best compression set"]);
    let state = cluster.index(index).unwrap();
    assert!(state.open);
    assert!(state.merged);
    assert_eq!(state.settings.get_str("index.codec"), Some("best_compression"));
    assert!(cluster.calls().contains(&Call::ListRecoveries));
}

#[tokio::test]
async fn test_apply_is_idempotent() {
    let index = "info-2020-05-28";
    let cluster = FakeCluster::new().with_index(index);
    let ctx = Context::background();

    run_pass(&cluster, &ArchiveDisabled, Mode::Apply, &ctx)
        .await
        .unwrap();
    let before = cluster.mutations().len();

    let report = run_pass(&cluster, &ArchiveDisabled, Mode::Apply, &ctx)
        .await
        .unwrap();

    assert!(notes(&report, index).is_empty());
    assert_eq!(cluster.mutations().len(), before);
}

#[tokio::test]
async fn test_closed_index_skips_warm() {
    let index = "info-2020-05-28";
    let cluster = FakeCluster::new().with_index_state(
        index,
        FakeIndex {
            open: false,
            ..FakeIndex::default()
        },
    );

    let report = run_pass(&cluster, &ArchiveDisabled, Mode::Apply, &Context::background())
        .await
        .unwrap();

    assert_eq!(notes(&report, index), ["warm skipped: index is closed"]);
    assert!(cluster.mutations().is_empty());
}

#[tokio::test]
async fn test_move_without_archiver_is_a_note() {
    let index = "info-2020-05-26";
    let cluster = FakeCluster::new().with_index(index);

    let report = run_pass(&cluster, &ArchiveDisabled, Mode::Apply, &Context::background())
        .await
        .unwrap();

    let notes = notes(&report, index);
    assert_eq!(notes.len(), 3);
    assert!(notes[2].starts_with("move skipped:"));
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_move_archives_once() {
    let index = "info-2020-05-26";
    let cluster = FakeCluster::new().with_index(index);
    let archiver = RecordingArchiver::default();
    let ctx = Context::background();

    let report = run_pass(&cluster, &archiver, Mode::Apply, &ctx)
        .await
        .unwrap();
    assert!(notes(&report, index).contains(&"archived".to_string()));

    let report = run_pass(&cluster, &archiver, Mode::Apply, &ctx)
        .await
        .unwrap();
    assert!(notes(&report, index).is_empty());
}

#[tokio::test]
async fn test_cold_routes_to_hdd() {
    let index = "info-2020-05-20";
    let cluster = FakeCluster::new().with_index(index);
    let archiver = RecordingArchiver::default();

    let report = run_pass(&cluster, &archiver, Mode::Apply, &Context::background())
        .await
        .unwrap();

    assert_eq!(
        notes(&report, index),
        ["merged", "best compression set", "archived", "routed to hdd"]
    );
    let state = cluster.index(index).unwrap();
    assert_eq!(
        state
            .settings
            .get_str("index.routing.allocation.require.disktype"),
        Some("hdd")
    );
}

#[tokio::test]
async fn test_delete_supersedes() {
    let cluster = FakeCluster::new()
        .with_index("info-2020-04-01")
        .with_index("audit-2020-05-20");

    let report = run_pass(&cluster, &ArchiveDisabled, Mode::Apply, &Context::background())
        .await
        .unwrap();

    assert_eq!(
        cluster.mutations(),
        vec![
            Call::Delete("audit-2020-05-20".to_string()),
            Call::Delete("info-2020-04-01".to_string()),
        ]
    );
    assert_eq!(notes(&report, "info-2020-04-01"), ["deleted"]);
    assert!(cluster.index("info-2020-04-01").is_none());
}

#[tokio::test]
async fn test_failure_does_not_stop_pass() {
    let cluster = FakeCluster::new()
        .with_index("audit-2020-05-20")
        .with_index("broken-2020-05-20")
        .with_index("info-2020-04-01");
    cluster.fail_when(|call| *call == Call::Delete("audit-2020-05-20".to_string()));

    let report = run_pass(&cluster, &ArchiveDisabled, Mode::Apply, &Context::background())
        .await
        .unwrap();

    assert!(matches!(
        outcome(&report, "audit-2020-05-20"),
        IndexOutcome::Failed { error } if error.contains("injected failure")
    ));
    assert!(matches!(
        outcome(&report, "broken-2020-05-20"),
        IndexOutcome::Failed { error } if error.contains("broken")
    ));
    assert_eq!(notes(&report, "info-2020-04-01"), ["deleted"]);
    assert_eq!(report.counts(), (0, 0, 1, 2));
    assert!(report.has_failures());
}

#[tokio::test]
async fn test_list_failure_aborts() {
    let cluster = FakeCluster::new().with_index("info-2020-04-01");
    cluster.fail_when(|call| *call == Call::ListIndices);

    let result = run_pass(&cluster, &ArchiveDisabled, Mode::Plan, &Context::background()).await;

    assert!(matches!(result, Err(TaskError::Transport(_))));
}

#[tokio::test]
async fn test_cancellation_aborts_pass() {
    let cluster = FakeCluster::new()
        .with_index("info-2020-05-28")
        .with_index("info-2020-05-29");
    cluster.hang_when(|call| matches!(call, Call::ForceMerge(..)));
    let token = CancellationToken::new();
    let ctx = Context::new(token.clone());

    let handle = tokio::spawn({
        let cluster = cluster.clone();
        async move { run_pass(&cluster, &ArchiveDisabled, Mode::Apply, &ctx).await }
    });
    while !cluster
        .calls()
        .iter()
        .any(|call| matches!(call, Call::ForceMerge(..)))
    {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    token.cancel();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(TaskError::Cancelled)));

    // The write block was still lifted on the interrupted index.
    let state = cluster.index("info-2020-05-28").unwrap();
    assert!(state.settings.get("index.blocks.write").is_none());
    assert!(
        !cluster
            .calls()
            .iter()
            .any(|call| call.index() == Some("info-2020-05-29"))
    );
}
