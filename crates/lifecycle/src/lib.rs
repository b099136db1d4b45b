//! Index lifecycle maintenance engine.
//!
//! This crate decides which age-based transitions (warm, move, cold, delete)
//! apply to each index and executes them as composable, failsafe tasks over
//! any [`esmaint_client::ClusterTransport`].

pub mod archive;
pub mod cancellation;
pub mod dates;
pub mod error;
pub mod maintenance;
pub mod operations;
pub mod policy;
pub mod recovery;
pub mod task;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use archive::{ArchiveDisabled, Archiver};
pub use cancellation::{CancellationToken, Context};
pub use dates::{age_in_days, date_from_index};
pub use error::TaskError;
pub use maintenance::{
    IndexOutcome, IndexPlan, IndexReport, MaintenancePass, Mode, PassReport, SkipReason,
};
pub use operations::ClusterOperations;
pub use policy::{Transition, due_transitions};
pub use recovery::{RecoveryWaiter, describe_recoveries};
pub use task::{Step, Task};
