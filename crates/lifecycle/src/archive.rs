//! Archival seam for the move transition.
//!
//! Copying index segments to object storage is handled outside this crate.
//! The maintenance pass only asks whether an index is archived and, if not,
//! asks for it to be archived.

use std::future::Future;

use crate::cancellation::Context;
use crate::error::TaskError;

/// Archives index segments to object storage.
pub trait Archiver: Send + Sync {
    /// Whether a complete archive of `index` exists.
    fn is_archived(
        &self,
        index: &str,
        ctx: &Context,
    ) -> impl Future<Output = Result<bool, TaskError>> + Send;

    /// Archive `index`.
    fn archive(&self, index: &str, ctx: &Context)
    -> impl Future<Output = Result<(), TaskError>> + Send;
}

/// Archiver used when no object storage is configured.
///
/// Reports every index as not archived and refuses to archive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveDisabled;

impl Archiver for ArchiveDisabled {
    async fn is_archived(&self, _index: &str, _ctx: &Context) -> Result<bool, TaskError> {
        Ok(false)
    }

    async fn archive(&self, index: &str, _ctx: &Context) -> Result<(), TaskError> {
        Err(TaskError::ArchivalUnavailable(format!(
            "no archiver configured for {index}"
        )))
    }
}
