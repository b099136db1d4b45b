//! CLI cancellation utilities.
//!
//! Responsibilities:
//! - Install the Ctrl+C handler that cancels the shared lifecycle token.
//! - Recognize user-initiated cancellation in an `anyhow` error chain.
//! - Centralize the cancellation message and the Unix SIGINT exit code (130).
//!
//! Does NOT handle:
//! - Stopping work. Commands pass the token into the lifecycle `Context`,
//!   which aborts at its next suspension point.
//!
//! Invariants:
//! - Once cancelled, the token remains cancelled forever.

use esmaint_lifecycle::{CancellationToken, TaskError};

/// Standard Unix exit code for SIGINT: 128 + 2.
pub const SIGINT_EXIT_CODE: u8 = 130;

/// Spawn a task that cancels `token` on the first Ctrl+C.
pub fn cancel_on_ctrl_c(token: &CancellationToken) {
    let token = token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::debug!("received Ctrl+C, cancelling");
        token.cancel();
    });
}

/// Returns true if this error was caused by user cancellation.
///
/// A failsafe whose primary was cancelled still counts even when its
/// compensating step failed afterwards. Deadline expiry is a timeout, not a
/// cancellation, and is not matched.
pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<TaskError>())
        .any(is_user_cancellation)
}

fn is_user_cancellation(err: &TaskError) -> bool {
    match err {
        TaskError::Cancelled => true,
        TaskError::Compensation { primary, .. } => is_user_cancellation(primary),
        _ => false,
    }
}

/// Print standard cancellation message to stderr.
pub fn print_cancelled_message() {
    eprintln!("^C\nOperation cancelled by user");
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn test_cancelled_detected_through_context() {
        let err = Err::<(), _>(TaskError::Cancelled)
            .context("maintenance pass failed")
            .unwrap_err();
        assert!(is_cancelled_error(&err));
    }

    #[test]
    fn test_cancelled_primary_with_failed_compensation() {
        let err = Err::<(), _>(TaskError::Compensation {
            primary: Box::new(TaskError::Cancelled),
            compensating: Box::new(TaskError::DeadlineExceeded),
        })
        .context("maintenance pass failed")
        .unwrap_err();
        assert!(is_cancelled_error(&err));
    }

    #[test]
    fn test_deadline_is_not_cancellation() {
        let err = anyhow::Error::new(TaskError::Compensation {
            primary: Box::new(TaskError::DeadlineExceeded),
            compensating: Box::new(TaskError::Cancelled),
        });
        assert!(!is_cancelled_error(&err));

        let err = anyhow::Error::new(TaskError::DeadlineExceeded);
        assert!(!is_cancelled_error(&err));
        assert!(!is_cancelled_error(&anyhow::anyhow!("cancelled")));
    }
}
