//! Error types for maintenance tasks.

use esmaint_client::ClientError;
use thiserror::Error;

/// Errors produced while running maintenance tasks.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The cluster call failed.
    #[error("cluster request failed: {0}")]
    Transport(#[from] ClientError),

    /// The cluster returned no settings for the index.
    #[error("settings not found for index {index}")]
    SettingsNotFound { index: String },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The context deadline passed before the operation finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A failsafe primary failed and so did its compensating step.
    #[error("{primary}; compensating step also failed: {compensating}")]
    Compensation {
        primary: Box<TaskError>,
        compensating: Box<TaskError>,
    },

    /// No archiver is configured for the move transition.
    #[error("archival unavailable: {0}")]
    ArchivalUnavailable(String),
}

impl TaskError {
    /// Every underlying cause, in order. A compensation failure yields the
    /// causes of its primary followed by those of its compensating step.
    pub fn causes(&self) -> Vec<&TaskError> {
        match self {
            Self::Compensation {
                primary,
                compensating,
            } => {
                let mut causes = primary.causes();
                causes.extend(compensating.causes());
                causes
            }
            other => vec![other],
        }
    }

    /// True when the primary cause is cancellation or an expired deadline.
    pub fn is_cancellation(&self) -> bool {
        match self {
            Self::Cancelled | Self::DeadlineExceeded => true,
            Self::Compensation { primary, .. } => primary.is_cancellation(),
            _ => false,
        }
    }

    /// The transport error behind this failure, if any.
    pub fn transport_error(&self) -> Option<&ClientError> {
        self.causes().into_iter().find_map(|cause| match cause {
            Self::Transport(e) => Some(e),
            _ => None,
        })
    }
}
