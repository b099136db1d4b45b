//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish failures.
//! - Map configuration, transport and task errors to those codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs).
//!
//! Invariants:
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use esmaint_client::ClientError;
use esmaint_config::{ConfigError, InvalidRule};
use esmaint_lifecycle::TaskError;
use thiserror::Error;

use crate::cancellation::SIGINT_EXIT_CODE;

/// Structured exit codes for esmaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command completed successfully.
    Success = 0,

    /// Unhandled or generic failure.
    GeneralError = 1,

    /// Configuration could not be read or is invalid.
    ///
    /// Scripts should fix the file and not retry.
    ConfigError = 2,

    /// Network, timeout, or authentication failure talking to the cluster.
    ///
    /// Scripts may retry with backoff.
    ConnectionError = 3,

    /// The cluster reported a missing index or settings.
    NotFound = 4,

    /// The pass finished but at least one index failed.
    PartialFailure = 5,

    /// SIGINT/Ctrl+C.
    Interrupted = SIGINT_EXIT_CODE,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        if err.is_connection_error() || err.is_auth_error() {
            return ExitCode::ConnectionError;
        }
        match err {
            ClientError::InvalidUrl(_) => ExitCode::ConnectionError,
            ClientError::MaxRetriesExceeded(_) => ExitCode::ConnectionError,
            e if e.is_not_found() => ExitCode::NotFound,
            _ => ExitCode::GeneralError,
        }
    }
}

impl From<&TaskError> for ExitCode {
    fn from(err: &TaskError) -> Self {
        match err {
            TaskError::Transport(e) => ExitCode::from(e),
            TaskError::SettingsNotFound { .. } => ExitCode::NotFound,
            TaskError::Cancelled => ExitCode::Interrupted,
            TaskError::DeadlineExceeded => ExitCode::ConnectionError,
            TaskError::Compensation { primary, .. } => ExitCode::from(primary.as_ref()),
            TaskError::ArchivalUnavailable(_) => ExitCode::GeneralError,
        }
    }
}

/// A maintenance pass completed with per-index failures.
#[derive(Debug, Error)]
#[error("{failed} of {total} indices failed")]
pub struct PartialFailure {
    pub failed: usize,
    pub total: usize,
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// The exit code for the first recognized error in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if cause.is::<PartialFailure>() {
                return ExitCode::PartialFailure;
            }
            if cause.is::<ConfigError>() || cause.is::<InvalidRule>() {
                return ExitCode::ConfigError;
            }
            if let Some(task_err) = cause.downcast_ref::<TaskError>() {
                return ExitCode::from(task_err);
            }
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
        }
        ExitCode::GeneralError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::ConfigError.as_i32(), 2);
        assert_eq!(ExitCode::PartialFailure.as_i32(), 5);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_client_error_mapping() {
        assert_eq!(
            ExitCode::from(&ClientError::MaxRetriesExceeded(4)),
            ExitCode::ConnectionError
        );
        assert_eq!(
            ExitCode::from(&ClientError::ApiError {
                status: 401,
                url: "http://es/_cat/indices".to_string(),
                message: "security_exception".to_string(),
            }),
            ExitCode::ConnectionError
        );
        assert_eq!(
            ExitCode::from(&ClientError::ApiError {
                status: 404,
                url: "http://es/x/_settings".to_string(),
                message: "index_not_found_exception".to_string(),
            }),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from(&ClientError::ApiError {
                status: 500,
                url: "http://es/x/_forcemerge".to_string(),
                message: "boom".to_string(),
            }),
            ExitCode::GeneralError
        );
    }

    #[test]
    fn test_task_error_mapping() {
        assert_eq!(
            ExitCode::from(&TaskError::SettingsNotFound {
                index: "x".to_string()
            }),
            ExitCode::NotFound
        );
        assert_eq!(ExitCode::from(&TaskError::Cancelled), ExitCode::Interrupted);
        let compensation = TaskError::Compensation {
            primary: Box::new(TaskError::Transport(ClientError::ApiError {
                status: 403,
                url: "http://es/x/_close".to_string(),
                message: "security_exception".to_string(),
            })),
            compensating: Box::new(TaskError::Cancelled),
        };
        assert_eq!(ExitCode::from(&compensation), ExitCode::ConnectionError);
    }

    #[test]
    fn test_anyhow_chain_mapping() {
        let err = Err::<(), _>(ConfigError::MissingEsUrl)
            .context("failed to load configuration")
            .unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::ConfigError);

        let err = anyhow::Error::new(PartialFailure {
            failed: 1,
            total: 3,
        });
        assert_eq!(err.exit_code(), ExitCode::PartialFailure);
        assert_eq!(err.to_string(), "1 of 3 indices failed");

        let err = esmaint_config::RuleTable::from_iter([("info", "1,2")])
            .parse_all()
            .context("invalid rules")
            .unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::ConfigError);

        assert_eq!(anyhow::anyhow!("other").exit_code(), ExitCode::GeneralError);
    }
}
