//! Errors surfaced by the generation pipeline.

use std::time::Duration;
use thiserror::Error;

/// A git invocation that failed or exited unsuccessfully.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("git {args} failed: {message}")]
pub struct GitError {
    /// The arguments passed to git, space separated.
    pub args: String,
    /// Exit status or spawn failure detail.
    pub message: String,
}

impl GitError {
    pub fn new(args: &[&str], message: impl Into<String>) -> Self {
        GitError {
            args: args.join(" "),
            message: message.into(),
        }
    }
}

/// Everything that can stop a description from being generated.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A required credential or client setting is missing. Raised before any network I/O.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The branch has no diff against its target.
    #[error("not enough changes found to generate a description against {target}")]
    NoChanges { target: String },

    /// The provider rejected the request or answered with something unusable.
    #[error("{provider} error{}: {body}", status_suffix(.status))]
    Provider {
        provider: &'static str,
        status: Option<u16>,
        body: String,
    },

    /// The provider did not answer before the deadline.
    #[error("{provider} did not respond within {deadline:?}")]
    DeadlineExceeded {
        provider: &'static str,
        deadline: Duration,
    },

    #[error(transparent)]
    Git(#[from] GitError),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl GenerateError {
    pub fn configuration(message: impl Into<String>) -> Self {
        GenerateError::Configuration {
            message: message.into(),
        }
    }

    /// Upstream HTTP status, when the failure came from a provider response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GenerateError::Provider { status, .. } => *status,
            _ => None,
        }
    }
}
