use std::fmt;

use hn_core::ProjectionError;
use thiserror::Error;

/// Broad classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Upstream has no such record
    NotFound,
    /// Connection failure or non-success status
    Transport,
    /// Response body did not match the expected shape
    Decode,
    /// Cancelled by the caller or by a failing sibling task
    Cancelled,
    /// Misuse by the calling code (bad configuration, wrong projection target)
    Caller,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Transport => write!(f, "transport"),
            Self::Decode => write!(f, "decode"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Caller => write!(f, "caller"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Transport error on {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Unexpected HTTP status {status} on {path}")]
    Status { path: String, status: u16 },
    #[error("Decode error on {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Cancelled")]
    Cancelled,
    #[error("Worker task failed: {0}")]
    Task(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Transport { .. } | Self::Status { .. } | Self::Task(_) => {
                ErrorCategory::Transport
            }
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::InvalidConfig(_) | Self::Projection(_) => ErrorCategory::Caller,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub(crate) fn transport(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport { path: path.into(), source: Box::new(source) }
    }
}
