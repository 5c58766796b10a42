// src/error.rs
use thiserror::Error;

use crate::lifecycle::JobStatus;

pub type SyncResult<T> = Result<T, SyncError>;

/// Failure classes surfaced to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or rejected credential. Terminal for the session, never retried.
    Unauthenticated,
    /// The request could not complete.
    Transport,
    /// The request or the store's answer was malformed or not allowed.
    Validation,
}

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("remote store rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("job post {0} not found")]
    NotFound(i64),

    #[error("could not decode remote store response: {0}")]
    Decode(String),

    #[error("job post {id}: status change {from} -> {to} is not allowed")]
    InvalidTransition {
        id: i64,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("job post {id}: {reason}")]
    InvariantViolation { id: i64, reason: String },

    #[error("duplicate job post id {0}")]
    DuplicateId(i64),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown job status '{0}'")]
    UnknownStatus(String),

    #[error("LinkedIn publishing failed: {0}")]
    Publish(String),

    #[error("token store: {0}")]
    TokenStore(String),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            SyncError::Transport(_) | SyncError::Publish(_) | SyncError::TokenStore(_) => {
                ErrorKind::Transport
            }
            SyncError::Rejected { status, .. } if *status >= 500 => ErrorKind::Transport,
            SyncError::Rejected { .. }
            | SyncError::NotFound(_)
            | SyncError::Decode(_)
            | SyncError::InvalidTransition { .. }
            | SyncError::InvariantViolation { .. }
            | SyncError::DuplicateId(_)
            | SyncError::InvalidRequest(_)
            | SyncError::UnknownStatus(_) => ErrorKind::Validation,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.kind() == ErrorKind::Unauthenticated
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else {
            SyncError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::TokenStore(err.to_string())
    }
}
