//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PixelHubError`] via `#[from]` at port boundaries.

/// Top-level error shared by every port trait.
#[derive(Debug, thiserror::Error)]
pub enum PixelHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("remote device error")]
    Remote(#[from] RemoteError),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("app name must not be empty")]
    EmptyAppName,

    #[error("app name {0:?} must not contain '.'")]
    InvalidAppName(String),

    #[error("object path must not be empty")]
    EmptyPath,

    #[error("object path {0:?} contains an empty segment")]
    EmptyPathSegment(String),

    #[error("namespace must not be empty")]
    EmptyNamespace,

    #[error("value does not match the declared {expected} type")]
    InvalidStateValue { expected: &'static str },
}

/// A lookup that matched nothing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{kind} {id:?} not found")]
pub struct NotFoundError {
    pub kind: &'static str,
    pub id: String,
}

/// Failures reported by the remote device.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The device could not be reached (connection refused, timeout, …).
    #[error("device unreachable while handling app {app:?}")]
    Unreachable {
        app: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The device answered with a non-success status.
    #[error("device rejected request for app {app:?} with status {status}")]
    Rejected { app: String, status: u16 },
}
