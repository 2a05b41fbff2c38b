//! Client construction errors.

/// Errors raised while setting up the device client.
#[derive(Debug, thiserror::Error)]
pub enum AwtrixError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// The configured host is empty.
    #[error("device host must not be empty")]
    MissingHost,
}
