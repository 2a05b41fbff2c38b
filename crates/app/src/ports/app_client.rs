//! Remote app client port — operations against the physical device.

use std::future::Future;

use pixelhub_domain::error::RemoteError;

/// Issues app-level operations against the remote device.
///
/// Apps are addressed by their name; the device keeps no other identifier.
pub trait AppClient: Send + Sync {
    /// Delete the app called `name` from the device.
    ///
    /// Fails with [`RemoteError`] when the device is unreachable or does not
    /// know the app.
    fn remove_app(&self, name: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Create or replace the content of the app called `name`.
    fn update_app(
        &self,
        name: &str,
        payload: &serde_json::Value,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
