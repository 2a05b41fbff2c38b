//! Shared application state for axum handlers.

use std::sync::Arc;

use pixelhub_app::ports::ObjectStore;

/// Application state shared across all axum handlers.
///
/// Generic over the store type to avoid dynamic dispatch. `Clone` is
/// implemented manually so the store itself does not need to be `Clone` —
/// only the `Arc` wrapper is cloned.
pub struct AppState<S> {
    /// Object store the API reads from and writes to.
    pub store: Arc<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> AppState<S>
where
    S: ObjectStore + 'static,
{
    /// Create a new application state sharing `store` with the rest of the process.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}
