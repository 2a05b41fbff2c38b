//! Capability interface implemented by every app variant.
//!
//! The lifecycle core holds one [`AppHooks`] value per app and calls into it
//! after its own handling. Every method has a no-op default, so a variant
//! only overrides what it reacts to.

use std::future::Future;

use pixelhub_domain::error::PixelHubError;
use pixelhub_domain::object::StoredObject;
use pixelhub_domain::path::ObjectId;
use pixelhub_domain::state::State;

/// Variant-specific behaviour plugged into an [`AppLifecycle`](crate::lifecycle::AppLifecycle).
pub trait AppHooks: Send + Sync {
    /// Warm-up run once before the app's objects are provisioned.
    ///
    /// Variants may perform IO here and own their error handling.
    fn init(&self) -> impl Future<Output = Result<(), PixelHubError>> + Send {
        async { Ok(()) }
    }

    /// Called for every state change in the store namespace, after the core's
    /// own handling, with the original fully qualified id.
    ///
    /// `state` is `None` when the state was deleted.
    fn on_state_changed(
        &self,
        _id: &ObjectId,
        _state: Option<&State>,
    ) -> impl Future<Output = Result<(), PixelHubError>> + Send {
        async { Ok(()) }
    }

    /// Called for every object change in the store namespace, unfiltered.
    fn on_object_changed(
        &self,
        _id: &ObjectId,
        _object: Option<&StoredObject>,
    ) -> impl Future<Output = Result<(), PixelHubError>> + Send {
        async { Ok(()) }
    }
}

/// Hooks for apps whose content is fully managed on the device.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl AppHooks for DefaultHooks {}
