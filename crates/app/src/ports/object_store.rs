//! Object store port — persisted objects and their current state values.
//!
//! Every operation takes a **namespace-relative** id (`apps.Clock.visible`);
//! the store owns its [`Namespace`] and qualifies ids itself. Every mutation
//! is published on the event bus with the **fully qualified** id.

use std::future::Future;

use pixelhub_domain::error::PixelHubError;
use pixelhub_domain::object::StoredObject;
use pixelhub_domain::path::{Namespace, ObjectId};
use pixelhub_domain::state::State;

/// Durable key-value store of typed objects addressed by dotted paths.
pub trait ObjectStore: Send + Sync {
    /// The instance prefix every id of this store lives under.
    fn namespace(&self) -> &Namespace;

    /// Create `object` at `id` unless something already exists there.
    ///
    /// Returns `true` when the object was created, `false` when it already
    /// existed (in which case nothing is written).
    fn set_object_not_exists(
        &self,
        id: &ObjectId,
        object: StoredObject,
    ) -> impl Future<Output = Result<bool, PixelHubError>> + Send;

    /// Fetch the object at `id`.
    fn get_object(
        &self,
        id: &ObjectId,
    ) -> impl Future<Output = Result<Option<StoredObject>, PixelHubError>> + Send;

    /// List objects at or below `prefix` (all objects for an empty prefix).
    fn list_objects(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<(ObjectId, StoredObject)>, PixelHubError>> + Send;

    /// Delete the object at `id` together with its state.
    fn delete_object(&self, id: &ObjectId)
    -> impl Future<Output = Result<(), PixelHubError>> + Send;

    /// Fetch the current state of `id`.
    fn get_state(
        &self,
        id: &ObjectId,
    ) -> impl Future<Output = Result<Option<State>, PixelHubError>> + Send;

    /// Write the state of `id`.
    fn set_state(
        &self,
        id: &ObjectId,
        state: State,
    ) -> impl Future<Output = Result<(), PixelHubError>> + Send;
}
