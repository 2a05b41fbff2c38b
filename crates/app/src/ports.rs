//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the lifecycle core and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod app_client;
pub mod event_bus;
pub mod object_store;

pub use app_client::AppClient;
pub use event_bus::EventPublisher;
pub use object_store::ObjectStore;
