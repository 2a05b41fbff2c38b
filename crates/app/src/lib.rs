//! # pixelhub-app
//!
//! Application layer — the **app lifecycle core** and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ObjectStore` — create-if-absent objects, read/write states
//!   - `AppClient` — remove/update apps on the remote device
//!   - `EventPublisher` — publish change events
//! - Define the **capability interface** app variants implement (`AppHooks`)
//! - Provide the **lifecycle core** (`AppLifecycle`): provisioning, change
//!   dispatch and teardown of one app
//! - Provide **in-process infrastructure** (event bus, dispatcher tasks) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `pixelhub-domain` only (plus `tokio` for channels and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dispatcher;
pub mod event_bus;
pub mod hooks;
pub mod lifecycle;
pub mod ports;
