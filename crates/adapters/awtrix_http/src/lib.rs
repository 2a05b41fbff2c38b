//! # pixelhub-adapter-awtrix-http
//!
//! Remote app client for AWTRIX pixel clocks.
//!
//! ## Responsibilities
//! - Implement the [`AppClient`](pixelhub_app::ports::AppClient) port
//! - Map app operations onto the device's custom-app endpoint
//!   (`POST /api/custom?name=<app>`; an empty body deletes the app)
//! - Translate transport failures and non-success statuses into
//!   [`RemoteError`](pixelhub_domain::error::RemoteError)
//!
//! ## Dependency rule
//! Same as other adapters: depends on `pixelhub-app` and `pixelhub-domain`.

mod client;
mod config;
mod error;

pub use client::AwtrixClient;
pub use config::AwtrixConfig;
pub use error::AwtrixError;
