//! # pixelhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **REST-ish JSON API** over the object store
//!   (`/api/objects`, `/api/states/{id}`)
//! - Let users and external tools request state changes: writes default to
//!   `ack = false`, so apps see them as user requests
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `pixelhub-app` (for port traits) and `pixelhub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
