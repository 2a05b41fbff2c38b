//! # pixelhub-domain
//!
//! Pure domain model for the pixelhub app lifecycle layer.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, dotted object ids
//! - Define **App definitions** (the named content units hosted on the device)
//! - Define **Stored objects** (typed metadata records in the object store)
//! - Define **States** (current values with their acknowledgment flag)
//! - Define **Change events** (state and object mutations published on the bus)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod path;
pub mod time;

pub mod app;
pub mod event;
pub mod object;
pub mod state;
