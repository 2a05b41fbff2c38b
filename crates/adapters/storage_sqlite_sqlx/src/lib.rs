//! # pixelhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` object/state store using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the [`ObjectStore`](pixelhub_app::ports::ObjectStore) port
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Publish a change event for every mutation
//!
//! ## Dependency rule
//! Depends on `pixelhub-app` (for port traits) and `pixelhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod object_store;
mod pool;

pub use error::StorageError;
pub use object_store::SqliteObjectStore;
pub use pool::{Config, Database};
