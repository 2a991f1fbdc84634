//! Persistence layer for users and sessions.
//!
//! The auth service only ever sees the narrow [`AuthStore`] trait;
//! the libsql implementation behind it supports an in-memory database
//! (tests, development) or a local SQLite file.

/// libsql-backed implementation of the store.
pub mod libsql;
/// The `AuthStore` trait and provider selection.
pub mod traits;

pub use libsql::LibsqlStore;
pub use traits::{AuthStore, DatabaseProvider};
