//! Storage abstraction traits
//!
//! This module provides the `AuthStore` trait that abstracts over the
//! persistence backends (in-memory SQLite, file-based SQLite), so the
//! auth service never depends on a concrete engine type.

use crate::types::{Result, Session, User};
use crate::utils::config::DatabaseConfig;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage provider configuration
#[derive(Debug, Clone, Default)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
}

impl DatabaseProvider {
    /// Create an auth store from this provider configuration
    pub async fn create_store(&self) -> Result<Arc<dyn AuthStore>> {
        match self {
            DatabaseProvider::Memory => {
                let store = super::libsql::LibsqlStore::new_memory().await?;
                Ok(Arc::new(store))
            }
            DatabaseProvider::SQLite { path } => {
                let store = super::libsql::LibsqlStore::new_local(path).await?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Derive a provider from the loaded configuration
    pub fn from_config(config: &DatabaseConfig) -> Self {
        if config.url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: config.url.clone(),
            }
        }
    }
}

/// Narrow persistence operations needed by the auth service.
///
/// Every method maps to a single store call; the refresh-rotation
/// correctness relies on `delete_session` being atomic and its result
/// immediately visible to subsequent lookups.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Insert a user row; fails on a duplicate login.
    async fn create_user(&self, id: &str, login: &str, password_hash: &str) -> Result<()>;

    /// Look up a user by their unique login.
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>>;

    /// Look up a user by id.
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Insert a session row holding the refresh token's hash.
    async fn create_session(
        &self,
        id: &str,
        user_id: &str,
        refresh_token_hash: &str,
        expires_at: i64,
    ) -> Result<()>;

    /// Look up a session by id.
    async fn find_session(&self, id: &str) -> Result<Option<Session>>;

    /// Delete a session, reporting whether a row was actually removed.
    /// Deleting a missing session is not an error; the report lets a
    /// racing refresh determine the single rotation winner.
    async fn delete_session(&self, id: &str) -> Result<bool>;
}
