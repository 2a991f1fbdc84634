//! # Warden - Session-Backed Authentication Server
//!
//! An authentication server built around short-lived access tokens and
//! long-lived, single-use refresh tokens. Every refresh token is bound
//! to a server-side session row; rotation deletes the consumed session
//! before creating its replacement, and access tokens are validated
//! against their session on every protected request, so logout and
//! rotation revoke them immediately.
//!
//! ## Overview
//!
//! Warden can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `warden-server` binary
//! 2. **As a library** - Compose the auth service and router into your
//!    own Axum application
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden::{
//!     auth::{jwt::TokenIssuer, service::AuthService},
//!     db::DatabaseProvider,
//!     AppState,
//! };
//!
//! let store = DatabaseProvider::Memory.create_store().await?;
//! let tokens = TokenIssuer::new(jwt_secret, 900, 604800);
//! let auth_service = Arc::new(AuthService::new(store.clone(), tokens));
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - password hashing, token issuance, orchestration, guard
//! - [`db`] - session/user persistence behind the `AuthStore` trait
//! - [`types`] - common types and error handling
//! - [`utils`] - configuration loading
//!
//! ## Configuration
//!
//! Loaded once from the environment (`.env` supported) into an
//! immutable [`utils::config::Config`]: `JWT_SECRET`,
//! `JWT_ACCESS_TOKEN_TTL`, `JWT_REFRESH_TOKEN_TTL`, `COOKIES_DOMAIN`,
//! `DATABASE_URL`, `HOST`, `PORT`, `ENVIRONMENT`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication core: hashing, tokens, orchestration, guard.
pub mod auth;
/// Persistence layer (libsql) behind the `AuthStore` trait.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::jwt::TokenIssuer;
pub use auth::service::AuthService;
pub use db::{AuthStore, DatabaseProvider, LibsqlStore};
pub use types::{AppError, Result};
pub use utils::config::Config;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup
    pub config: Arc<Config>,
    /// Session and user persistence
    pub store: Arc<dyn AuthStore>,
    /// Authentication service
    pub auth_service: Arc<AuthService>,
}
