//! Authentication core
//!
//! This module implements the session-backed authentication subsystem:
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing
//! - [`auth::jwt`](crate::auth::jwt) - signed access/refresh token issuance
//! - [`auth::service`](crate::auth::service) - register/login/refresh/logout
//!   orchestration with single-use refresh-token rotation
//! - [`auth::middleware`](crate::auth::middleware) - route guard binding
//!   access tokens to live sessions
//!
//! # Security Model
//!
//! - **Password Hashing**: Argon2id (memory-hard) with per-call random salt
//! - **Tokens**: HS256-signed JWTs carrying `{userId, sessionId}`; the
//!   access token is short-lived, the refresh token long-lived and
//!   single-use
//! - **Sessions**: a session row exists exactly as long as its refresh
//!   token is valid and un-rotated; rotation deletes the old row before
//!   creating the replacement, so a replayed refresh token always loses
//! - **Bound access tokens**: the guard rejects access tokens whose
//!   session has been revoked, independent of the token's own TTL

/// HS256 token issuance and verification.
pub mod jwt;
/// Route guard middleware and extractors.
pub mod middleware;
/// Argon2id password hashing and verification.
pub mod password;
/// The auth orchestrator: register, login, refresh, logout, validate.
pub mod service;
