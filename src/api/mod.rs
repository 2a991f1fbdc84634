//! HTTP API Handlers and Routes
//!
//! The REST layer over the auth service, built on Axum.
//!
//! # Endpoints
//!
//! - `POST /auth/signup` - Register and receive tokens
//! - `POST /auth/signin` - Login and receive tokens
//! - `POST /auth/signin/refresh` - Rotate the refresh token (cookie)
//! - `POST /auth/logout` - Revoke the session, clear the cookie
//! - `GET /auth/info` - Current user info (requires access token)
//!
//! # Transport
//!
//! The access token is returned in the response body and expected back
//! as a bearer credential:
//! ```text
//! Authorization: Bearer <token>
//! ```
//! The refresh token only ever travels in the HTTP-only `refreshToken`
//! cookie.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
