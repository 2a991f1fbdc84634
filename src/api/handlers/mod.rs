//! API request handlers.

/// Authentication handlers (signup, signin, refresh, logout, info).
pub mod auth;
