use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Signup request body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired login, unique across users.
    pub login: String,
    /// Plaintext password; only its Argon2id hash is stored.
    pub password: String,
}

/// Signin request body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Login the account was registered with.
    pub login: String,
    /// Plaintext password to verify.
    pub password: String,
}

/// Body returned by signup/signin/refresh. The refresh token is never
/// part of the body; it travels only in the `refreshToken` cookie.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Short-lived bearer token for protected endpoints.
    pub access_token: String,
}

/// Body returned by the authenticated info endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserInfoResponse {
    /// Login of the authenticated user.
    pub login: String,
}

// ============= Domain Types =============

/// A registered account as stored in the database.
#[derive(Debug, Clone)]
pub struct User {
    /// Stable UUID identifying the user.
    pub id: String,
    /// Unique login.
    pub login: String,
    /// Argon2id PHC hash of the password.
    pub password_hash: String,
    /// Unix timestamp of registration.
    pub created_at: i64,
}

/// One refresh-token lineage. A row exists exactly as long as its
/// refresh token is valid and un-rotated.
#[derive(Debug, Clone)]
pub struct Session {
    /// UUID carried in the tokens' `sid` claim.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// SHA-256 hex of the refresh token this session was opened with.
    pub refresh_token_hash: String,
    /// Unix timestamp the refresh token stops being accepted at.
    pub expires_at: i64,
    /// Unix timestamp the session was opened at.
    pub created_at: i64,
}

impl Session {
    /// Whether the session's refresh TTL has elapsed as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now.timestamp()
    }
}

// ============= Token Claims =============

/// Signed payload carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Session id the token is bound to.
    pub sid: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: usize,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: usize,
}

// ============= Error Types =============

/// Application error, mapped to an HTTP status by `IntoResponse`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected request input (400).
    #[error("Validation error: {0}")]
    Validation(String),

    /// State conflict such as a taken login (409).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Lookup miss, including failed credential checks (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, malformed, or revoked credential. Externally
    /// indistinguishable from the token variants below.
    #[error("Unauthorized")]
    Unauthorized,

    /// Token failed signature, algorithm, or structural checks.
    #[error("Invalid token")]
    InvalidToken,

    /// Token signature is fine but its `exp` has passed.
    #[error("Token expired")]
    TokenExpired,

    /// Storage failure (500, detail logged only).
    #[error("Database error: {0}")]
    Database(String),

    /// Password-hashing primitive failure (500, detail logged only).
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Any other server-side failure (500, detail logged only).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        // The 401 and 500 groups deliberately collapse to fixed
        // messages: callers never learn whether a token was expired,
        // forged, or bound to a revoked session, and internal failure
        // detail stays in the logs.
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized | AppError::InvalidToken | AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired credentials".to_string(),
            ),
            AppError::Database(msg) | AppError::Hashing(msg) | AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;
