use serde::Deserialize;
use std::env;

/// Process-wide configuration, loaded once at startup and passed by
/// reference into constructors. Business logic never reads the
/// environment directly.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bind address for the HTTP server.
    pub server: ServerConfig,
    /// Persistence backend selection.
    pub database: DatabaseConfig,
    /// Token and cookie parameters.
    pub auth: AuthConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind, `HOST` (default `127.0.0.1`).
    pub host: String,
    /// Port to bind, `PORT` (default `3000`).
    pub port: u16,
}

/// Persistence settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `:memory:` or a path to a local SQLite file.
    pub url: String,
}

/// Token signing and refresh-cookie settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret, `JWT_SECRET` (required).
    pub jwt_secret: String,
    /// Access token validity in seconds (short).
    pub access_token_ttl: i64,
    /// Refresh token validity in seconds (long).
    pub refresh_token_ttl: i64,
    /// Domain attribute for the refresh cookie, if any.
    pub cookie_domain: Option<String>,
    /// `Secure` flag on the refresh cookie; off in development only.
    pub secure_cookies: bool,
}

impl Config {
    /// Load the configuration from the environment (`.env` supported).
    ///
    /// Fails if `JWT_SECRET` is absent or a numeric variable does not
    /// parse; everything else has a development-friendly default.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "warden.db".to_string()),
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET")?,
                access_token_ttl: env::var("JWT_ACCESS_TOKEN_TTL")
                    .unwrap_or_else(|_| "900".to_string())
                    .parse()?,
                refresh_token_ttl: env::var("JWT_REFRESH_TOKEN_TTL")
                    .unwrap_or_else(|_| "604800".to_string())
                    .parse()?,
                cookie_domain: env::var("COOKIES_DOMAIN").ok(),
                secure_cookies: environment != "development",
            },
        })
    }
}
