use crate::types::{AppError, Claims, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Issues and verifies HS256-signed access and refresh tokens.
///
/// Both token kinds carry `{sub: userId, sid: sessionId}`; they differ
/// only in TTL. Exactly one signing algorithm is accepted on verify,
/// so an algorithm-confusion token is rejected as invalid.
pub struct TokenIssuer {
    jwt_secret: String,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl TokenIssuer {
    /// Creates a new TokenIssuer.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for signing JWTs (should be at least 32 chars)
    /// * `access_ttl` - Access token validity in seconds
    /// * `refresh_ttl` - Refresh token validity in seconds
    pub fn new(jwt_secret: String, access_ttl: i64, refresh_ttl: i64) -> Self {
        Self {
            jwt_secret,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Refresh token validity in seconds.
    pub fn refresh_ttl(&self) -> i64 {
        self.refresh_ttl
    }

    /// Issues a short-lived access token bound to a user and session.
    pub fn issue_access(&self, user_id: &str, session_id: &str) -> Result<String> {
        self.issue(user_id, session_id, self.access_ttl)
    }

    /// Issues a long-lived refresh token bound to a user and session.
    pub fn issue_refresh(&self, user_id: &str, session_id: &str) -> Result<String> {
        self.issue(user_id, session_id, self.refresh_ttl)
    }

    fn issue(&self, user_id: &str, session_id: &str, ttl: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            exp: (now + Duration::seconds(ttl)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies a token's signature and expiry and returns its claims.
    ///
    /// Fails with [`AppError::TokenExpired`] past the TTL and
    /// [`AppError::InvalidToken`] for every other defect (bad
    /// signature, wrong algorithm, malformed payload).
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }

    /// Hashes a refresh token with SHA-256 for storage at rest.
    ///
    /// The raw refresh token is never persisted; on refresh the
    /// presented token's hash must match the stored one.
    pub fn token_hash(&self, token: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_issuer() -> TokenIssuer {
        TokenIssuer::new(
            "test-secret-key-that-is-at-least-32-chars".to_string(),
            900,    // 15 minutes
            604800, // 7 days
        )
    }

    #[test]
    fn test_access_token_roundtrip() {
        let issuer = create_test_issuer();

        let token = issuer
            .issue_access("user-123", "sess-456")
            .expect("should issue token");
        let claims = issuer.verify(&token).expect("should verify token");

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.sid, "sess-456");
    }

    #[test]
    fn test_access_and_refresh_differ() {
        let issuer = create_test_issuer();

        let access = issuer
            .issue_access("user-1", "sess-1")
            .expect("should issue");
        let refresh = issuer
            .issue_refresh("user-1", "sess-1")
            .expect("should issue");

        assert_ne!(access, refresh, "TTLs differ, so tokens must differ");

        let access_claims = issuer.verify(&access).expect("should verify");
        let refresh_claims = issuer.verify(&refresh).expect("should verify");
        assert!(refresh_claims.exp > access_claims.exp);
    }

    #[test]
    fn test_expired_token() {
        // Negative TTL puts exp far enough in the past to clear the
        // default validation leeway.
        let issuer = TokenIssuer::new(
            "test-secret-key-that-is-at-least-32-chars".to_string(),
            -120,
            604800,
        );

        let token = issuer
            .issue_access("user-1", "sess-1")
            .expect("should issue token");
        let result = issuer.verify(&token);

        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token_invalid() {
        let issuer = create_test_issuer();

        let result = issuer.verify("invalid.token.here");

        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_invalid() {
        let issuer1 = TokenIssuer::new("secret-one-that-is-32-chars-long".to_string(), 900, 604800);
        let issuer2 = TokenIssuer::new("secret-two-that-is-32-chars-long".to_string(), 900, 604800);

        let token = issuer1
            .issue_access("user-789", "sess-1")
            .expect("should issue");
        let result = issuer2.verify(&token);

        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_algorithm_confusion_rejected() {
        let issuer = create_test_issuer();
        let claims = Claims {
            sub: "user-1".to_string(),
            sid: "sess-1".to_string(),
            exp: (Utc::now() + Duration::seconds(900)).timestamp() as usize,
            iat: Utc::now().timestamp() as usize,
        };

        // Same secret, different algorithm: must not verify.
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret("test-secret-key-that-is-at-least-32-chars".as_bytes()),
        )
        .expect("should sign");

        let result = issuer.verify(&token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_token_hash_stable_and_hex() {
        let issuer = create_test_issuer();

        let hash1 = issuer.token_hash("some-refresh-token");
        let hash2 = issuer.token_hash("some-refresh-token");
        assert_eq!(hash1, hash2, "same token should hash to same value");

        assert_eq!(hash1.len(), 64, "SHA256 hash should be 64 hex characters");
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));

        assert_ne!(issuer.token_hash("token-a"), issuer.token_hash("token-b"));
    }

    #[test]
    fn test_claims_expiration_window() {
        let issuer = create_test_issuer();
        let token = issuer
            .issue_access("user", "sess")
            .expect("should issue");
        let claims = issuer.verify(&token).expect("should verify");

        let now = Utc::now().timestamp() as usize;

        assert!(
            claims.iat <= now && claims.iat >= now - 5,
            "iat should be current timestamp"
        );

        let expected_exp = claims.iat + 900;
        assert!(
            claims.exp >= expected_exp - 5 && claims.exp <= expected_exp + 5,
            "exp should be iat + access TTL"
        );
    }
}
