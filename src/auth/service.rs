use crate::auth::{jwt::TokenIssuer, password};
use crate::db::AuthStore;
use crate::types::{AppError, Result, User};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Generic message for both unknown-login and wrong-password failures,
/// so responses cannot be used to enumerate accounts.
const INVALID_CREDENTIALS: &str = "Invalid login or password";

/// Tokens produced by a successful register/login/refresh.
///
/// The access token goes into the response body; the raw refresh token
/// is only ever transmitted via the `refreshToken` cookie.
#[derive(Debug)]
pub struct IssuedAuth {
    /// Short-lived bearer token, returned in the response body.
    pub access_token: String,
    /// Single-use refresh token, delivered only via cookie.
    pub refresh_token: String,
    /// Unix timestamp the refresh token and its session expire at.
    pub refresh_expires_at: i64,
}

/// Coordinates password hashing, token issuance, and session storage
/// to implement the register/login/refresh/logout/validate use cases.
///
/// Holds no long-lived state besides configuration: every operation
/// re-reads from the store within the scope of a single request.
pub struct AuthService {
    store: Arc<dyn AuthStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    /// Create a service over a store and a token issuer.
    pub fn new(store: Arc<dyn AuthStore>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    /// The issuer used for signing and verification.
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Registers a new user and opens their first session.
    pub async fn register(&self, login: &str, password: &str) -> Result<IssuedAuth> {
        if login.trim().is_empty() {
            return Err(AppError::Validation("Login is required".to_string()));
        }
        if password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if self.store.find_user_by_login(login).await?.is_some() {
            return Err(AppError::Conflict(
                "A user with this login already exists".to_string(),
            ));
        }

        let password_hash = password::hash_password(password)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            login: login.to_string(),
            password_hash,
            created_at: Utc::now().timestamp(),
        };
        self.store
            .create_user(&user.id, &user.login, &user.password_hash)
            .await?;

        self.issue(&user).await
    }

    /// Authenticates credentials and opens a new session.
    pub async fn login(&self, login: &str, password: &str) -> Result<IssuedAuth> {
        let user = self
            .store
            .find_user_by_login(login)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_CREDENTIALS.to_string()))?;

        if !password::verify_password(password, &user.password_hash) {
            return Err(AppError::NotFound(INVALID_CREDENTIALS.to_string()));
        }

        self.issue(&user).await
    }

    /// Rotates a refresh token: consumes the presented one and issues a
    /// brand-new session and token pair.
    ///
    /// Every failure on this path, internal errors included, surfaces
    /// as `Unauthorized`; the caller never learns which step rejected
    /// the token.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<IssuedAuth> {
        self.refresh_inner(refresh_token).await.map_err(|err| {
            debug!(error = %err, "refresh rejected");
            AppError::Unauthorized
        })
    }

    async fn refresh_inner(&self, refresh_token: Option<&str>) -> Result<IssuedAuth> {
        let token = refresh_token.ok_or(AppError::Unauthorized)?;

        let claims = self.tokens.verify(token)?;

        let session = self
            .store
            .find_session(&claims.sid)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // Lazy expiry sweep: a session past its TTL is removed on sight.
        if session.is_expired(Utc::now()) {
            self.store.delete_session(&session.id).await?;
            return Err(AppError::Unauthorized);
        }

        // The signature alone is not enough: the presented token must be
        // the one this session was created with. A stolen-then-rotated
        // or otherwise stale token fails here.
        if self.tokens.token_hash(token) != session.refresh_token_hash {
            return Err(AppError::Unauthorized);
        }

        // Delete-then-create rotation. The delete is the atomic arbiter:
        // of two concurrent refreshes with the same token, exactly one
        // removes the row, and the loser is rejected. A crash after the
        // delete revokes access rather than duplicating refresh tokens.
        if !self.store.delete_session(&session.id).await? {
            return Err(AppError::Unauthorized);
        }

        let user = self
            .store
            .find_user_by_id(&session.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.issue(&user).await
    }

    /// Revokes the session named by a refresh token, best effort.
    ///
    /// Logout never fails visibly: a missing, forged, or expired token
    /// and even a store failure are all swallowed (logged internally).
    pub async fn logout(&self, refresh_token: Option<&str>) {
        let Some(token) = refresh_token else {
            return;
        };
        let Ok(claims) = self.tokens.verify(token) else {
            return;
        };
        if let Err(err) = self.store.delete_session(&claims.sid).await {
            debug!(error = %err, "logout session delete failed");
        }
    }

    /// Validates an access token for a protected request.
    ///
    /// Beyond signature and expiry, the token's session must still
    /// exist and be unexpired: logout and rotation revoke outstanding
    /// access tokens immediately, regardless of their remaining TTL.
    pub async fn validate(&self, access_token: &str) -> Result<User> {
        let claims = self
            .tokens
            .verify(access_token)
            .map_err(|_| AppError::Unauthorized)?;

        let user = self
            .store
            .find_user_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let session = self
            .store
            .find_session(&claims.sid)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if session.is_expired(Utc::now()) {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Shared issue procedure for register, login, and refresh.
    ///
    /// Generates a fresh session id, signs both tokens against it, and
    /// persists the session with the refresh token's hash.
    async fn issue(&self, user: &User) -> Result<IssuedAuth> {
        let session_id = Uuid::new_v4().to_string();

        let access_token = self.tokens.issue_access(&user.id, &session_id)?;
        let refresh_token = self.tokens.issue_refresh(&user.id, &session_id)?;

        let refresh_expires_at =
            (Utc::now() + Duration::seconds(self.tokens.refresh_ttl())).timestamp();

        self.store
            .create_session(
                &session_id,
                &user.id,
                &self.tokens.token_hash(&refresh_token),
                refresh_expires_at,
            )
            .await?;

        Ok(IssuedAuth {
            access_token,
            refresh_token,
            refresh_expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LibsqlStore;

    async fn service() -> AuthService {
        let store = LibsqlStore::new_memory()
            .await
            .expect("should open in-memory store");
        AuthService::new(
            Arc::new(store),
            TokenIssuer::new(
                "test-secret-key-that-is-at-least-32-chars".to_string(),
                900,
                604800,
            ),
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service().await;

        let registered = service
            .register("a@b.com", "Secret1!pass")
            .await
            .expect("register should succeed");
        assert!(!registered.access_token.is_empty());

        let logged_in = service
            .login("a@b.com", "Secret1!pass")
            .await
            .expect("login should succeed");
        assert!(!logged_in.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_register_empty_login() {
        let service = service().await;

        let result = service.register("  ", "Secret1!pass").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let service = service().await;

        let result = service.register("a@b.com", "short").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_login() {
        let service = service().await;

        service
            .register("dup@b.com", "Secret1!pass")
            .await
            .expect("first register should succeed");
        let result = service.register("dup@b.com", "Other2!pass").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service().await;

        service
            .register("real@b.com", "Secret1!pass")
            .await
            .expect("register should succeed");

        let unknown_login = service.login("ghost@b.com", "Secret1!pass").await;
        let wrong_password = service.login("real@b.com", "WrongPass1!").await;

        let (Err(AppError::NotFound(msg_a)), Err(AppError::NotFound(msg_b))) =
            (unknown_login, wrong_password)
        else {
            panic!("both failures should be NotFound");
        };
        assert_eq!(msg_a, msg_b, "messages must not reveal which part was wrong");
    }

    #[tokio::test]
    async fn test_refresh_rotates_session() {
        let service = service().await;

        let issued = service
            .register("rot@b.com", "Secret1!pass")
            .await
            .expect("register should succeed");

        let rotated = service
            .refresh(Some(&issued.refresh_token))
            .await
            .expect("refresh should succeed");
        assert_ne!(rotated.refresh_token, issued.refresh_token);

        // The consumed refresh token is permanently invalid.
        let replay = service.refresh(Some(&issued.refresh_token)).await;
        assert!(matches!(replay, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_without_token() {
        let service = service().await;

        let result = service.refresh(None).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_with_garbage_token() {
        let service = service().await;

        let result = service.refresh(Some("not.a.jwt")).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_substituted_token_rejected() {
        // A structurally valid refresh token whose hash does not match
        // the stored session must be rejected even though its signature
        // and session id check out.
        let service = service().await;

        let issued = service
            .register("sub@b.com", "Secret1!pass")
            .await
            .expect("register should succeed");
        let claims = service
            .tokens()
            .verify(&issued.refresh_token)
            .expect("should verify");

        // Sign with the same secret but a different refresh TTL so the
        // forged token's `exp` (and thus the whole JWT) deterministically
        // differs from the issued one even within the same second.
        let forger = TokenIssuer::new(
            "test-secret-key-that-is-at-least-32-chars".to_string(),
            900,
            3600,
        );
        let forged = forger
            .issue_refresh(&claims.sub, &claims.sid)
            .expect("should sign");
        assert_ne!(forged, issued.refresh_token);

        let result = service.refresh(Some(&forged)).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_logout_revokes_access_token() {
        let service = service().await;

        let issued = service
            .register("out@b.com", "Secret1!pass")
            .await
            .expect("register should succeed");

        service
            .validate(&issued.access_token)
            .await
            .expect("access token should validate before logout");

        service.logout(Some(&issued.refresh_token)).await;

        // The bound session is gone, so the access token is rejected
        // even though its own TTL has not elapsed.
        let result = service.validate(&issued.access_token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_logout_never_fails() {
        let service = service().await;

        service.logout(None).await;
        service.logout(Some("garbage")).await;
        // Logging out twice with the same token is also fine.
        let issued = service
            .register("twice@b.com", "Secret1!pass")
            .await
            .expect("register should succeed");
        service.logout(Some(&issued.refresh_token)).await;
        service.logout(Some(&issued.refresh_token)).await;
    }

    #[tokio::test]
    async fn test_concurrent_refresh_single_winner() {
        let service = Arc::new(service().await);

        let issued = service
            .register("race@b.com", "Secret1!pass")
            .await
            .expect("register should succeed");

        let token = issued.refresh_token.clone();
        let (a, b) = tokio::join!(
            service.refresh(Some(&token)),
            service.refresh(Some(&token)),
        );

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one concurrent refresh may win");
    }

    #[tokio::test]
    async fn test_validate_unknown_user() {
        let service = service().await;

        let token = service
            .tokens()
            .issue_access("no-such-user", "no-such-session")
            .expect("should sign");
        let result = service.validate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
