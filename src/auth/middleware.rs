use crate::types::{AppError, User};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Identity resolved by the session guard, attached to request
/// extensions for downstream handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Route guard for protected endpoints.
///
/// Verifies the bearer access token and checks that its bound session
/// still exists, so logout and rotation revoke outstanding access
/// tokens immediately. On success the resolved user is injected into
/// the request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or(AppError::Unauthorized)?;

    let user = state.auth_service.validate(&token).await?;
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

// Extractor for the guarded identity
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Extracts the user resolved by [`require_session`]. Rejects with 401
/// if the route was not guarded.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(|CurrentUser(user)| AuthUser(user))
            .ok_or(AppError::Unauthorized)
    }
}
