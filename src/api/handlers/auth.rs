use crate::{
    auth::{middleware::AuthUser, service::IssuedAuth},
    types::{LoginRequest, RegisterRequest, Result, TokenResponse, UserInfoResponse},
    utils::config::AuthConfig,
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::OffsetDateTime;

/// Cookie carrying the refresh token. Never readable by scripts and
/// never part of a response body.
const REFRESH_COOKIE: &str = "refreshToken";

fn refresh_cookie(auth: &AuthConfig, value: String, expires_at: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(auth.secure_cookies);
    if let Some(domain) = &auth.cookie_domain {
        cookie.set_domain(domain.clone());
    }
    if let Ok(expires) = OffsetDateTime::from_unix_timestamp(expires_at) {
        cookie.set_expires(expires);
    }
    cookie
}

/// An expired empty cookie, instructing the client to drop the token.
fn clear_refresh_cookie(auth: &AuthConfig) -> Cookie<'static> {
    refresh_cookie(auth, String::new(), 0)
}

fn with_refresh_cookie(
    state: &AppState,
    jar: CookieJar,
    issued: IssuedAuth,
) -> (CookieJar, Json<TokenResponse>) {
    let IssuedAuth {
        access_token,
        refresh_token,
        refresh_expires_at,
    } = issued;

    let jar = jar.add(refresh_cookie(
        &state.config.auth,
        refresh_token,
        refresh_expires_at,
    ));

    (jar, Json(TokenResponse { access_token }))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, session opened", body = TokenResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Login already taken")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<TokenResponse>)> {
    let issued = state
        .auth_service
        .register(&payload.login, &payload.password)
        .await?;

    let (jar, body) = with_refresh_cookie(&state, jar, issued);
    Ok((StatusCode::CREATED, jar, body))
}

/// Login with login and password
#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 404, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>)> {
    let issued = state
        .auth_service
        .login(&payload.login, &payload.password)
        .await?;

    Ok(with_refresh_cookie(&state, jar, issued))
}

/// Rotate the refresh token presented in the cookie
#[utoipa::path(
    post,
    path = "/auth/signin/refresh",
    responses(
        (status = 200, description = "New token pair issued", body = TokenResponse),
        (status = 401, description = "Missing, invalid, expired, or consumed refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenResponse>)> {
    let refresh_token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    let issued = state.auth_service.refresh(refresh_token.as_deref()).await?;

    Ok(with_refresh_cookie(&state, jar, issued))
}

/// Revoke the current session and clear the refresh cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out; always succeeds")
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let refresh_token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    state.auth_service.logout(refresh_token.as_deref()).await;

    let jar = jar.add(clear_refresh_cookie(&state.config.auth));
    (jar, StatusCode::OK)
}

/// Current user info
#[utoipa::path(
    get,
    path = "/auth/info",
    responses(
        (status = 200, description = "Authenticated user info", body = UserInfoResponse),
        (status = 401, description = "Missing or revoked access token")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn info(AuthUser(user): AuthUser) -> Json<UserInfoResponse> {
    Json(UserInfoResponse { login: user.login })
}
