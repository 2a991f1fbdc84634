use crate::auth::middleware::require_session;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Build the auth router: public endpoints merged with the
/// session-guarded ones.
pub fn create_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required; refresh and logout read the cookie)
        .route("/auth/signup", post(crate::api::handlers::auth::signup))
        .route("/auth/signin", post(crate::api::handlers::auth::signin))
        .route(
            "/auth/signin/refresh",
            post(crate::api::handlers::auth::refresh),
        )
        .route("/auth/logout", post(crate::api::handlers::auth::logout));

    let protected_routes = Router::new()
        // Protected routes (valid access token bound to a live session)
        .route("/auth/info", get(crate::api::handlers::auth::info))
        .layer(middleware::from_fn_with_state(state, require_session));

    public_routes.merge(protected_routes)
}
