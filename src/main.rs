use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warden::{
    api,
    auth::{jwt::TokenIssuer, service::AuthService},
    db::DatabaseProvider,
    utils::config::Config,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warden=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(
        Config::from_env().map_err(|e| anyhow::anyhow!("configuration error: {}", e))?,
    );

    let store = DatabaseProvider::from_config(&config.database)
        .create_store()
        .await?;

    let tokens = TokenIssuer::new(
        config.auth.jwt_secret.clone(),
        config.auth.access_token_ttl,
        config.auth.refresh_token_ttl,
    );
    let auth_service = Arc::new(AuthService::new(store.clone(), tokens));

    let state = AppState {
        config: config.clone(),
        store,
        auth_service,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = axum::Router::new()
        .route("/health", axum::routing::get(|| async { "OK" }))
        .merge(api::routes::create_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "warden server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
