use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::Store;

pub mod auth;
mod error;
mod movies;
mod reviews;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    // Fails fast when no signing secret is configured.
    let tokens = Arc::new(TokenIssuer::from_config(&config.auth)?);

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(Arc::new(AppState {
        config: Arc::new(RwLock::new(config)),
        store,
        tokens,
    }))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().read().await.server.cors_allowed_origins.clone();

    let protected_routes = Router::new()
        .route("/movies", get(movies::list_movies))
        .route("/movies", post(movies::create_movie))
        .route("/movies/{id}", get(movies::get_movie))
        .route("/reviews", get(reviews::list_reviews))
        .route("/reviews", post(reviews::create_review))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(protected_routes)
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
