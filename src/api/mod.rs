use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod comments;
mod error;
mod favorites;
mod listings;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn tokens(&self) -> &crate::auth::TokenKeys {
        &self.shared.tokens
    }

    #[must_use]
    pub fn accounts(&self) -> &Arc<dyn crate::services::AccountService> {
        &self.shared.account_service
    }

    #[must_use]
    pub fn listings(&self) -> &Arc<dyn crate::services::ListingService> {
        &self.shared.listing_service
    }
}

pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, max_body_bytes) = {
        let config = state.shared.config.read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.max_body_bytes,
        )
    };

    let api_router = Router::new()
        .merge(create_public_router())
        .merge(create_protected_router(state.clone()))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// Public reads and the credential endpoints. No guard: browsing listings
/// and reading comment threads require no identity.
async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    state
        .store()
        .ping()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(ApiResponse::success("ok")))
}

fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/listings", get(listings::browse))
        .route("/listings/search", get(listings::search))
        .route("/listings/{id}", get(listings::get_listing))
        .route("/listings/{id}/comments", get(comments::list_comments))
}

/// Every route here passes through the bearer-token guard before the
/// handler runs; handlers read the caller from request extensions.
fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/profile", put(auth::update_profile))
        .route("/auth/password", put(auth::change_password))
        .route("/listings", post(listings::create_listing))
        .route("/listings/mine", get(listings::my_listings))
        .route("/listings/{id}", put(listings::update_listing))
        .route("/listings/{id}", delete(listings::delete_listing))
        .route("/listings/{id}/comments", post(comments::add_comment))
        .route("/favorites", get(favorites::list_favorites))
        .route("/favorites", post(favorites::add_favorite))
        .route("/favorites/{listing_id}", delete(favorites::remove_favorite))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
