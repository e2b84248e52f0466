use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthUser;
use super::{ApiError, ApiResponse, AppState, ListingDto};
use crate::db::ListingFilter;
use crate::services::{Category, Condition, ListingInput};

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub category: Option<Category>,
    pub condition: Option<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /listings
/// Public browse, newest first, optional conjunctive category/condition
/// filter.
pub async fn browse(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ApiResponse<Vec<ListingDto>>>, ApiError> {
    let filter = ListingFilter {
        category: query.category.map(|c| c.as_str().to_string()),
        condition: query.condition.map(|c| c.as_str().to_string()),
    };

    let listings = state.listings().list(&filter).await?;
    let dtos: Vec<ListingDto> = listings.into_iter().map(ListingDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /listings/search?q=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ListingDto>>>, ApiError> {
    let listings = state.listings().search(&query.q).await?;
    let dtos: Vec<ListingDto> = listings.into_iter().map(ListingDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /listings/{id}
pub async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ListingDto>>, ApiError> {
    let listing = state.listings().get(id).await?;
    Ok(Json(ApiResponse::success(ListingDto::from(listing))))
}

/// GET /listings/mine
pub async fn my_listings(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<ListingDto>>>, ApiError> {
    let listings = state.listings().list_by_owner(caller.id).await?;
    let dtos: Vec<ListingDto> = listings.into_iter().map(ListingDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /listings
/// The new listing's owner is the authenticated caller, never a payload
/// field.
pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<ListingInput>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.listings().create(caller.id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ListingDto::from(listing))),
    ))
}

/// PUT /listings/{id}
pub async fn update_listing(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<ListingInput>,
) -> Result<Json<ApiResponse<ListingDto>>, ApiError> {
    let listing = state.listings().update(id, caller.id, payload).await?;
    Ok(Json(ApiResponse::success(ListingDto::from(listing))))
}

/// DELETE /listings/{id}
/// Cascades to the listing's comments and favorites.
pub async fn delete_listing(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    state.listings().delete(id, caller.id).await?;
    Ok(Json(ApiResponse::success(true)))
}
