use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthUser;
use super::{ApiError, ApiResponse, AppState, ListingDto, MessageResponse};
use crate::db::FavoriteAdd;

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub listing_id: i32,
}

/// GET /favorites
/// The caller's favorited listings, newest-favorited first.
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<ListingDto>>>, ApiError> {
    let listings = state.store().favorites_for_user(caller.id).await?;
    let dtos: Vec<ListingDto> = listings.into_iter().map(ListingDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /favorites
/// A second add of the same pair is an error, not a no-op.
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<AddFavoriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store().listing_exists(payload.listing_id).await? {
        return Err(ApiError::listing_not_found(payload.listing_id));
    }

    match state
        .store()
        .add_favorite(caller.id, payload.listing_id)
        .await?
    {
        FavoriteAdd::Added => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(MessageResponse {
                message: "Added to favorites".to_string(),
            })),
        )),
        FavoriteAdd::Duplicate => Err(ApiError::Conflict(
            "Listing already in favorites".to_string(),
        )),
    }
}

/// DELETE /favorites/{listing_id}
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(listing_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let removed = state
        .store()
        .remove_favorite(caller.id, listing_id)
        .await?;

    if removed {
        Ok(Json(ApiResponse::success(MessageResponse {
            message: "Removed from favorites".to_string(),
        })))
    } else {
        Err(ApiError::NotFound("Favorite not found".to_string()))
    }
}
