use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthUser;
use super::{ApiError, ApiResponse, AppState, CommentDto};

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

/// GET /listings/{id}/comments
/// Public thread for a listing, newest first.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<CommentDto>>>, ApiError> {
    let comments = state.store().comments_for_listing(listing_id).await?;
    let dtos: Vec<CommentDto> = comments.into_iter().map(CommentDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /listings/{id}/comments
/// Content is stored verbatim; comments have no update operation.
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(listing_id): Path<i32>,
    Json(payload): Json<AddCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store().listing_exists(listing_id).await? {
        return Err(ApiError::listing_not_found(listing_id));
    }

    let comment = state
        .store()
        .add_comment(listing_id, caller.id, payload.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CommentDto::from(comment))),
    ))
}
