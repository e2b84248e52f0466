use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse, UserDto};
use crate::services::{ProfileInput, RegisterInput};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: UserDto,
    pub token: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Caller identity resolved from a verified bearer token. Inserted into
/// request extensions by [`auth_middleware`]; protected handlers take it
/// via `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects the request before any handler side effect when the credential
/// is missing (401) or fails signature/expiry verification (401).
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let Some(token) = extract_bearer_token(&headers) else {
        return Err(ApiError::Unauthorized(
            "Authentication required".to_string(),
        ));
    };

    let claims = state
        .tokens()
        .verify(&token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create an account and sign the new user in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.accounts().register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SessionResponse {
            user: UserDto::from(session.user),
            token: session.token,
        })),
    ))
}

/// POST /auth/login
/// Verify credentials, return the user and a fresh token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let session = state
        .accounts()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(SessionResponse {
        user: UserDto::from(session.user),
        token: session.token,
    })))
}

/// PUT /auth/profile
/// Overwrite the caller's profile fields.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<ProfileInput>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.accounts().update_profile(caller.id, payload).await?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// PUT /auth/password
/// Change the caller's password after re-verifying the current one.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .accounts()
        .change_password(caller.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated successfully".to_string(),
    })))
}
