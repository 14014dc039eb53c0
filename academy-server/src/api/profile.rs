//! The caller's own profile and push-notification token

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use shared::ApiResponse;
use shared::error::AppError;
use shared::models::{ProfileUpdate, RegisterTokenRequest, SuccessFlag, User};

use super::{ApiResult, json_body};
use crate::auth::user_auth_middleware;
use crate::services;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/profile", get(get_profile).put(update_profile))
        .route("/api/notifications/register-token", post(register_token))
        .route_layer(middleware::from_fn_with_state(state.clone(), user_auth_middleware))
}

pub async fn get_profile(Extension(user): Extension<User>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<User> {
    let update = json_body(payload)?;
    let updated = services::users::update_profile(state.store.as_ref(), &user, update).await?;
    Ok(ApiResponse::success(updated).with_message("Profile updated successfully"))
}

pub async fn register_token(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<RegisterTokenRequest>, JsonRejection>,
) -> ApiResult<SuccessFlag> {
    let fcm_token = json_body(payload)?
        .fcm_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("FCM token is required"))?;

    services::users::register_fcm_token(state.store.as_ref(), &user.id, &fcm_token).await?;
    Ok(ApiResponse::success(SuccessFlag { success: true })
        .with_message("FCM token registered successfully"))
}
