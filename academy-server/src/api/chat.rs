//! Course chat rooms

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Router, middleware};
use chrono::Utc;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::{ChatAccess, ChatRoom, ChatRoomStatus, ChatSyncReport, Role, User};

use super::ApiResult;
use crate::auth::{require_role, user_auth_middleware};
use crate::services::chat;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/chat/rooms", get(list_rooms))
        .route("/api/chat/rooms/{room_id}/check-access", get(check_access))
        .route("/api/chat/rooms/sync", post(sync_statuses))
        .route_layer(middleware::from_fn_with_state(state.clone(), user_auth_middleware))
}

pub async fn list_rooms(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Vec<ChatRoom>> {
    let rooms = chat::list_rooms_for_user(state.store.as_ref(), &user.id).await?;
    Ok(ApiResponse::success(rooms))
}

pub async fn check_access(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(room_id): Path<String>,
) -> ApiResult<ChatAccess> {
    let now = Utc::now();
    if !chat::check_access(state.store.as_ref(), &room_id, &user.id, now).await {
        return Err(AppError::new(ErrorCode::ChatAccessDenied).into());
    }

    // Re-read so a status flipped by the check is reflected
    let room = chat::get_room(state.store.as_ref(), &room_id).await?;
    let can_send_message = room.as_ref().is_some_and(|r| chat::can_send_message(r, now));
    Ok(ApiResponse::success(ChatAccess {
        has_access: true,
        can_send_message,
        status: room.as_ref().map(|r| r.status).unwrap_or(ChatRoomStatus::Active),
        room,
    }))
}

pub async fn sync_statuses(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<ChatSyncReport> {
    require_role(&user, &[Role::Admin], "Only admins can sync chat rooms")?;
    let report = chat::sync_statuses(state.store.as_ref(), Utc::now()).await?;
    Ok(ApiResponse::success(report).with_message("Chat room statuses synced"))
}
