//! Attendance marking and history

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use shared::ApiResponse;
use shared::models::{Attendance, CourseFilter, MarkAttendance, User};

use super::{ApiResult, json_body};
use crate::auth::user_auth_middleware;
use crate::services;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/attendance/mark", post(mark))
        .route("/api/attendance/my-attendance", get(my_attendance))
        .route_layer(middleware::from_fn_with_state(state.clone(), user_auth_middleware))
}

pub async fn mark(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<MarkAttendance>, JsonRejection>,
) -> ApiResult<Attendance> {
    let req = json_body(payload)?;
    let attendance = services::attendance::mark_attendance(state.store.as_ref(), &user, req).await?;
    Ok(ApiResponse::created(attendance).with_message("Attendance marked successfully"))
}

pub async fn my_attendance(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(filter): Query<CourseFilter>,
) -> ApiResult<Vec<Attendance>> {
    let course_id = filter.course_id.filter(|id| !id.is_empty());
    let records =
        services::attendance::for_user(state.store.as_ref(), &user.id, course_id.as_deref()).await?;
    Ok(ApiResponse::success(records))
}
