//! Live session scheduling

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use chrono::Utc;
use shared::ApiResponse;
use shared::models::{CourseFilter, Schedule, ScheduleCreate, User};

use super::{ApiResult, json_body};
use crate::auth::user_auth_middleware;
use crate::services;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/schedules/create", post(create))
        .route("/api/schedules/upcoming", get(upcoming))
        .route_layer(middleware::from_fn_with_state(state.clone(), user_auth_middleware))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<ScheduleCreate>, JsonRejection>,
) -> ApiResult<Schedule> {
    let req = json_body(payload)?;
    let schedule = services::schedules::create_schedule(state.store.as_ref(), &user, req).await?;
    Ok(ApiResponse::created(schedule).with_message("Schedule created successfully"))
}

pub async fn upcoming(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(filter): Query<CourseFilter>,
) -> ApiResult<Vec<Schedule>> {
    let course_id = filter.course_id.filter(|id| !id.is_empty());
    let schedules = services::schedules::upcoming_schedules(
        state.store.as_ref(),
        &user,
        course_id.as_deref(),
        Utc::now(),
    )
    .await?;
    Ok(ApiResponse::success(schedules))
}
