//! Course catalog and enrollment routes

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::{Course, CourseCreate, EnrollRequest, Enrollment, LevelQuery, Lesson, Review, User};

use super::{ApiResult, json_body};
use crate::auth::user_auth_middleware;
use crate::services;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/courses/popular", get(popular))
        .route("/api/courses/by-level", get(by_level))
        .route("/api/courses/{id}", get(get_course))
        .route("/api/course/{id}", get(get_course))
        .route("/api/courses/{id}/lessons", get(lessons))
        .route("/api/courses/{id}/reviews", get(reviews));

    let authenticated = Router::new()
        .route("/api/courses/create", post(create_course))
        .route("/api/courses/enroll", post(enroll))
        .route_layer(middleware::from_fn_with_state(state.clone(), user_auth_middleware));

    public.merge(authenticated)
}

pub async fn popular(State(state): State<AppState>) -> ApiResult<Vec<Course>> {
    let courses = services::courses::popular_courses(state.store.as_ref()).await?;
    Ok(ApiResponse::success(courses))
}

pub async fn by_level(
    State(state): State<AppState>,
    Query(query): Query<LevelQuery>,
) -> ApiResult<Vec<Course>> {
    let level = services::courses::parse_level(query.level.as_deref())?;
    let courses = services::courses::courses_by_level(state.store.as_ref(), level).await?;
    Ok(ApiResponse::success(courses))
}

pub async fn get_course(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Course> {
    let course = services::courses::get_course(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CourseNotFound))?;
    Ok(ApiResponse::success(course))
}

pub async fn lessons(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Lesson>> {
    let lessons = services::courses::lessons_for_course(state.store.as_ref(), &id).await?;
    Ok(ApiResponse::success(lessons))
}

pub async fn reviews(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Review>> {
    let reviews = services::courses::reviews_for_course(state.store.as_ref(), &id).await?;
    Ok(ApiResponse::success(reviews))
}

pub async fn create_course(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<CourseCreate>, JsonRejection>,
) -> ApiResult<Course> {
    let req = json_body(payload)?;
    let course = services::courses::create_course(state.store.as_ref(), &user, req).await?;
    Ok(ApiResponse::created(course).with_message("Course created successfully"))
}

/// Enrollment failures of any kind answer 400 with the underlying message
pub async fn enroll(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<EnrollRequest>, JsonRejection>,
) -> ApiResult<Enrollment> {
    let course_id = json_body(payload)?
        .course_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Course ID is required"))?;

    let enrollment = services::enrollments::create_enrollment(state.store.as_ref(), &user.id, &course_id, None)
        .await
        .map_err(|e| {
            let e: AppError = e.into();
            AppError::with_message(ErrorCode::EnrollmentFailed, e.message)
        })?;
    Ok(ApiResponse::created(enrollment).with_message("Enrolled successfully"))
}
