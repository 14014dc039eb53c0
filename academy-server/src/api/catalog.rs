//! Public catalog listings

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use shared::ApiResponse;
use shared::models::{Category, Mentor, Promote};

use super::ApiResult;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(categories))
        .route("/api/mentors", get(mentors))
        .route("/api/promote", get(promotes))
}

pub async fn categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::success(services::catalog::categories(state.store.as_ref()).await?))
}

pub async fn mentors(State(state): State<AppState>) -> ApiResult<Vec<Mentor>> {
    Ok(ApiResponse::success(services::catalog::mentors(state.store.as_ref()).await?))
}

pub async fn promotes(State(state): State<AppState>) -> ApiResult<Vec<Promote>> {
    Ok(ApiResponse::success(services::catalog::active_promotes(state.store.as_ref()).await?))
}
