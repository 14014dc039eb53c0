//! Search suggestions and history

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Json, Router, middleware};
use shared::ApiResponse;
use shared::models::{SearchHistory, SearchHistoryCreate, User};

use super::{ApiResult, json_body};
use crate::auth::user_auth_middleware;
use crate::services;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let history = Router::new()
        .route("/api/search/history", get(history).post(add_history))
        .route_layer(middleware::from_fn_with_state(state.clone(), user_auth_middleware));

    Router::new()
        .route("/api/search/suggestions", get(suggestions))
        .merge(history)
}

pub async fn suggestions(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(ApiResponse::success(services::search::suggestions(state.store.as_ref()).await?))
}

pub async fn history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Vec<SearchHistory>> {
    let entries = services::search::history(state.store.as_ref(), &user.id).await?;
    Ok(ApiResponse::success(entries))
}

pub async fn add_history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<SearchHistoryCreate>, JsonRejection>,
) -> ApiResult<SearchHistory> {
    let keyword = json_body(payload)?.keyword.unwrap_or_default();
    let entry = services::search::add_history(state.store.as_ref(), &user.id, &keyword).await?;
    Ok(ApiResponse::created(entry))
}
