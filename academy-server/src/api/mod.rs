//! HTTP API for academy-server
//!
//! Every handler answers with the [`ApiResponse`] envelope. Each area
//! exposes a `router` that carries its own auth and rate-limit layers;
//! [`create_router`] merges them and adds the tower-http stack.

pub mod attendance;
pub mod auth;
pub mod catalog;
pub mod chat;
pub mod courses;
pub mod health;
pub mod payments;
pub mod profile;
pub mod schedules;
pub mod search;
pub mod upload;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use shared::ApiResponse;
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServiceError;
use crate::state::AppState;

/// Handler result: an envelope or a service error rendered as one
pub type ApiResult<T> = Result<ApiResponse<T>, ServiceError>;

/// Unwrap a JSON body, answering malformed ones with an envelope error
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AppError::invalid("Invalid request body. Expected JSON.")
    })
}

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::router(&state))
        .merge(profile::router(&state))
        .merge(courses::router(&state))
        .merge(catalog::router())
        .merge(payments::router(&state))
        .merge(schedules::router(&state))
        .merge(attendance::router(&state))
        .merge(chat::router(&state))
        .merge(search::router(&state))
        .merge(upload::router(&state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
