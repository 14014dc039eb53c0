//! Checkout: order creation and payment verification

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Extension, Json, Router, middleware};
use shared::ApiResponse;
use shared::models::{CreateOrderRequest, OrderResponse, PaymentVerification, User, VerifyPaymentRequest};

use super::{ApiResult, json_body};
use crate::auth::user_auth_middleware;
use crate::services;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/payments/create-order", post(create_order))
        .route("/api/payments/verify", post(verify))
        .route_layer(middleware::from_fn_with_state(state.clone(), user_auth_middleware))
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<OrderResponse> {
    let req = json_body(payload)?;
    let order = services::payments::create_order(state.payments.as_ref(), &user, req).await?;
    Ok(ApiResponse::created(order).with_message("Order created successfully"))
}

pub async fn verify(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> ApiResult<PaymentVerification> {
    let req = json_body(payload)?;
    let verification =
        services::payments::verify_payment(state.store.as_ref(), state.payments.as_ref(), &user, req)
            .await?;
    Ok(ApiResponse::success(verification).with_message("Payment verified successfully"))
}
