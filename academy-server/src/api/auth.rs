//! Sign-in and account creation
//!
//! POST /api/auth/phone/send-otp        - validate the number; the client SDK sends the code
//! POST /api/auth/phone/verify-otp      - exchange the post-OTP ID token for a session
//! POST /api/auth/phone/verify-id-token - same, choosing trainer or student on first sign-in
//! POST /api/login                      - email login
//! POST /api/users/create               - admin-side user creation

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router, middleware};
use http::HeaderMap;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuthResponse, LoginRequest, LoginResponse, Role, SendOtpRequest, SendOtpResponse,
    UserCreate, UserCreated, VerifyIdTokenRequest, VerifyOtpRequest,
};

use super::{ApiResult, json_body};
use crate::auth::bearer_token;
use crate::auth::rate_limit::{create_user_rate_limit, login_rate_limit, phone_auth_rate_limit};
use crate::error::ServiceError;
use crate::services;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let phone = Router::new()
        .route("/api/auth/phone/send-otp", post(send_otp))
        .route("/api/auth/phone/verify-otp", post(verify_otp))
        .route("/api/auth/phone/verify-id-token", post(verify_id_token))
        .layer(middleware::from_fn_with_state(state.clone(), phone_auth_rate_limit));

    let login = Router::new()
        .route("/api/login", post(login))
        .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    let create_user = Router::new()
        .route("/api/users/create", post(create_user))
        .layer(middleware::from_fn_with_state(state.clone(), create_user_rate_limit));

    phone.merge(login).merge(create_user)
}

fn require_id_token(headers: &HeaderMap) -> Result<&str, AppError> {
    bearer_token(headers).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::NotAuthenticated,
            "Firebase ID token is required in Authorization header",
        )
    })
}

/// Replace the message of a rejected-credential error
fn credential_message(err: ServiceError, message: &str) -> ServiceError {
    match err {
        ServiceError::App(e) if e.code == ErrorCode::TokenInvalid => {
            ServiceError::App(AppError::with_message(ErrorCode::TokenInvalid, message))
        }
        other => other,
    }
}

pub async fn send_otp(payload: Result<Json<SendOtpRequest>, JsonRejection>) -> ApiResult<SendOtpResponse> {
    let req = json_body(payload)?;
    let phone = req
        .phone_number
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::validation("Phone number is required"))?;

    if !services::auth::is_valid_phone_number(&phone) {
        return Err(AppError::new(ErrorCode::InvalidPhoneNumber).into());
    }

    Ok(ApiResponse::success(SendOtpResponse {
        message: "OTP will be sent to your phone via Firebase Auth".into(),
    })
    .with_message("OTP sent successfully"))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let req = json_body(payload)?;
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(phone_number), Some(_otp), Some(_verification_id)) = (
        non_empty(req.phone_number),
        non_empty(req.otp),
        non_empty(req.verification_id),
    ) else {
        return Err(AppError::validation(
            "Phone number, OTP, and verification ID are required",
        )
        .into());
    };

    let id_token = require_id_token(&headers)?;
    let response = services::auth::sign_in_with_id_token(
        state.store.as_ref(),
        state.identity.as_ref(),
        id_token,
        Role::Student,
        Some(&phone_number),
    )
    .await
    .map_err(|e| credential_message(e, "Invalid OTP or verification ID"))?;

    Ok(ApiResponse::success(response).with_message("OTP verified successfully"))
}

/// The body is optional; anything unparseable means "student"
pub async fn verify_id_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<AuthResponse> {
    let id_token = require_id_token(&headers)?;

    let req: VerifyIdTokenRequest = serde_json::from_slice(&body).unwrap_or_default();
    let role = match req.role.as_deref() {
        Some("trainer") => Role::Trainer,
        _ => Role::Student,
    };

    let response = services::auth::sign_in_with_id_token(
        state.store.as_ref(),
        state.identity.as_ref(),
        id_token,
        role,
        None,
    )
    .await?;

    Ok(ApiResponse::success(response).with_message("Authentication successful"))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let req = json_body(payload)?;
    let (Some(email), Some(_password)) = (
        req.email.filter(|s| !s.trim().is_empty()),
        req.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::validation("Email and password are required").into());
    };

    let response =
        services::auth::login(state.store.as_ref(), state.identity.as_ref(), email.trim()).await?;
    Ok(ApiResponse::success(response).with_message("Login successful"))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserCreate>, JsonRejection>,
) -> ApiResult<UserCreated> {
    let req = json_body(payload)?;
    let created = services::users::create_user_account(
        state.store.as_ref(),
        state.identity.as_ref(),
        &state.default_country_code,
        req,
    )
    .await?;
    Ok(ApiResponse::created(created).with_message("User created successfully"))
}
