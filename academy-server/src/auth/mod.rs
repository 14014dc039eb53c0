//! Bearer-token authentication and role checks

pub mod rate_limit;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::HeaderMap;
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, User};

use crate::services::users;
use crate::state::AppState;

/// Token after `Bearer ` in the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that verifies the bearer ID token and loads the caller's
/// user document into request extensions
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::unauthorized().into_response())?;

    let verified = state.identity.verify_id_token(token).await.map_err(|e| {
        if e.is_credential_error() {
            tracing::debug!("ID token validation failed: {e}");
        } else {
            tracing::error!(error = %e, "Token verification unavailable");
        }
        AppError::unauthorized().into_response()
    })?;

    let user = users::get_user(state.store.as_ref(), &verified.uid)
        .await
        .map_err(IntoResponse::into_response)?
        .ok_or_else(|| {
            tracing::debug!(uid = %verified.uid, "Token subject has no user document");
            AppError::unauthorized().into_response()
        })?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Fail unless the user holds one of `roles`
pub fn require_role(user: &User, roles: &[Role], message: &str) -> Result<(), AppError> {
    if roles.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::with_message(
            if roles == [Role::Admin] {
                ErrorCode::AdminRequired
            } else {
                ErrorCode::TrainerRequired
            },
            message,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(http::header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(http::header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(http::header::AUTHORIZATION, "Bearer tok123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("tok123"));
    }

    #[test]
    fn test_require_role() {
        let user = User {
            role: Role::Trainer,
            ..Default::default()
        };
        assert!(require_role(&user, &[Role::Admin, Role::Trainer], "nope").is_ok());

        let err = require_role(&user, &[Role::Admin], "Only admins can create courses").unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert_eq!(err.message, "Only admins can create courses");
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }
}
