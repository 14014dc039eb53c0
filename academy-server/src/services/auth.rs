//! Phone and email sign-in

use shared::error::{AppError, ErrorCode};
use shared::models::{AuthResponse, LoginResponse, Role, User};

use super::users;
use crate::error::ServiceResult;
use crate::identity::IdentityProvider;
use crate::store::DocumentStore;

/// Whether a phone number has E.164 shape once spaces are removed
pub fn is_valid_phone_number(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    let mut chars = digits.chars();
    matches!(chars.next(), Some('1'..='9'))
        && (2..=15).contains(&digits.len())
        && chars.all(|c| c.is_ascii_digit())
}

/// Exchange a verified phone-auth ID token for a session
///
/// First sign-in creates the profile with `role` (trainer or student) and
/// the phone number from the token, falling back to `phone_hint`. Existing
/// users keep their stored role.
pub async fn sign_in_with_id_token(
    store: &dyn DocumentStore,
    identity: &dyn IdentityProvider,
    id_token: &str,
    role: Role,
    phone_hint: Option<&str>,
) -> ServiceResult<AuthResponse> {
    let verified = identity.verify_id_token(id_token).await?;

    let existing = users::get_user(store, &verified.uid).await?;
    let is_new_user = existing.is_none();
    let user = match existing {
        Some(user) => user,
        None => {
            let phone_number = verified
                .phone_number
                .or_else(|| phone_hint.map(String::from))
                .unwrap_or_default();
            let role = if role == Role::Trainer {
                Role::Trainer
            } else {
                Role::Student
            };
            users::create_user(
                store,
                &verified.uid,
                User {
                    phone_number,
                    role,
                    ..Default::default()
                },
            )
            .await?
        }
    };

    let token = identity.create_custom_token(&user.id).await?;
    tracing::info!(user_id = %user.id, is_new_user, "Phone sign-in");

    Ok(AuthResponse {
        token,
        id_token: id_token.to_string(),
        is_new_user,
        user,
    })
}

/// Email login: mints a custom token for a registered email
///
/// The password is required but checked client-side by the identity SDK.
pub async fn login(
    store: &dyn DocumentStore,
    identity: &dyn IdentityProvider,
    email: &str,
) -> ServiceResult<LoginResponse> {
    let user = users::get_user_by_email(store, email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    let token = identity.create_custom_token(&user.id).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to create custom token");
        AppError::new(ErrorCode::InvalidCredentials)
    })?;
    tracing::info!(user_id = %user.id, "Email login");
    Ok(LoginResponse { token })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_number_validation() {
        assert!(is_valid_phone_number("+919876543210"));
        assert!(is_valid_phone_number("98765 43210"));
        assert!(is_valid_phone_number("+1 555 123 4567"));
        assert!(!is_valid_phone_number("+0123456"));
        assert!(!is_valid_phone_number("1"));
        assert!(!is_valid_phone_number("+91-98765"));
        assert!(!is_valid_phone_number("1234567890123456"));
        assert!(!is_valid_phone_number(""));
    }
}
