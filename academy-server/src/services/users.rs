//! User profiles

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{ProfileUpdate, Role, User, UserCreate, UserCreated};
use shared::util::{format_iso, now_millis};

use crate::error::ServiceResult;
use crate::identity::{IdentityProvider, NewIdentityUser};
use crate::store::{Document, DocumentStore, Query, collections, find_one, get_as, to_document};

pub async fn get_user(store: &dyn DocumentStore, user_id: &str) -> ServiceResult<Option<User>> {
    Ok(get_as(store, collections::USERS, user_id).await?)
}

pub async fn get_user_by_email(store: &dyn DocumentStore, email: &str) -> ServiceResult<Option<User>> {
    Ok(find_one(store, Query::new(collections::USERS).where_eq("email", email)).await?)
}

async fn get_user_by_phone(store: &dyn DocumentStore, phone: &str) -> ServiceResult<Option<User>> {
    Ok(find_one(store, Query::new(collections::USERS).where_eq("phoneNumber", phone)).await?)
}

async fn require_user(store: &dyn DocumentStore, user_id: &str) -> ServiceResult<User> {
    get_user(store, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).into())
}

/// Write a user document under `user_id`, stamping createdAt/updatedAt
pub async fn create_user(store: &dyn DocumentStore, user_id: &str, user: User) -> ServiceResult<User> {
    let now = Utc::now();
    let user = User {
        id: user_id.to_string(),
        created_at: Some(now),
        updated_at: Some(now),
        ..user
    };
    store
        .set(collections::USERS, user_id, to_document(&user)?)
        .await?;
    tracing::info!(user_id = %user_id, role = %user.role, "User created");
    require_user(store, user_id).await
}

/// Merge `patch` into the user document, stamping updatedAt
pub async fn update_user(
    store: &dyn DocumentStore,
    user_id: &str,
    mut patch: Document,
) -> ServiceResult<User> {
    patch.insert("updatedAt".into(), Value::String(format_iso(&Utc::now())));
    store.update(collections::USERS, user_id, patch).await?;
    require_user(store, user_id).await
}

/// Apply a profile edit made by `user`
///
/// Resending the caller's current role is a no-op. Changing it to anything
/// else requires an admin caller and fails with `PermissionDenied` otherwise.
pub async fn update_profile(
    store: &dyn DocumentStore,
    user: &User,
    update: ProfileUpdate,
) -> ServiceResult<User> {
    let mut patch = Document::new();
    let fields = [
        ("fullName", update.full_name),
        ("email", update.email),
        ("bio", update.bio),
        ("location", update.location),
        ("birthday", update.birthday),
        ("avatar", update.avatar),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            patch.insert(key.into(), Value::String(value));
        }
    }

    if let Some(role) = update.role.filter(|r| !r.is_empty()) {
        let role: Role = role
            .parse()
            .map_err(|_| AppError::new(ErrorCode::InvalidRole))?;
        if role != user.role {
            if user.role != Role::Admin {
                return Err(AppError::with_message(
                    ErrorCode::PermissionDenied,
                    "Only admins can change roles",
                )
                .into());
            }
            patch.insert("role".into(), Value::String(role.as_str().into()));
        }
    }

    update_user(store, &user.id, patch).await
}

pub async fn register_fcm_token(
    store: &dyn DocumentStore,
    user_id: &str,
    fcm_token: &str,
) -> ServiceResult<()> {
    let mut patch = Document::new();
    patch.insert("fcmToken".into(), Value::String(fcm_token.to_string()));
    update_user(store, user_id, patch).await?;
    tracing::info!(user_id = %user_id, "FCM token registered");
    Ok(())
}

/// Prefix `country_code` onto numbers entered without one
pub fn normalize_phone(phone: &str, country_code: &str) -> String {
    let phone = phone.trim();
    if phone.is_empty() || phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("{country_code}{phone}")
    }
}

/// `user_<millis>_<9 random chars>`
fn generate_user_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("user_{}_{suffix}", now_millis())
}

/// Admin-side user creation
///
/// The profile is stored first; mirroring the phone number into the identity
/// pool is best effort. When the pool already knows the number under another
/// uid, the profile moves to that uid so phone sign-in finds it.
pub async fn create_user_account(
    store: &dyn DocumentStore,
    identity: &dyn IdentityProvider,
    country_code: &str,
    req: UserCreate,
) -> ServiceResult<UserCreated> {
    let full_name = req
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let role = req.role.as_deref().filter(|s| !s.is_empty());
    let (Some(full_name), Some(role)) = (full_name, role) else {
        return Err(AppError::validation("Full name and role are required").into());
    };
    let role: Role = role
        .parse()
        .map_err(|_| AppError::new(ErrorCode::InvalidRole))?;

    let phone_number = normalize_phone(req.phone_number.as_deref().unwrap_or_default(), country_code);
    let email = req.email.as_deref().unwrap_or_default().trim().to_string();

    if !phone_number.is_empty() && get_user_by_phone(store, &phone_number).await?.is_some() {
        return Err(AppError::conflict(ErrorCode::PhoneNumberExists).into());
    }
    if !email.is_empty() && get_user_by_email(store, &email).await?.is_some() {
        return Err(AppError::conflict(ErrorCode::EmailExists).into());
    }

    let user_id = generate_user_id();
    let mut user = create_user(
        store,
        &user_id,
        User {
            full_name: full_name.to_string(),
            email: email.clone(),
            phone_number: phone_number.clone(),
            role,
            bio: req.bio.as_deref().unwrap_or_default().trim().to_string(),
            birthday: req.birthday.unwrap_or_default(),
            location: req.location.as_deref().unwrap_or_default().trim().to_string(),
            ..Default::default()
        },
    )
    .await?;

    if !phone_number.is_empty() {
        match identity.find_user_by_phone(&phone_number).await {
            Ok(Some(uid)) if uid != user_id => {
                store
                    .set(collections::USERS, &uid, to_document(&user)?)
                    .await?;
                store.delete(collections::USERS, &user_id).await?;
                tracing::info!(from = %user_id, to = %uid, "User moved to existing identity uid");
                user.id = uid;
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                let new_user = NewIdentityUser {
                    phone_number: phone_number.clone(),
                    display_name: full_name.to_string(),
                    email: Some(email).filter(|e| !e.is_empty()),
                };
                match identity.create_user(&new_user).await {
                    Ok(uid) => tracing::info!(uid = %uid, "Identity user created"),
                    Err(e) => tracing::warn!(error = %e, "Could not create identity user"),
                }
            }
            Err(e) => tracing::warn!(error = %e, "Identity lookup failed, profile kept"),
        }
    }

    Ok(UserCreated {
        user,
        message: "User created successfully".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("9876543210", "+91"), "+919876543210");
        assert_eq!(normalize_phone("+15551234567", "+91"), "+15551234567");
        assert_eq!(normalize_phone("  ", "+91"), "");
    }

    #[test]
    fn test_generate_user_id_shape() {
        let id = generate_user_id();
        let parts: Vec<_> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "user");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryStore::new();
        let user = create_user(
            &store,
            "u1",
            User {
                email: "a@example.com".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.created_at.is_some());

        let found = get_user_by_email(&store, "a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert!(get_user_by_email(&store, "b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_role_change_requires_admin() {
        let store = MemoryStore::new();
        let user = create_user(&store, "u1", User::default()).await.unwrap();

        let updated = update_profile(
            &store,
            &user,
            ProfileUpdate {
                full_name: Some("Asha".into()),
                role: Some("student".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.full_name, "Asha");
        assert_eq!(updated.role, Role::Student);

        let err = update_profile(
            &store,
            &user,
            ProfileUpdate {
                role: Some("admin".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        let err: AppError = err.into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let admin = create_user(
            &store,
            "a1",
            User {
                role: Role::Admin,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let updated = update_profile(
            &store,
            &admin,
            ProfileUpdate {
                role: Some("trainer".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.role, Role::Trainer);
    }

    #[tokio::test]
    async fn test_register_fcm_token_requires_user() {
        let store = MemoryStore::new();
        assert!(register_fcm_token(&store, "ghost", "tok").await.is_err());

        create_user(&store, "u1", User::default()).await.unwrap();
        register_fcm_token(&store, "u1", "tok").await.unwrap();
        let user = get_user(&store, "u1").await.unwrap().unwrap();
        assert_eq!(user.fcm_token.as_deref(), Some("tok"));
    }
}
