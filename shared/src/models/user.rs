//! User Model

use crate::util::{iso_millis, null_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role
///
/// Unknown or empty stored values read as `Student`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Trainer,
    Admin,
    #[default]
    #[serde(other)]
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Trainer => "trainer",
            Self::Admin => "admin",
        }
    }

    /// Trainers and admins may act on behalf of other users
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Trainer | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse, used where a request must name a valid role
impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "trainer" => Ok(Self::Trainer),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User profile document (`users/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
    #[serde(deserialize_with = "null_default")]
    pub avatar: String,
    #[serde(deserialize_with = "null_default")]
    pub bio: String,
    #[serde(deserialize_with = "null_default")]
    pub phone_number: String,
    /// Free-form date string as entered by the user
    #[serde(deserialize_with = "null_default")]
    pub birthday: String,
    #[serde(deserialize_with = "null_default")]
    pub location: String,
    #[serde(deserialize_with = "null_default")]
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
    #[serde(with = "iso_millis::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "iso_millis::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Admin-side user creation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserCreate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub birthday: Option<String>,
    pub location: Option<String>,
}

/// Created user plus confirmation text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreated {
    pub user: User,
    pub message: String,
}

/// Profile update payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub birthday: Option<String>,
    pub avatar: Option<String>,
    /// Honoured only when the caller is an admin
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_defaults_from_sparse_document() {
        let user: User =
            serde_json::from_str(r#"{"id":"u1","fullName":null,"role":"teacher"}"#).unwrap();
        assert_eq!(user.full_name, "");
        assert_eq!(user.role, Role::Student);
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_role_wire_values() {
        for role in [Role::Student, Role::Trainer, Role::Admin] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            assert_eq!(serde_json::from_str::<Role>(&json).unwrap(), role);
        }
        assert_eq!(serde_json::from_str::<Role>("\"superuser\"").unwrap(), Role::Student);
        assert_eq!(Role::default(), Role::Student);
    }

    #[test]
    fn test_role_parse_is_strict() {
        assert_eq!("trainer".parse::<Role>(), Ok(Role::Trainer));
        assert!("Teacher".parse::<Role>().is_err());
        assert!(Role::Admin.is_staff());
        assert!(!Role::Student.is_staff());
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User {
            id: "u1".into(),
            full_name: "Asha".into(),
            role: Role::Trainer,
            ..Default::default()
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["fullName"], "Asha");
        assert_eq!(value["role"], "trainer");
        assert!(value.get("fcmToken").is_none());
    }
}
