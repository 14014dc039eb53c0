//! Sign-in payloads and responses

use super::user::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendOtpRequest {
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyOtpRequest {
    pub phone_number: Option<String>,
    pub otp: Option<String>,
    pub verification_id: Option<String>,
}

/// Optional body of `POST /api/auth/phone/verify-id-token`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyIdTokenRequest {
    pub role: Option<String>,
}

/// Result of a phone sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Custom token minted for the user
    pub token: String,
    /// The ID token the client presented
    pub id_token: String,
    pub is_new_user: bool,
    pub user: User,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterTokenRequest {
    pub fcm_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessFlag {
    pub success: bool,
}
