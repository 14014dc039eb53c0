//! Identity provider adapter
//!
//! Verifies the bearer tokens clients obtain from phone sign-in, mints
//! custom tokens for the client SDK and mirrors admin-created users into the
//! provider's user pool.

pub mod firebase;

pub use firebase::FirebaseIdentity;

use async_trait::async_trait;

/// Claims taken from a verified ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub uid: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// New account in the provider's user pool
#[derive(Debug, Clone, Default)]
pub struct NewIdentityUser {
    pub phone_number: String,
    pub display_name: String,
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token expired")]
    TokenExpired,
    #[error("signing key error: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl IdentityError {
    /// Errors caused by the presented credential rather than the provider
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::InvalidToken(_) | Self::TokenExpired)
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an ID token and return its subject
    async fn verify_id_token(&self, token: &str) -> Result<VerifiedToken, IdentityError>;

    /// Mint a custom token the client exchanges for an ID token
    async fn create_custom_token(&self, uid: &str) -> Result<String, IdentityError>;

    /// Look up a pool user by E.164 phone number, returning its uid
    async fn find_user_by_phone(&self, phone_number: &str)
    -> Result<Option<String>, IdentityError>;

    /// Create a pool user, returning its uid
    async fn create_user(&self, user: &NewIdentityUser) -> Result<String, IdentityError>;
}
