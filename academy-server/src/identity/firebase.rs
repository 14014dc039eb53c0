//! Firebase Authentication via REST (no SDK dependency)
//!
//! - ID tokens: RS256, verified against Google's published JWKS
//! - Custom tokens: RS256, signed with the service-account key
//! - User management: Identity Toolkit API with an OAuth2 access token
//!   obtained through the JWT-bearer grant

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{IdentityError, IdentityProvider, NewIdentityUser, VerifiedToken};

const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const CUSTOM_TOKEN_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";
const OAUTH_SCOPE: &str =
    "https://www.googleapis.com/auth/identitytoolkit https://www.googleapis.com/auth/cloud-platform";

/// Google rotates signing keys daily; an unknown `kid` forces a refetch anyway
const JWKS_TTL: Duration = Duration::from_secs(3600);
const CUSTOM_TOKEN_LIFETIME_SECS: i64 = 3600;
/// Refresh access tokens this long before they expire
const ACCESS_TOKEN_MARGIN: Duration = Duration::from_secs(60);

/// Claims of a Firebase ID token
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct CustomTokenClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    uid: &'a str,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

struct CachedAccessToken {
    token: String,
    expires_at: Instant,
}

pub struct FirebaseIdentity {
    project_id: String,
    client_email: String,
    /// PEM, parsed on use so development placeholders don't block startup
    private_key: String,
    http: reqwest::Client,
    jwks: RwLock<Option<CachedKeys>>,
    access_token: RwLock<Option<CachedAccessToken>>,
}

impl FirebaseIdentity {
    pub fn new(project_id: &str, client_email: &str, private_key: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            client_email: client_email.to_string(),
            private_key: private_key.to_string(),
            http: reqwest::Client::new(),
            jwks: RwLock::new(None),
            access_token: RwLock::new(None),
        }
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    fn encoding_key(&self) -> Result<EncodingKey, IdentityError> {
        Ok(EncodingKey::from_rsa_pem(self.private_key.as_bytes())?)
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, IdentityError> {
        let keys: JwkSet = self
            .http
            .get(JWKS_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::debug!(count = keys.keys.len(), "Fetched identity signing keys");
        Ok(keys)
    }

    /// Decoding key for `kid`, refetching the key set when stale or unknown
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        {
            let cached = self.jwks.read().await;
            if let Some(cached) = cached.as_ref()
                && cached.fetched_at.elapsed() < JWKS_TTL
                && let Some(jwk) = cached.keys.find(kid)
            {
                return Ok(DecodingKey::from_jwk(jwk)?);
            }
        }

        let keys = self.fetch_jwks().await?;
        let key = keys
            .find(kid)
            .map(DecodingKey::from_jwk)
            .transpose()?
            .ok_or_else(|| IdentityError::InvalidToken(format!("unknown key id {kid}")))?;

        *self.jwks.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });
        Ok(key)
    }

    /// OAuth2 access token for the Identity Toolkit API
    async fn access_token(&self) -> Result<String, IdentityError> {
        {
            let cached = self.access_token.read().await;
            if let Some(cached) = cached.as_ref()
                && cached.expires_at > Instant::now() + ACCESS_TOKEN_MARGIN
            {
                return Ok(cached.token.clone());
            }
        }

        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: OAUTH_SCOPE,
            aud: OAUTH_TOKEN_URL,
            iat: now,
            exp: now + 3600,
        };
        let assertion =
            jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key()?)?;

        let resp = self
            .http
            .post(OAUTH_TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IdentityError::Provider(format!(
                "access token request failed: {body}"
            )));
        }
        let token: AccessTokenResponse = resp.json().await?;

        let value = token.access_token.clone();
        *self.access_token.write().await = Some(CachedAccessToken {
            token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(value)
    }

    /// Authenticated Identity Toolkit call for this project
    async fn toolkit_call(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, IdentityError> {
        let token = self.access_token().await?;
        let url = format!(
            "{IDENTITY_TOOLKIT_URL}/projects/{}/{endpoint}",
            self.project_id
        );
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let value: serde_json::Value = resp.json().await?;
        if !status.is_success() {
            let message = value["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(IdentityError::Provider(message));
        }
        Ok(value)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn verify_id_token(&self, token: &str) -> Result<VerifiedToken, IdentityError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(IdentityError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidToken("missing key id".into()))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[self.issuer()]);
        validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);

        let data = jsonwebtoken::decode::<IdTokenClaims>(token, &key, &validation).map_err(|e| {
            tracing::debug!("ID token validation failed: {e}");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => IdentityError::TokenExpired,
                _ => IdentityError::InvalidToken(e.to_string()),
            }
        })?;

        if data.claims.sub.is_empty() {
            return Err(IdentityError::InvalidToken("empty subject".into()));
        }

        Ok(VerifiedToken {
            uid: data.claims.sub,
            phone_number: data.claims.phone_number,
            email: data.claims.email,
        })
    }

    async fn create_custom_token(&self, uid: &str) -> Result<String, IdentityError> {
        let now = chrono::Utc::now().timestamp();
        let claims = CustomTokenClaims {
            iss: &self.client_email,
            sub: &self.client_email,
            aud: CUSTOM_TOKEN_AUDIENCE,
            iat: now,
            exp: now + CUSTOM_TOKEN_LIFETIME_SECS,
            uid,
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.encoding_key()?,
        )?)
    }

    async fn find_user_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<String>, IdentityError> {
        let resp = self
            .toolkit_call(
                "accounts:lookup",
                &serde_json::json!({ "phoneNumber": [phone_number] }),
            )
            .await?;
        Ok(resp["users"]
            .as_array()
            .and_then(|users| users.first())
            .and_then(|user| user["localId"].as_str())
            .map(String::from))
    }

    async fn create_user(&self, user: &NewIdentityUser) -> Result<String, IdentityError> {
        let mut body = serde_json::json!({
            "phoneNumber": user.phone_number,
            "displayName": user.display_name,
        });
        if let Some(email) = user.email.as_deref().filter(|e| !e.is_empty()) {
            body["email"] = serde_json::Value::String(email.to_string());
        }

        let resp = self.toolkit_call("accounts", &body).await?;
        resp["localId"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| IdentityError::Provider(format!("create user failed: {resp}")))
    }
}
