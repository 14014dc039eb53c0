//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP listen port
    pub http_port: u16,
    /// PostgreSQL connection URL (in-memory store when unset in development)
    pub database_url: Option<String>,
    /// Firebase project hosting the identity pool
    pub firebase_project_id: String,
    /// Service-account email used to sign custom tokens
    pub firebase_client_email: String,
    /// Service-account private key (PEM)
    pub firebase_private_key: String,
    /// Object storage bucket
    pub storage_bucket: String,
    /// S3-compatible endpoint of the bucket
    pub storage_endpoint: String,
    /// Base URL for public object links
    pub storage_public_base_url: String,
    /// Razorpay key id (public, handed to the client checkout)
    pub razorpay_key_id: String,
    /// Razorpay key secret (API auth + signature verification)
    pub razorpay_key_secret: String,
    /// Prefix added to phone numbers entered without a country code
    pub default_country_code: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        let firebase_project_id = Self::require_secret("FIREBASE_PROJECT_ID", &environment)?;
        // Keys pasted into env files carry literal `\n` sequences
        let firebase_private_key =
            Self::require_secret("FIREBASE_PRIVATE_KEY", &environment)?.replace("\\n", "\n");

        let storage_endpoint = std::env::var("STORAGE_ENDPOINT")
            .unwrap_or_else(|_| "https://storage.googleapis.com".into());

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url,
            firebase_client_email: Self::require_secret("FIREBASE_CLIENT_EMAIL", &environment)?,
            firebase_private_key,
            storage_bucket: std::env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| format!("{firebase_project_id}.appspot.com")),
            storage_public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| storage_endpoint.clone()),
            storage_endpoint,
            firebase_project_id,
            razorpay_key_id: Self::require_secret("RAZORPAY_KEY_ID", &environment)?,
            razorpay_key_secret: Self::require_secret("RAZORPAY_KEY_SECRET", &environment)?,
            default_country_code: std::env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| "+91".into()),
            environment,
        })
    }
}
