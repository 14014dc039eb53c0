//! Application state for academy-server

use std::sync::Arc;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;
use crate::identity::{FirebaseIdentity, IdentityProvider};
use crate::payment::{PaymentGateway, RazorpayGateway};
use crate::storage::{ObjectStorage, S3Storage};
use crate::store::{DocumentStore, MemoryStore, PgDocumentStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store holding every collection
    pub store: Arc<dyn DocumentStore>,
    /// Token verification and identity-pool management
    pub identity: Arc<dyn IdentityProvider>,
    /// Order creation and payment lookup
    pub payments: Arc<dyn PaymentGateway>,
    /// Uploaded files
    pub storage: Arc<dyn ObjectStorage>,
    /// Rate limiter for the unauthenticated auth routes
    pub rate_limiter: RateLimiter,
    /// Prefix for phone numbers entered without a country code
    pub default_country_code: String,
}

impl AppState {
    /// Create a new AppState with production adapters
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn DocumentStore> = match &config.database_url {
            Some(url) => {
                let store = PgDocumentStore::connect(url).await?;
                tracing::info!("Document store ready (PostgreSQL)");
                Arc::new(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory document store");
                Arc::new(MemoryStore::new())
            }
        };

        let identity = FirebaseIdentity::new(
            &config.firebase_project_id,
            &config.firebase_client_email,
            &config.firebase_private_key,
        );
        let payments = RazorpayGateway::new(&config.razorpay_key_id, &config.razorpay_key_secret);
        let storage = S3Storage::connect(
            &config.storage_endpoint,
            &config.storage_bucket,
            &config.storage_public_base_url,
        )
        .await;

        let mut state = Self::from_parts(
            store,
            Arc::new(identity),
            Arc::new(payments),
            Arc::new(storage),
        );
        state.default_country_code = config.default_country_code.clone();
        Ok(state)
    }

    /// Assemble state from already-built adapters
    pub fn from_parts(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        payments: Arc<dyn PaymentGateway>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            store,
            identity,
            payments,
            storage,
            rate_limiter: RateLimiter::new(),
            default_country_code: "+91".to_string(),
        }
    }
}
