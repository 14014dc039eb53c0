//! Test harness: in-memory store plus fake identity, payment and storage
//! adapters wired into a real router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use academy_server::identity::{IdentityError, IdentityProvider, NewIdentityUser, VerifiedToken};
use academy_server::payment::{
    GatewayOrder, GatewayPayment, OrderRequest, PaymentError, PaymentGateway, verify_signature,
};
use academy_server::storage::{ObjectStorage, StorageError};
use academy_server::store::{Document, DocumentStore, MemoryStore};
use academy_server::{AppState, api};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use shared::models::{Role, User};
use tower::ServiceExt;

pub const PAYMENT_SECRET: &str = "test_key_secret";

/// Identity provider backed by a token table
#[derive(Default)]
pub struct FakeIdentity {
    tokens: Mutex<HashMap<String, VerifiedToken>>,
    pool: Mutex<HashMap<String, String>>,
    pub created: Mutex<Vec<NewIdentityUser>>,
}

impl FakeIdentity {
    pub fn issue(&self, token: &str, uid: &str, phone: Option<&str>) {
        self.tokens.lock().unwrap().insert(
            token.to_string(),
            VerifiedToken {
                uid: uid.to_string(),
                phone_number: phone.map(String::from),
                email: None,
            },
        );
    }

    /// Pretend the pool already holds `phone` under `uid`
    pub fn register_phone(&self, phone: &str, uid: &str) {
        self.pool
            .lock()
            .unwrap()
            .insert(phone.to_string(), uid.to_string());
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verify_id_token(&self, token: &str) -> Result<VerifiedToken, IdentityError> {
        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::InvalidToken("unknown token".into()))
    }

    async fn create_custom_token(&self, uid: &str) -> Result<String, IdentityError> {
        Ok(format!("custom_{uid}"))
    }

    async fn find_user_by_phone(&self, phone_number: &str) -> Result<Option<String>, IdentityError> {
        Ok(self.pool.lock().unwrap().get(phone_number).cloned())
    }

    async fn create_user(&self, user: &NewIdentityUser) -> Result<String, IdentityError> {
        let mut created = self.created.lock().unwrap();
        created.push(user.clone());
        Ok(format!("idp_{}", created.len()))
    }
}

/// Gateway that signs with [`PAYMENT_SECRET`] and reports a fixed status
pub struct FakeGateway {
    pub payment_status: Mutex<String>,
    pub orders: Mutex<Vec<OrderRequest>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            payment_status: Mutex::new("captured".into()),
            orders: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn key_id(&self) -> &str {
        "rzp_test_key"
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<GatewayOrder, PaymentError> {
        let mut orders = self.orders.lock().unwrap();
        orders.push(order.clone());
        Ok(GatewayOrder {
            id: format!("order_{}", orders.len()),
            amount: order.amount,
            currency: order.currency.clone(),
        })
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment, PaymentError> {
        Ok(GatewayPayment {
            id: payment_id.to_string(),
            status: self.payment_status.lock().unwrap().clone(),
            amount: 49_900,
        })
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_signature(order_id, payment_id, signature, PAYMENT_SECRET)
    }
}

/// Object storage keeping uploads in memory
#[derive(Default)]
pub struct FakeStorage {
    pub objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (data, content_type.to_string()));
        Ok(format!("https://storage.test/academy/{path}"))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().remove(path);
        Ok(())
    }

    async fn download_url(&self, path: &str, expires_in: Duration) -> Result<String, StorageError> {
        Ok(format!("https://storage.test/academy/{path}?expires={}", expires_in.as_secs()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<FakeIdentity>,
    pub gateway: Arc<FakeGateway>,
    pub storage: Arc<FakeStorage>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(FakeIdentity::default());
        let gateway = Arc::new(FakeGateway::default());
        let storage = Arc::new(FakeStorage::default());
        let state = AppState::from_parts(
            store.clone(),
            identity.clone(),
            gateway.clone(),
            storage.clone(),
        );
        Self {
            router: api::create_router(state),
            store,
            identity,
            gateway,
            storage,
        }
    }

    /// Store a user document and a bearer token that resolves to it
    pub async fn sign_in(&self, uid: &str, role: Role) -> String {
        let user = User {
            id: uid.to_string(),
            full_name: format!("{uid} name"),
            email: format!("{uid}@example.com"),
            role,
            ..Default::default()
        };
        academy_server::services::users::create_user(self.store.as_ref(), uid, user)
            .await
            .unwrap();
        let token = format!("token_{uid}");
        self.identity.issue(&token, uid, None);
        token
    }

    pub async fn seed(&self, collection: &str, id: &str, data: Value) {
        let doc: Document = match data {
            Value::Object(map) => map,
            _ => panic!("seed data must be an object"),
        };
        self.store.set(collection, id, doc).await.unwrap();
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, token, Some(body))).await
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
