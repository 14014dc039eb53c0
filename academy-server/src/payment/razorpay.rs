//! Razorpay integration via REST API (no SDK dependency)

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{GatewayOrder, GatewayPayment, OrderRequest, PaymentError, PaymentGateway};

const API_BASE: &str = "https://api.razorpay.com/v1";

pub struct RazorpayGateway {
    key_id: String,
    key_secret: String,
    http: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(key_id: &str, key_secret: &str) -> Self {
        Self {
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Decode a response, surfacing `error.description` on failure
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, PaymentError> {
        let status = resp.status();
        let body: serde_json::Value = resp.json().await?;
        if !status.is_success() {
            return Err(PaymentError::Gateway(gateway_error_message(&body)));
        }
        serde_json::from_value(body)
            .map_err(|e| PaymentError::Gateway(format!("unexpected gateway response: {e}")))
    }
}

fn gateway_error_message(body: &serde_json::Value) -> String {
    body["error"]["description"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| format!("Razorpay request failed: {body}"))
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<GatewayOrder, PaymentError> {
        let resp = self
            .http
            .post(format!("{API_BASE}/orders"))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(order)
            .send()
            .await?;
        let created: GatewayOrder = Self::decode(resp).await?;
        tracing::info!(order_id = %created.id, amount = created.amount, "Razorpay order created");
        Ok(created)
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment, PaymentError> {
        let resp = self
            .http
            .get(format!("{API_BASE}/payments/{payment_id}"))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;
        Self::decode(resp).await
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        super::verify_signature(order_id, payment_id, signature, &self.key_secret)
    }
}
