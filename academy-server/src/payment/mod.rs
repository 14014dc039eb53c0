//! Payment gateway adapter

pub mod razorpay;

pub use razorpay::RazorpayGateway;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;

/// Order to open at the gateway
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderRequest {
    /// Smallest currency unit (paise)
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct GatewayPayment {
    pub id: String,
    /// created | authorized | captured | refunded | failed
    pub status: String,
    /// Paise
    pub amount: i64,
}

impl GatewayPayment {
    /// Money has been taken or reserved
    pub fn is_successful(&self) -> bool {
        matches!(self.status.as_str(), "captured" | "authorized")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Gateway(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key id handed to the client checkout
    fn key_id(&self) -> &str;

    async fn create_order(&self, order: &OrderRequest) -> Result<GatewayOrder, PaymentError>;

    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment, PaymentError>;

    /// Check the checkout callback signature for an order/payment pair
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

/// Verify a checkout signature: hex HMAC-SHA256 of `"<order_id>|<payment_id>"`
pub fn verify_signature(order_id: &str, payment_id: &str, signature: &str, secret: &str) -> bool {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{order_id}|{payment_id}").as_bytes());

    let Ok(sig_bytes) = hex::decode(signature) else {
        return false;
    };
    mac.verify_slice(&sig_bytes).is_ok()
}

/// Hex signature for an order/payment pair (what the checkout sends back)
pub fn sign(order_id: &str, payment_id: &str, secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_roundtrip() {
        let sig = sign("order_1", "pay_1", "secret");
        assert_eq!(sig.len(), 64);
        assert!(verify_signature("order_1", "pay_1", &sig, "secret"));
    }

    #[test]
    fn test_signature_rejects_tampering() {
        let sig = sign("order_1", "pay_1", "secret");
        assert!(!verify_signature("order_1", "pay_2", &sig, "secret"));
        assert!(!verify_signature("order_1", "pay_1", &sig, "other"));
        assert!(!verify_signature("order_1", "pay_1", "not-hex", "secret"));
        assert!(!verify_signature("order_1", "pay_1", "", "secret"));
    }

    #[test]
    fn test_payment_success_states() {
        let mut p = GatewayPayment {
            id: "pay_1".into(),
            status: "captured".into(),
            amount: 100,
        };
        assert!(p.is_successful());
        p.status = "authorized".into();
        assert!(p.is_successful());
        p.status = "failed".into();
        assert!(!p.is_successful());
    }
}
