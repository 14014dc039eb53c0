//! Payment order and verification models

use super::enrollment::Enrollment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_CURRENCY: &str = "INR";

/// `POST /api/payments/create-order` payload
///
/// `amount` is in rupees; the gateway receives paise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    pub notes: Option<HashMap<String, String>>,
}

/// Order handed back to the client checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    /// Paise, as reported by the gateway
    pub amount: i64,
    pub currency: String,
    /// Public key id for the client SDK
    pub key_id: String,
}

/// `POST /api/payments/verify` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyPaymentRequest {
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    /// Enroll the caller into this course once the payment checks out
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub verified: bool,
    pub payment_id: String,
    pub order_id: String,
    /// Rupees
    pub amount: f64,
    pub status: String,
    pub enrollment: Option<Enrollment>,
}

/// Convert rupees to paise, rounding to the nearest paisa
pub fn rupees_to_paise(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn paise_to_rupees(amount: i64) -> f64 {
    amount as f64 / 100.0
}
