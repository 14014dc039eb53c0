//! Checkout orders and payment verification

use chrono::Utc;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CreateOrderRequest, DEFAULT_CURRENCY, OrderResponse, PaymentVerification, User,
    VerifyPaymentRequest, paise_to_rupees, rupees_to_paise,
};

use super::enrollments;
use crate::error::ServiceResult;
use crate::payment::{OrderRequest, PaymentGateway};
use crate::store::DocumentStore;

/// Open a gateway order for the caller
///
/// `amount` is in rupees. The caller's id and email are added to the
/// order notes.
pub async fn create_order(
    gateway: &dyn PaymentGateway,
    user: &User,
    req: CreateOrderRequest,
) -> ServiceResult<OrderResponse> {
    let amount = req
        .amount
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| AppError::new(ErrorCode::InvalidAmount))?;

    let mut notes = req.notes.unwrap_or_default();
    notes.insert("userId".into(), user.id.clone());
    notes.insert("userEmail".into(), user.email.clone());

    let order = OrderRequest {
        amount: rupees_to_paise(amount),
        currency: req
            .currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        receipt: req
            .receipt
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| format!("receipt_{}", Utc::now().timestamp_millis())),
        notes,
    };
    let created = gateway.create_order(&order).await?;

    tracing::info!(
        order_id = %created.id,
        user_id = %user.id,
        amount = created.amount,
        currency = %created.currency,
        "Payment order created"
    );
    Ok(OrderResponse {
        order_id: created.id,
        amount: created.amount,
        currency: created.currency,
        key_id: gateway.key_id().to_string(),
    })
}

/// Check a checkout callback and, when a course is named, enroll the caller
///
/// Enrollment failures (including an existing enrollment) do not fail the
/// verification; the result then carries no enrollment.
pub async fn verify_payment(
    store: &dyn DocumentStore,
    gateway: &dyn PaymentGateway,
    user: &User,
    req: VerifyPaymentRequest,
) -> ServiceResult<PaymentVerification> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(order_id), Some(payment_id), Some(signature)) = (
        non_empty(req.order_id),
        non_empty(req.payment_id),
        non_empty(req.signature),
    ) else {
        return Err(
            AppError::validation("Order ID, payment ID, and signature are required").into(),
        );
    };

    if !gateway.verify_signature(&order_id, &payment_id, &signature) {
        tracing::warn!(order_id = %order_id, user_id = %user.id, "Payment signature mismatch");
        return Err(AppError::new(ErrorCode::InvalidPaymentSignature).into());
    }

    let payment = gateway.fetch_payment(&payment_id).await?;
    if !payment.is_successful() {
        tracing::warn!(payment_id = %payment_id, status = %payment.status, "Payment not successful");
        return Err(AppError::new(ErrorCode::PaymentNotSuccessful).into());
    }

    let mut enrollment = None;
    if let Some(course_id) = non_empty(req.course_id) {
        match enrollments::create_enrollment(store, &user.id, &course_id, Some(&payment_id)).await {
            Ok(created) => enrollment = Some(created),
            Err(e) => {
                let e: AppError = e.into();
                tracing::warn!(
                    user_id = %user.id,
                    course_id = %course_id,
                    error = %e.message,
                    "Enrollment after payment skipped"
                );
            }
        }
    }

    tracing::info!(payment_id = %payment_id, order_id = %order_id, user_id = %user.id, "Payment verified");
    Ok(PaymentVerification {
        verified: true,
        payment_id,
        order_id,
        amount: paise_to_rupees(payment.amount),
        status: payment.status,
        enrollment,
    })
}
