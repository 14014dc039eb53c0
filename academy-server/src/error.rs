//! Unified service-layer error type for academy-server
//!
//! `ServiceError` bridges adapter errors (`StoreError`, `IdentityError`,
//! `PaymentError`, `StorageError`) and the API-layer error (`AppError`), so
//! services can use `?` on adapter calls.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::identity::IdentityError;
use crate::payment::PaymentError;
use crate::storage::StorageError;
use crate::store::StoreError;

/// Service-layer error
///
/// - `Store`: document store failures (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<IdentityError> for ServiceError {
    fn from(e: IdentityError) -> Self {
        if e.is_credential_error() {
            tracing::debug!(error = %e, "Rejected identity token");
            return ServiceError::App(AppError::new(ErrorCode::TokenInvalid));
        }
        tracing::error!(error = %e, "Identity provider error");
        ServiceError::App(AppError::with_message(
            ErrorCode::IdentityProviderError,
            e.to_string(),
        ))
    }
}

impl From<PaymentError> for ServiceError {
    fn from(e: PaymentError) -> Self {
        tracing::error!(error = %e, "Payment gateway error");
        ServiceError::App(AppError::with_message(
            ErrorCode::PaymentGatewayError,
            e.to_string(),
        ))
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidPath(msg) => ServiceError::App(AppError::invalid(msg)),
            StorageError::Backend(err) => {
                tracing::error!(error = %err, "Object storage error");
                ServiceError::App(AppError::new(ErrorCode::FileStorageFailed))
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Store(StoreError::NotFound { collection, id }) => {
                tracing::warn!(collection = %collection, id = %id, "Document not found");
                AppError::not_found("Document")
            }
            ServiceError::Store(store_err) => {
                tracing::error!(error = %store_err, "Document store error");
                AppError::internal(store_err.to_string())
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_internal_with_text() {
        let err: AppError = ServiceError::from(StoreError::NotAnObject).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "document is not a JSON object");
    }

    #[test]
    fn test_missing_document_maps_to_not_found() {
        let err: AppError = ServiceError::from(StoreError::NotFound {
            collection: "users".into(),
            id: "u1".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_identity_errors() {
        let err: AppError = ServiceError::from(IdentityError::TokenExpired).into();
        assert_eq!(err.code, ErrorCode::TokenInvalid);

        let err: AppError = ServiceError::from(IdentityError::Provider("PHONE_NUMBER_EXISTS".into())).into();
        assert_eq!(err.code, ErrorCode::IdentityProviderError);
        assert!(err.message.contains("PHONE_NUMBER_EXISTS"));
    }

    #[test]
    fn test_payment_error_keeps_gateway_message() {
        let err: AppError =
            ServiceError::from(PaymentError::Gateway("The id provided does not exist".into())).into();
        assert_eq!(err.code, ErrorCode::PaymentGatewayError);
        assert_eq!(err.message, "The id provided does not exist");
    }

    #[test]
    fn test_storage_errors() {
        let err: AppError = ServiceError::from(StorageError::InvalidPath("..".into())).into();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        let err: AppError = ServiceError::from(StorageError::Backend("down".into())).into();
        assert_eq!(err.code, ErrorCode::FileStorageFailed);
    }
}
