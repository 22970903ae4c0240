//! Error taxonomy for checkout orchestration.
//!
//! Errors separate into two propagation classes:
//!
//! - **Synchronous precondition violations** ([`CheckoutError::InvalidArgument`],
//!   [`CheckoutError::NotInitialized`], [`CheckoutError::MissingData`]) fail
//!   before any request begins and before any `*Requested` action is emitted.
//! - **Asynchronous operation failures** surface as the error branch of an
//!   action stream, after the corresponding `*Failed` action has been reduced
//!   into state. The `errors` field of each slice always reflects the most
//!   recent failure for its operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies which lifecycle step was skipped when an operation was
/// attempted out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotInitializedErrorType {
    /// A payment operation was attempted before the payment strategy was
    /// initialized.
    PaymentNotInitialized,
}

impl std::fmt::Display for NotInitializedErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PaymentNotInitialized => write!(f, "payment not initialized"),
        }
    }
}

/// Identifies the derived identifier or state that could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingDataErrorType {
    /// Neither the order slice nor the checkout slice carries an order id.
    OrderId,
    /// No checkout has been loaded into state.
    Checkout,
    /// The requested payment method is not configured for the storefront.
    PaymentMethod,
}

impl std::fmt::Display for MissingDataErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderId => write!(f, "order id"),
            Self::Checkout => write!(f, "checkout"),
            Self::PaymentMethod => write!(f, "payment method"),
        }
    }
}

/// A response-shaped failure propagated from the network collaborator.
///
/// Carried inside `*Failed` actions so reducers can store the original
/// response in the slice's `errors` field.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("request failed with status {status}: {title}")]
pub struct RequestError {
    /// HTTP status of the failed response.
    pub status: u16,
    /// Short human-readable summary from the response.
    pub title: String,
    /// Raw response body, when one was returned.
    pub body: Option<serde_json::Value>,
}

impl RequestError {
    /// Create a request error without a body.
    #[must_use]
    pub const fn new(status: u16, title: String) -> Self {
        Self {
            status,
            title,
            body: None,
        }
    }
}

/// Errors produced by checkout operations and payment strategies.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// The caller supplied malformed input. Fatal to the call, never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was attempted before the required lifecycle step.
    /// The caller must initialize first.
    #[error("not initialized: {0}")]
    NotInitialized(NotInitializedErrorType),

    /// A required derived identifier or state slice is absent. The operation
    /// fails before any network call is issued.
    #[error("unable to proceed because required data is missing: {0}")]
    MissingData(MissingDataErrorType),

    /// A pending token request was superseded by a newer one and rejected.
    #[error("the pending request was superseded before it completed")]
    Timeout,

    /// An internal sequencing invariant was violated. Indicates a bug in the
    /// orchestration layer, not a user-facing condition.
    #[error("internal error: {0}")]
    Standard(String),

    /// The environment does not satisfy the payment widget's requirements.
    #[error("the current browser does not support the payment widget")]
    UnsupportedBrowser,

    /// A network operation failed with a response-shaped error.
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_converts_into_checkout_error() {
        let error = RequestError::new(400, "Bad Request".to_string());
        let checkout_error = CheckoutError::from(error.clone());
        assert_eq!(checkout_error, CheckoutError::Request(error));
    }

    #[test]
    fn missing_data_display_names_the_subject() {
        let error = CheckoutError::MissingData(MissingDataErrorType::OrderId);
        assert!(error.to_string().contains("order id"));
    }
}
