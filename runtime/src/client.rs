//! Network collaborator contracts.
//!
//! The library issues no HTTP requests itself: order and payment submission
//! go through the traits below, implemented by the embedding application
//! (and by in-memory doubles in `storefront-checkout-testing`). Failures
//! reject with a response-shaped [`RequestError`].
//!
//! # Dyn Compatibility
//!
//! These traits use explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` to enable trait object usage (`Arc<dyn CheckoutClient>`).
//! Action creators hold their collaborators as trait objects and move
//! clones of them into the action streams they build.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use storefront_checkout_core::checkout::StoredCheckout;
use storefront_checkout_core::error::RequestError;
use storefront_checkout_core::order::{InternalOrderRequestBody, Order, OrderMeta};
use storefront_checkout_core::payment::Payment;

/// A boxed future resolving to a response or a response-shaped error.
pub type ClientFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<Response<T>, RequestError>> + Send + 'a>>;

/// Headers of interest on a storefront response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseHeaders {
    /// Order token issued on submission, required by the payment host.
    pub token: Option<String>,
}

/// A successful response from a network collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    /// HTTP status.
    pub status: u16,
    /// Headers of interest.
    pub headers: ResponseHeaders,
    /// Deserialized body.
    pub body: T,
}

impl<T> Response<T> {
    /// A 200 response with no headers of interest.
    pub const fn ok(body: T) -> Self {
        Self {
            status: 200,
            headers: ResponseHeaders { token: None },
            body,
        }
    }
}

/// Caller-supplied request options. Timeouts are enforced by the collaborator,
/// not by this library.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestOptions {
    /// Time budget for the request, if the collaborator supports one.
    pub timeout: Option<Duration>,
}

/// Body of an order submission or finalization response.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct OrderResponseBody {
    /// The created or finalized order.
    pub data: Order,
    /// Response metadata from the body. The order token travels in the
    /// response headers and is merged in by the action creator.
    pub meta: OrderMeta,
}

/// HTTP collaborator for order operations.
pub trait CheckoutClient: Send + Sync {
    /// Load an order by id.
    fn load_order(&self, order_id: u64, options: &RequestOptions) -> ClientFuture<'_, Order>;

    /// Submit an order in the internal wire format.
    fn submit_order(
        &self,
        body: &InternalOrderRequestBody,
        options: &RequestOptions,
    ) -> ClientFuture<'_, OrderResponseBody>;

    /// Finalize a previously submitted order.
    fn finalize_order(
        &self,
        order_id: u64,
        options: &RequestOptions,
    ) -> ClientFuture<'_, OrderResponseBody>;
}

/// Validates a checkout immediately before order submission. A rejection
/// short-circuits the submission: the network submit must never run.
pub trait CheckoutValidator: Send + Sync {
    /// Validate the checkout, rejecting with the blocking response.
    fn validate(
        &self,
        checkout: &StoredCheckout,
        options: &RequestOptions,
    ) -> Pin<Box<dyn Future<Output = Result<(), RequestError>> + Send + '_>>;
}

/// HTTP collaborator for payment submission.
pub trait PaymentClient: Send + Sync {
    /// Submit a payment against the current order.
    fn submit_payment(&self, payment: &Payment) -> ClientFuture<'_, ()>;
}
