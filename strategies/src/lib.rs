//! # Storefront Checkout Strategies
//!
//! Payment provider strategies for the storefront checkout library.
//!
//! A strategy owns the provider-specific choreography between the hosted
//! payment widget and the checkout store: collecting a nonce or risk token
//! asynchronously, then committing the result through the order and payment
//! action creators. Widget access goes through the collaborator traits in
//! [`widget`]; strategy instance state (pending tokenizations, widget
//! handles) is transient and never part of the reduced state tree.
//!
//! ## Lifecycle
//!
//! `initialize → execute (repeatable) → deinitialize`. Executing before
//! initializing fails with [`CheckoutError::NotInitialized`]. A second
//! `execute` while a tokenization is pending preempts the first, which
//! fails with [`CheckoutError::Timeout`].

use std::future::Future;
use std::pin::Pin;

use storefront_checkout_core::error::CheckoutError;
use storefront_checkout_core::order::OrderRequestBody;
use storefront_checkout_core::state::CheckoutStoreState;
use storefront_checkout_runtime::RequestOptions;

/// Single-slot deferred settlement bridge.
pub mod deferred;

/// Square payment strategy.
pub mod square;

/// WePay payment strategy.
pub mod wepay;

/// Widget collaborator contracts.
pub mod widget;

/// A boxed future resolving to a strategy result.
pub type StrategyFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, CheckoutError>> + Send + 'a>>;

/// Options for initializing a payment strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInitializeOptions {
    /// Payment method to initialize for.
    pub method_id: String,
}

/// Options for an execute, finalize, or deinitialize call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentRequestOptions {
    /// Options forwarded to network requests issued by the operation.
    pub request: RequestOptions,
}

/// The lifecycle contract every payment strategy implements.
///
/// # Dyn Compatibility
///
/// Boxed-future returns instead of `async fn`, so strategies can be held
/// and swapped as `Box<dyn PaymentStrategy>` per payment method.
pub trait PaymentStrategy: Send + Sync {
    /// Prepare the provider widget. Must complete before [`Self::execute`].
    fn initialize(&self, options: PaymentInitializeOptions) -> StrategyFuture<'_, ()>;

    /// Collect the provider credential and submit order and payment.
    /// Resolves with the post-submission state tree.
    fn execute(
        &self,
        payload: OrderRequestBody,
        options: PaymentRequestOptions,
    ) -> StrategyFuture<'_, CheckoutStoreState>;

    /// Finalize a previously submitted order, for providers that require a
    /// second pass.
    fn finalize(&self, options: PaymentRequestOptions) -> StrategyFuture<'_, CheckoutStoreState>;

    /// Tear down the provider widget and drop any pending tokenization.
    fn deinitialize(&self, options: PaymentRequestOptions) -> StrategyFuture<'_, ()>;
}

pub use deferred::{DeferredSlot, Pending};
pub use square::SquarePaymentStrategy;
pub use wepay::WepayPaymentStrategy;
