//! Order action creators.
//!
//! Each creator returns a cold [`ActionStream`]: nothing runs until the
//! store drains it. Lifecycle actions are yielded as the operation
//! progresses, so the store reduces `*Requested` before the network call
//! and `*Succeeded` or `*Failed` after it. A failed operation yields its
//! `*Failed` action and then terminates the stream with the error, which
//! also cancels any phases queued behind it.
//!
//! State dependencies are read lazily through a [`StateAccessor`] at the
//! point in the stream where they are needed. The compound streams below
//! rely on this: the reload phase of [`OrderActionCreator::submit_order`]
//! resolves the order id only after the submission's success action has
//! been reduced.

use std::sync::Arc;

use async_stream::try_stream;
use futures::StreamExt;
use storefront_checkout_core::action::Action;
use storefront_checkout_core::error::{CheckoutError, MissingDataErrorType};
use storefront_checkout_core::order::{
    InternalOrderPayment, InternalOrderRequestBody, OrderAction, OrderMeta, OrderRequestBody,
};

use crate::client::{CheckoutClient, CheckoutValidator, RequestOptions};
use crate::store::StateAccessor;
use crate::ActionStream;

/// Builds order operation streams over the network collaborators.
#[derive(Clone)]
pub struct OrderActionCreator {
    client: Arc<dyn CheckoutClient>,
    validator: Arc<dyn CheckoutValidator>,
}

impl OrderActionCreator {
    /// Create an order action creator over its collaborators.
    #[must_use]
    pub fn new(client: Arc<dyn CheckoutClient>, validator: Arc<dyn CheckoutValidator>) -> Self {
        Self { client, validator }
    }

    /// Load an order by id.
    #[must_use]
    pub fn load_order(&self, order_id: u64, options: RequestOptions) -> ActionStream {
        let client = Arc::clone(&self.client);

        Box::pin(try_stream! {
            yield Action::Order(OrderAction::LoadOrderRequested);

            match client.load_order(order_id, &options).await {
                Ok(response) => {
                    yield Action::Order(OrderAction::LoadOrderSucceeded(response.body));
                }
                Err(error) => {
                    yield Action::Order(OrderAction::LoadOrderFailed(error.clone()));
                    Err(CheckoutError::Request(error))?;
                }
            }
        })
    }

    /// Load the order identified by the current state.
    ///
    /// The order id is resolved through `state` when the stream runs, with
    /// the order slice taking precedence over the checkout slice. When
    /// neither carries one the stream fails with
    /// [`CheckoutError::MissingData`] before emitting any action or issuing
    /// any request.
    #[must_use]
    pub fn load_current_order(&self, state: StateAccessor, options: RequestOptions) -> ActionStream {
        let creator = self.clone();

        Box::pin(try_stream! {
            let order_id = current_order_id(&state).await?;

            let mut inner = creator.load_order(order_id, options);
            while let Some(item) = inner.next().await {
                yield item?;
            }
        })
    }

    /// Refresh the payments recorded against the current order.
    ///
    /// Same id resolution as [`Self::load_current_order`], but the stream
    /// emits the payments-load lifecycle so callers can track it separately
    /// from a plain order load.
    #[must_use]
    pub fn load_current_order_payments(
        &self,
        state: StateAccessor,
        options: RequestOptions,
    ) -> ActionStream {
        let client = Arc::clone(&self.client);

        Box::pin(try_stream! {
            let order_id = current_order_id(&state).await?;

            yield Action::Order(OrderAction::LoadOrderPaymentsRequested);

            match client.load_order(order_id, &options).await {
                Ok(response) => {
                    yield Action::Order(OrderAction::LoadOrderPaymentsSucceeded(response.body));
                }
                Err(error) => {
                    yield Action::Order(OrderAction::LoadOrderPaymentsFailed(error.clone()));
                    Err(CheckoutError::Request(error))?;
                }
            }
        })
    }

    /// Submit an order from the current checkout.
    ///
    /// The stream validates the checkout, submits the mapped internal body,
    /// and then reloads the created order so state reflects the server's
    /// snapshot. The order token arrives in the submission response headers
    /// and is merged into the body metadata before the success action is
    /// emitted.
    ///
    /// Failure modes, in order of occurrence:
    ///
    /// - no checkout in state: [`CheckoutError::MissingData`] before any
    ///   action is emitted;
    /// - validator rejection: `SubmitOrderFailed` is emitted and the network
    ///   submission never runs;
    /// - submission failure: `SubmitOrderFailed` is emitted and the reload
    ///   phase never runs.
    #[must_use]
    pub fn submit_order(
        &self,
        payload: OrderRequestBody,
        state: StateAccessor,
        options: RequestOptions,
    ) -> ActionStream {
        let creator = self.clone();

        Box::pin(try_stream! {
            let checkout = state
                .read(|s| s.checkout().cloned())
                .await
                .ok_or(CheckoutError::MissingData(MissingDataErrorType::Checkout))?;

            yield Action::Order(OrderAction::SubmitOrderRequested);

            if let Err(error) = creator.validator.validate(&checkout, &options).await {
                yield Action::Order(OrderAction::SubmitOrderFailed(error.clone()));
                Err(CheckoutError::Request(error))?;
            }

            let body = map_to_order_request_body(payload, &checkout.customer_message);

            match creator.client.submit_order(&body, &options).await {
                Ok(response) => {
                    let meta = OrderMeta {
                        token: response.headers.token,
                        ..response.body.meta
                    };
                    yield Action::Order(OrderAction::SubmitOrderSucceeded {
                        data: response.body.data,
                        meta,
                    });
                }
                Err(error) => {
                    yield Action::Order(OrderAction::SubmitOrderFailed(error.clone()));
                    Err(CheckoutError::Request(error))?;
                }
            }

            // The reload resolves the id produced by the submission just
            // reduced, not whatever id the state held when the stream was
            // built.
            let mut reload = creator.load_current_order(state, options);
            while let Some(item) = reload.next().await {
                yield item?;
            }
        })
    }

    /// Finalize a previously submitted order, then reload it.
    #[must_use]
    pub fn finalize_order(&self, order_id: u64, options: RequestOptions) -> ActionStream {
        let creator = self.clone();

        Box::pin(try_stream! {
            yield Action::Order(OrderAction::FinalizeOrderRequested);

            match creator.client.finalize_order(order_id, &options).await {
                Ok(response) => {
                    yield Action::Order(OrderAction::FinalizeOrderSucceeded(response.body.data));
                }
                Err(error) => {
                    yield Action::Order(OrderAction::FinalizeOrderFailed(error.clone()));
                    Err(CheckoutError::Request(error))?;
                }
            }

            let mut reload = creator.load_order(order_id, options);
            while let Some(item) = reload.next().await {
                yield item?;
            }
        })
    }
}

async fn current_order_id(state: &StateAccessor) -> Result<u64, CheckoutError> {
    state
        .read(storefront_checkout_core::state::CheckoutStoreState::order_id)
        .await
        .ok_or(CheckoutError::MissingData(MissingDataErrorType::OrderId))
}

/// Map an externally supplied order request into the internal wire format.
///
/// A body without a payment section passes through untouched and never picks
/// up the customer message. A body with one has its payment fields renamed
/// (`method_id` to `name`, `gateway_id` to `gateway`) and the checkout's
/// customer message attached; the payment data travels unchanged.
#[must_use]
pub fn map_to_order_request_body(
    payload: OrderRequestBody,
    customer_message: &str,
) -> InternalOrderRequestBody {
    let (payment, body) = payload.split_payment();

    match payment {
        None => InternalOrderRequestBody {
            use_store_credit: body.use_store_credit,
            customer_message: None,
            payment: None,
        },
        Some(payment) => InternalOrderRequestBody {
            use_store_credit: body.use_store_credit,
            customer_message: Some(customer_message.to_string()),
            payment: Some(InternalOrderPayment {
                name: payment.method_id,
                gateway: payment.gateway_id,
                payment_data: payment.payment_data,
            }),
        },
    }
}
