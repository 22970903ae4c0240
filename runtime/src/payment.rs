//! Payment action creator.

use std::sync::Arc;

use async_stream::try_stream;
use storefront_checkout_core::action::Action;
use storefront_checkout_core::error::CheckoutError;
use storefront_checkout_core::payment::{Payment, PaymentAction};

use crate::client::PaymentClient;
use crate::ActionStream;

/// Builds payment submission streams over the payment collaborator.
#[derive(Clone)]
pub struct PaymentActionCreator {
    client: Arc<dyn PaymentClient>,
}

impl PaymentActionCreator {
    /// Create a payment action creator over its collaborator.
    #[must_use]
    pub fn new(client: Arc<dyn PaymentClient>) -> Self {
        Self { client }
    }

    /// Submit a payment against the current order.
    #[must_use]
    pub fn submit_payment(&self, payment: Payment) -> ActionStream {
        let client = Arc::clone(&self.client);

        Box::pin(try_stream! {
            yield Action::Payment(PaymentAction::SubmitPaymentRequested);

            match client.submit_payment(&payment).await {
                Ok(_) => {
                    yield Action::Payment(PaymentAction::SubmitPaymentSucceeded);
                }
                Err(error) => {
                    yield Action::Payment(PaymentAction::SubmitPaymentFailed(error.clone()));
                    Err(CheckoutError::Request(error))?;
                }
            }
        })
    }
}
