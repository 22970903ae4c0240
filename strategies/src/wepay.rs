//! WePay payment strategy.
//!
//! WePay requires a client-side risk token alongside the payment. The
//! strategy initializes the risk fingerprinting client up front, then at
//! execute time fetches the token and attaches it to the payment's extra
//! data before submitting order and payment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use storefront_checkout_core::error::{CheckoutError, NotInitializedErrorType};
use storefront_checkout_core::order::OrderRequestBody;
use storefront_checkout_core::payment::Payment;
use storefront_checkout_core::state::CheckoutStoreState;
use storefront_checkout_runtime::{CheckoutStore, OrderActionCreator, PaymentActionCreator};

use crate::widget::WepayRiskClient;
use crate::{PaymentInitializeOptions, PaymentRequestOptions, PaymentStrategy, StrategyFuture};

/// Payment strategy for WePay risk-token payments.
pub struct WepayPaymentStrategy {
    store: CheckoutStore,
    orders: OrderActionCreator,
    payments: PaymentActionCreator,
    risk_client: Arc<dyn WepayRiskClient>,
    initialized: AtomicBool,
}

impl WepayPaymentStrategy {
    /// Create a strategy over its store and collaborators.
    #[must_use]
    pub fn new(
        store: CheckoutStore,
        orders: OrderActionCreator,
        payments: PaymentActionCreator,
        risk_client: Arc<dyn WepayRiskClient>,
    ) -> Self {
        Self {
            store,
            orders,
            payments,
            risk_client,
            initialized: AtomicBool::new(false),
        }
    }

    #[tracing::instrument(skip_all)]
    async fn initialize_inner(&self) -> Result<(), CheckoutError> {
        self.risk_client.initialize().await?;
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    #[tracing::instrument(skip(self, payload, options))]
    async fn execute_inner(
        &self,
        payload: OrderRequestBody,
        options: PaymentRequestOptions,
    ) -> Result<CheckoutStoreState, CheckoutError> {
        if !self.initialized.load(Ordering::Acquire) {
            return Err(CheckoutError::NotInitialized(
                NotInitializedErrorType::PaymentNotInitialized,
            ));
        }

        let (payment, order_payload) = payload.split_payment();
        let payment = payment.ok_or_else(|| {
            CheckoutError::InvalidArgument(
                "payment method id is required to submit a payment".to_string(),
            )
        })?;

        let risk_token = self.risk_client.risk_token().await?;

        self.store
            .dispatch(self.orders.submit_order(
                order_payload,
                self.store.accessor(),
                options.request.clone(),
            ))
            .await?;

        let mut payment_data = payment.payment_data.unwrap_or_default();
        let mut extra_data = payment_data.extra_data.unwrap_or_default();
        extra_data.risk_token = Some(risk_token);
        payment_data.extra_data = Some(extra_data);

        self.store
            .dispatch(self.payments.submit_payment(Payment {
                method_id: payment.method_id,
                payment_data: Some(payment_data),
            }))
            .await
    }
}

impl PaymentStrategy for WepayPaymentStrategy {
    fn initialize(&self, _options: PaymentInitializeOptions) -> StrategyFuture<'_, ()> {
        Box::pin(self.initialize_inner())
    }

    fn execute(
        &self,
        payload: OrderRequestBody,
        options: PaymentRequestOptions,
    ) -> StrategyFuture<'_, CheckoutStoreState> {
        Box::pin(self.execute_inner(payload, options))
    }

    fn finalize(&self, _options: PaymentRequestOptions) -> StrategyFuture<'_, CheckoutStoreState> {
        Box::pin(async {
            Err(CheckoutError::Standard(
                "order finalization is not required for this payment method".to_string(),
            ))
        })
    }

    fn deinitialize(&self, _options: PaymentRequestOptions) -> StrategyFuture<'_, ()> {
        Box::pin(async {
            self.initialized.store(false, Ordering::Release);
            Ok(())
        })
    }
}
