//! Square payment strategy.
//!
//! Square tokenizes cards through a hosted form that pushes results via
//! callbacks. The strategy bridges those callbacks to its async lifecycle
//! with [`DeferredSlot`]s: one for form readiness during `initialize`, one
//! for the card nonce during `execute`.
//!
//! Digital wallets (Masterpass, Apple Pay) take a different path entirely:
//! the wallet sheet fires the nonce callback outside any `execute` call,
//! and the handler routes it through the external-checkout flow (post the
//! wallet data to the storefront, then reload the page) without touching
//! the nonce slot.

use std::sync::Arc;

use serde_json::Value;
use storefront_checkout_core::error::{
    CheckoutError, MissingDataErrorType, NotInitializedErrorType,
};
use storefront_checkout_core::order::OrderRequestBody;
use storefront_checkout_core::payment::{NonceInstrument, Payment, PaymentData};
use storefront_checkout_core::state::CheckoutStoreState;
use storefront_checkout_runtime::store::StateAccessor;
use storefront_checkout_runtime::{CheckoutStore, OrderActionCreator, PaymentActionCreator};
use tokio::sync::Mutex;

use crate::deferred::DeferredSlot;
use crate::widget::{
    FormPoster, RequestSender, SquareCardData, SquareFormCallbacks, SquareFormConfig,
    SquarePaymentForm, SquarePaymentRequest, SquarePaymentRequestTotal, SquareScriptLoader,
    WidgetFuture,
};
use crate::{PaymentInitializeOptions, PaymentRequestOptions, PaymentStrategy, StrategyFuture};

const EXTERNAL_CHECKOUT_PATH: &str = "/checkout.php";
const CHECKOUT_PAGE_PATH: &str = "/checkout";

/// Payment strategy for the Square hosted payment form.
pub struct SquarePaymentStrategy {
    store: CheckoutStore,
    orders: OrderActionCreator,
    payments: PaymentActionCreator,
    script_loader: Arc<dyn SquareScriptLoader>,
    handler: Arc<SquareFormHandler>,
    form: Mutex<Option<Box<dyn SquarePaymentForm>>>,
}

impl SquarePaymentStrategy {
    /// Create a strategy over its store and collaborators.
    #[must_use]
    pub fn new(
        store: CheckoutStore,
        orders: OrderActionCreator,
        payments: PaymentActionCreator,
        script_loader: Arc<dyn SquareScriptLoader>,
        request_sender: Arc<dyn RequestSender>,
        form_poster: Arc<dyn FormPoster>,
    ) -> Self {
        let handler = Arc::new(SquareFormHandler {
            state: store.accessor(),
            ready: DeferredSlot::new(),
            nonce: DeferredSlot::new(),
            request_sender,
            form_poster,
        });

        Self {
            store,
            orders,
            payments,
            script_loader,
            handler,
            form: Mutex::new(None),
        }
    }

    #[tracing::instrument(skip(self), fields(method_id = %options.method_id))]
    async fn initialize_inner(
        &self,
        options: PaymentInitializeOptions,
    ) -> Result<(), CheckoutError> {
        let config = self.form_config(&options.method_id).await?;

        let ready = self.handler.ready.open().await;

        let handler: Arc<dyn SquareFormCallbacks> = Arc::clone(&self.handler) as _;
        let form = self.script_loader.load(config, handler).await?;
        form.build().await?;

        // Resolved by payment_form_loaded, rejected by
        // unsupported_browser_detected.
        ready.wait().await?;

        if let Some(postal_code) = self
            .handler
            .state
            .read(|s| s.billing_address().map(|address| address.postal_code.clone()))
            .await
        {
            form.set_postal_code(&postal_code);
        }

        *self.form.lock().await = Some(form);
        Ok(())
    }

    async fn form_config(&self, method_id: &str) -> Result<SquareFormConfig, CheckoutError> {
        let method = self
            .store
            .state(|s| s.payment_method(method_id).cloned())
            .await
            .ok_or(CheckoutError::MissingData(MissingDataErrorType::PaymentMethod))?;

        let data: Value = method.initialization_data.ok_or_else(|| {
            CheckoutError::InvalidArgument(
                "square payment method has no initialization data".to_string(),
            )
        })?;

        serde_json::from_value(data).map_err(|error| {
            CheckoutError::InvalidArgument(format!(
                "malformed square initialization data: {error}"
            ))
        })
    }

    #[tracing::instrument(skip(self, payload, options))]
    async fn execute_inner(
        &self,
        payload: OrderRequestBody,
        options: PaymentRequestOptions,
    ) -> Result<CheckoutStoreState, CheckoutError> {
        let method_id = payload
            .payment
            .as_ref()
            .map(|payment| payment.method_id.clone())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                CheckoutError::InvalidArgument(
                    "payment method id is required to submit a payment".to_string(),
                )
            })?;

        let pending = {
            let form = self.form.lock().await;
            let form = form
                .as_ref()
                .ok_or(CheckoutError::NotInitialized(
                    NotInitializedErrorType::PaymentNotInitialized,
                ))?;

            // Preempts the previous pending tokenization, if any.
            let pending = self.handler.nonce.open().await;

            if let Err(error) = form.request_card_nonce() {
                self.handler.nonce.cancel().await;
                return Err(error);
            }

            pending
        };

        let nonce = pending.wait().await?;

        let (_, order_payload) = payload.split_payment();

        self.store
            .dispatch(self.orders.submit_order(
                order_payload,
                self.store.accessor(),
                options.request.clone(),
            ))
            .await?;

        self.store
            .dispatch(self.payments.submit_payment(Payment {
                method_id,
                payment_data: Some(PaymentData::from(nonce)),
            }))
            .await
    }

    async fn deinitialize_inner(&self) -> Result<(), CheckoutError> {
        self.form.lock().await.take();
        self.handler.nonce.cancel().await;
        self.handler.ready.cancel().await;
        Ok(())
    }
}

impl PaymentStrategy for SquarePaymentStrategy {
    fn initialize(&self, options: PaymentInitializeOptions) -> StrategyFuture<'_, ()> {
        Box::pin(self.initialize_inner(options))
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
        Box::pin(self.deinitialize_inner())
    }
}

/// Callback handler installed into the Square form. Shared between the
/// strategy (which awaits the slots) and the form (which settles them).
pub struct SquareFormHandler {
    state: StateAccessor,
    ready: DeferredSlot<()>,
    nonce: DeferredSlot<NonceInstrument>,
    request_sender: Arc<dyn RequestSender>,
    form_poster: Arc<dyn FormPoster>,
}

impl SquareFormHandler {
    async fn external_checkout(
        &self,
        nonce: NonceInstrument,
        card_data: SquareCardData,
    ) -> Result<(), CheckoutError> {
        let wallet = card_data.digital_wallet_type.unwrap_or_default();
        tracing::debug!(%wallet, "routing digital wallet tokenization through external checkout");

        let params = vec![
            ("action".to_string(), "set_external_checkout".to_string()),
            ("provider".to_string(), "squarev2".to_string()),
            ("nonce".to_string(), nonce.nonce),
            ("wallet_type".to_string(), wallet),
        ];
        self.request_sender
            .post_form(EXTERNAL_CHECKOUT_PATH, &params)
            .await?;

        // Full-page post brings the customer back through checkout with the
        // external payment attached.
        self.form_poster.post_form(CHECKOUT_PAGE_PATH, &[]);
        Ok(())
    }
}

impl SquareFormCallbacks for SquareFormHandler {
    fn payment_form_loaded(&self) -> WidgetFuture<'_, ()> {
        Box::pin(async { self.ready.settle(Ok(())).await })
    }

    fn unsupported_browser_detected(&self) -> WidgetFuture<'_, ()> {
        Box::pin(async { self.ready.settle(Err(CheckoutError::UnsupportedBrowser)).await })
    }

    fn card_nonce_response_received(
        &self,
        result: Result<NonceInstrument, String>,
        card_data: Option<SquareCardData>,
    ) -> WidgetFuture<'_, ()> {
        Box::pin(async move {
            let settlement = result.map_err(CheckoutError::Standard);

            if let Some(card_data) = card_data.filter(|c| c.digital_wallet_type.is_some()) {
                return self.external_checkout(settlement?, card_data).await;
            }

            self.nonce.settle(settlement).await
        })
    }

    fn create_payment_request(&self) -> WidgetFuture<'_, SquarePaymentRequest> {
        Box::pin(async {
            let (grand_total, currency_code) = self
                .state
                .read(|s| {
                    let checkout = s.checkout()?;
                    let cart = s.cart()?;
                    Some((checkout.grand_total, cart.currency_code.clone()))
                })
                .await
                .ok_or(CheckoutError::MissingData(MissingDataErrorType::Checkout))?;

            Ok(SquarePaymentRequest {
                request_shipping_address: true,
                request_billing_info: true,
                currency_code,
                total: SquarePaymentRequestTotal {
                    amount: format!("{grand_total:.2}"),
                    label: "Total".to_string(),
                },
            })
        })
    }
}
