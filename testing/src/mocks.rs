//! Mock implementations of the collaborator traits.
//!
//! Network mocks record every call through a shared [`CallRecorder`], so
//! tests can assert both that a collaborator was (or was not) reached and
//! in what order relative to the others. Widget mocks are scripted: the
//! Square loader captures the callback handler the strategy installs, and
//! tests fire widget events through it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use storefront_checkout_core::error::{CheckoutError, RequestError};
use storefront_checkout_core::order::{InternalOrderRequestBody, Order, OrderMeta};
use storefront_checkout_core::payment::Payment;
use storefront_checkout_runtime::client::{
    CheckoutClient, CheckoutValidator, ClientFuture, OrderResponseBody, PaymentClient,
    RequestOptions, Response, ResponseHeaders,
};
use storefront_checkout_strategies::widget::{
    FormPoster, RequestSender, SquareFormCallbacks, SquareFormConfig, SquarePaymentForm,
    SquareScriptLoader, WepayRiskClient, WidgetFuture,
};
use tokio::sync::Notify;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One observed collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorCall {
    /// `CheckoutClient::load_order` with the requested id.
    LoadOrder(u64),
    /// `CheckoutClient::submit_order`.
    SubmitOrder,
    /// `CheckoutClient::finalize_order` with the requested id.
    FinalizeOrder(u64),
    /// `CheckoutValidator::validate`.
    Validate,
    /// `PaymentClient::submit_payment`.
    SubmitPayment,
}

/// Shared, ordered record of collaborator calls across mocks.
#[derive(Debug, Clone, Default)]
pub struct CallRecorder {
    calls: Arc<Mutex<Vec<CollaboratorCall>>>,
}

impl CallRecorder {
    /// A fresh, empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call.
    pub fn record(&self, call: CollaboratorCall) {
        lock(&self.calls).push(call);
    }

    /// All calls observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<CollaboratorCall> {
        lock(&self.calls).clone()
    }

    /// Whether no collaborator has been reached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.calls).is_empty()
    }
}

/// In-memory [`CheckoutClient`] serving a fixed order.
pub struct InMemoryCheckoutClient {
    recorder: CallRecorder,
    order: Order,
    submit_token: Option<String>,
    load_failure: Option<RequestError>,
    submit_failure: Option<RequestError>,
    finalize_failure: Option<RequestError>,
    submitted_bodies: Mutex<Vec<InternalOrderRequestBody>>,
}

impl InMemoryCheckoutClient {
    /// A client serving `order` from every operation.
    #[must_use]
    pub fn new(recorder: CallRecorder, order: Order) -> Self {
        Self {
            recorder,
            order,
            submit_token: None,
            load_failure: None,
            submit_failure: None,
            finalize_failure: None,
            submitted_bodies: Mutex::new(Vec::new()),
        }
    }

    /// Attach an order token to submission response headers.
    #[must_use]
    pub fn with_submit_token(mut self, token: &str) -> Self {
        self.submit_token = Some(token.to_string());
        self
    }

    /// Make order loads fail.
    #[must_use]
    pub fn failing_load(mut self, failure: RequestError) -> Self {
        self.load_failure = Some(failure);
        self
    }

    /// Make order submissions fail.
    #[must_use]
    pub fn failing_submit(mut self, failure: RequestError) -> Self {
        self.submit_failure = Some(failure);
        self
    }

    /// Make order finalizations fail.
    #[must_use]
    pub fn failing_finalize(mut self, failure: RequestError) -> Self {
        self.finalize_failure = Some(failure);
        self
    }

    /// Every internal order body submitted so far, in order.
    #[must_use]
    pub fn submitted_bodies(&self) -> Vec<InternalOrderRequestBody> {
        lock(&self.submitted_bodies).clone()
    }
}

impl CheckoutClient for InMemoryCheckoutClient {
    fn load_order(&self, order_id: u64, _options: &RequestOptions) -> ClientFuture<'_, Order> {
        let recorder = self.recorder.clone();
        let result = self
            .load_failure
            .clone()
            .map_or_else(|| Ok(Response::ok(self.order.clone())), Err);

        Box::pin(async move {
            recorder.record(CollaboratorCall::LoadOrder(order_id));
            result
        })
    }

    fn submit_order(
        &self,
        body: &InternalOrderRequestBody,
        _options: &RequestOptions,
    ) -> ClientFuture<'_, OrderResponseBody> {
        let recorder = self.recorder.clone();
        lock(&self.submitted_bodies).push(body.clone());

        let result = self.submit_failure.clone().map_or_else(
            || {
                Ok(Response {
                    status: 200,
                    headers: ResponseHeaders {
                        token: self.submit_token.clone(),
                    },
                    body: OrderResponseBody {
                        data: self.order.clone(),
                        meta: OrderMeta::default(),
                    },
                })
            },
            Err,
        );

        Box::pin(async move {
            recorder.record(CollaboratorCall::SubmitOrder);
            result
        })
    }

    fn finalize_order(
        &self,
        order_id: u64,
        _options: &RequestOptions,
    ) -> ClientFuture<'_, OrderResponseBody> {
        let recorder = self.recorder.clone();
        let result = self.finalize_failure.clone().map_or_else(
            || {
                Ok(Response::ok(OrderResponseBody {
                    data: self.order.clone(),
                    meta: OrderMeta::default(),
                }))
            },
            Err,
        );

        Box::pin(async move {
            recorder.record(CollaboratorCall::FinalizeOrder(order_id));
            result
        })
    }
}

/// Stub [`CheckoutValidator`] that accepts or rejects every checkout.
pub struct StubCheckoutValidator {
    recorder: CallRecorder,
    rejection: Option<RequestError>,
}

impl StubCheckoutValidator {
    /// A validator accepting every checkout.
    #[must_use]
    pub const fn accepting(recorder: CallRecorder) -> Self {
        Self {
            recorder,
            rejection: None,
        }
    }

    /// A validator rejecting every checkout with `rejection`.
    #[must_use]
    pub const fn rejecting(recorder: CallRecorder, rejection: RequestError) -> Self {
        Self {
            recorder,
            rejection: Some(rejection),
        }
    }
}

impl CheckoutValidator for StubCheckoutValidator {
    fn validate(
        &self,
        _checkout: &storefront_checkout_core::checkout::StoredCheckout,
        _options: &RequestOptions,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<(), RequestError>> + Send + '_>,
    > {
        let recorder = self.recorder.clone();
        let result = self.rejection.clone().map_or(Ok(()), Err);

        Box::pin(async move {
            recorder.record(CollaboratorCall::Validate);
            result
        })
    }
}

/// In-memory [`PaymentClient`] recording submitted payments.
pub struct InMemoryPaymentClient {
    recorder: CallRecorder,
    failure: Option<RequestError>,
    payments: Mutex<Vec<Payment>>,
}

impl InMemoryPaymentClient {
    /// A client accepting every payment.
    #[must_use]
    pub fn new(recorder: CallRecorder) -> Self {
        Self {
            recorder,
            failure: None,
            payments: Mutex::new(Vec::new()),
        }
    }

    /// Make payment submissions fail.
    #[must_use]
    pub fn failing(mut self, failure: RequestError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Every payment submitted so far, in order.
    #[must_use]
    pub fn submitted_payments(&self) -> Vec<Payment> {
        lock(&self.payments).clone()
    }
}

impl PaymentClient for InMemoryPaymentClient {
    fn submit_payment(&self, payment: &Payment) -> ClientFuture<'_, ()> {
        let recorder = self.recorder.clone();
        lock(&self.payments).push(payment.clone());
        let result = self
            .failure
            .clone()
            .map_or_else(|| Ok(Response::ok(())), Err);

        Box::pin(async move {
            recorder.record(CollaboratorCall::SubmitPayment);
            result
        })
    }
}

/// Scripted [`SquareScriptLoader`] that captures the strategy's callback
/// handler and hands out inspectable forms.
///
/// `build()` on the created form fires `payment_form_loaded` (or
/// `unsupported_browser_detected` when scripted so). Tokenization never
/// completes on its own: tests await [`Self::nonce_requested`] and then
/// fire `card_nonce_response_received` through [`Self::handler`].
pub struct ScriptedSquareLoader {
    handler: Mutex<Option<Arc<dyn SquareFormCallbacks>>>,
    configs: Mutex<Vec<SquareFormConfig>>,
    postal_codes: Arc<Mutex<Vec<String>>>,
    nonce_requests: Arc<Notify>,
    unsupported_browser: bool,
}

impl Default for ScriptedSquareLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSquareLoader {
    /// A loader whose forms load successfully.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handler: Mutex::new(None),
            configs: Mutex::new(Vec::new()),
            postal_codes: Arc::new(Mutex::new(Vec::new())),
            nonce_requests: Arc::new(Notify::new()),
            unsupported_browser: false,
        }
    }

    /// A loader whose forms report an unsupported browser on build.
    #[must_use]
    pub fn unsupported_browser() -> Self {
        Self {
            unsupported_browser: true,
            ..Self::new()
        }
    }

    /// The callback handler captured from the last `load`, if any.
    #[must_use]
    pub fn handler(&self) -> Option<Arc<dyn SquareFormCallbacks>> {
        lock(&self.handler).clone()
    }

    /// Form configurations passed to `load`, in order.
    #[must_use]
    pub fn loaded_configs(&self) -> Vec<SquareFormConfig> {
        lock(&self.configs).clone()
    }

    /// Postal codes prefilled into created forms, in order.
    #[must_use]
    pub fn postal_codes(&self) -> Vec<String> {
        lock(&self.postal_codes).clone()
    }

    /// Wait until a card tokenization has been requested.
    pub async fn nonce_requested(&self) {
        self.nonce_requests.notified().await;
    }
}

impl SquareScriptLoader for ScriptedSquareLoader {
    fn load(
        &self,
        config: SquareFormConfig,
        handler: Arc<dyn SquareFormCallbacks>,
    ) -> WidgetFuture<'_, Box<dyn SquarePaymentForm>> {
        lock(&self.configs).push(config);
        *lock(&self.handler) = Some(Arc::clone(&handler));

        let form = ScriptedSquareForm {
            handler,
            postal_codes: Arc::clone(&self.postal_codes),
            nonce_requests: Arc::clone(&self.nonce_requests),
            unsupported_browser: self.unsupported_browser,
        };

        Box::pin(async move { Ok(Box::new(form) as Box<dyn SquarePaymentForm>) })
    }
}

struct ScriptedSquareForm {
    handler: Arc<dyn SquareFormCallbacks>,
    postal_codes: Arc<Mutex<Vec<String>>>,
    nonce_requests: Arc<Notify>,
    unsupported_browser: bool,
}

impl SquarePaymentForm for ScriptedSquareForm {
    fn build(&self) -> WidgetFuture<'_, ()> {
        Box::pin(async move {
            if self.unsupported_browser {
                self.handler.unsupported_browser_detected().await
            } else {
                self.handler.payment_form_loaded().await
            }
        })
    }

    fn request_card_nonce(&self) -> Result<(), CheckoutError> {
        self.nonce_requests.notify_one();
        Ok(())
    }

    fn set_postal_code(&self, postal_code: &str) {
        lock(&self.postal_codes).push(postal_code.to_string());
    }
}

/// Mock [`WepayRiskClient`] serving a fixed risk token.
pub struct MockWepayRiskClient {
    token: String,
    initialize_count: Mutex<usize>,
}

impl MockWepayRiskClient {
    /// A risk client serving `token`.
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            initialize_count: Mutex::new(0),
        }
    }

    /// How many times `initialize` was called.
    #[must_use]
    pub fn initialize_count(&self) -> usize {
        *lock(&self.initialize_count)
    }
}

impl WepayRiskClient for MockWepayRiskClient {
    fn initialize(&self) -> WidgetFuture<'_, ()> {
        *lock(&self.initialize_count) += 1;
        Box::pin(async { Ok(()) })
    }

    fn risk_token(&self) -> WidgetFuture<'_, String> {
        let token = self.token.clone();
        Box::pin(async move { Ok(token) })
    }
}

/// Recording [`RequestSender`] that accepts every post.
#[derive(Default)]
pub struct RecordingRequestSender {
    posts: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl RecordingRequestSender {
    /// A fresh sender with no recorded posts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(path, params)` posted so far, in order.
    #[must_use]
    pub fn posts(&self) -> Vec<(String, Vec<(String, String)>)> {
        lock(&self.posts).clone()
    }
}

impl RequestSender for RecordingRequestSender {
    fn post_form(&self, path: &str, params: &[(String, String)]) -> WidgetFuture<'_, ()> {
        lock(&self.posts).push((path.to_string(), params.to_vec()));
        Box::pin(async { Ok(()) })
    }
}

/// Recording [`FormPoster`] that swallows every post.
#[derive(Default)]
pub struct RecordingFormPoster {
    posts: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl RecordingFormPoster {
    /// A fresh poster with no recorded posts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(path, params)` posted so far, in order.
    #[must_use]
    pub fn posts(&self) -> Vec<(String, Vec<(String, String)>)> {
        lock(&self.posts).clone()
    }
}

impl FormPoster for RecordingFormPoster {
    fn post_form(&self, path: &str, params: &[(String, String)]) {
        lock(&self.posts).push((path.to_string(), params.to_vec()));
    }
}
