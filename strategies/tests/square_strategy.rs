//! Integration tests for the Square payment strategy against scripted
//! widget collaborators.

#![allow(clippy::unwrap_used)] // Test code can unwrap

use std::sync::Arc;

use storefront_checkout_core::error::{CheckoutError, NotInitializedErrorType};
use storefront_checkout_core::order::OrderRequestBody;
use storefront_checkout_core::payment::NonceInstrument;
use storefront_checkout_runtime::{CheckoutStore, OrderActionCreator, PaymentActionCreator};
use storefront_checkout_strategies::widget::SquareCardData;
use storefront_checkout_strategies::{
    PaymentInitializeOptions, PaymentRequestOptions, PaymentStrategy, SquarePaymentStrategy,
};
use storefront_checkout_testing::fixtures;
use storefront_checkout_testing::mocks::{
    CallRecorder, CollaboratorCall, InMemoryCheckoutClient, InMemoryPaymentClient,
    RecordingFormPoster, RecordingRequestSender, ScriptedSquareLoader, StubCheckoutValidator,
};

struct Harness {
    recorder: CallRecorder,
    payment_client: Arc<InMemoryPaymentClient>,
    loader: Arc<ScriptedSquareLoader>,
    request_sender: Arc<RecordingRequestSender>,
    form_poster: Arc<RecordingFormPoster>,
    strategy: Arc<SquarePaymentStrategy>,
}

fn harness(loader: ScriptedSquareLoader) -> Harness {
    let recorder = CallRecorder::new();
    let client = Arc::new(InMemoryCheckoutClient::new(
        recorder.clone(),
        fixtures::order(),
    ));
    let payment_client = Arc::new(InMemoryPaymentClient::new(recorder.clone()));
    let loader = Arc::new(loader);
    let request_sender = Arc::new(RecordingRequestSender::new());
    let form_poster = Arc::new(RecordingFormPoster::new());

    let store = CheckoutStore::new(fixtures::loaded_state());
    let orders = OrderActionCreator::new(
        Arc::clone(&client) as _,
        Arc::new(StubCheckoutValidator::accepting(recorder.clone())) as _,
    );
    let payments = PaymentActionCreator::new(Arc::clone(&payment_client) as _);

    let strategy = Arc::new(SquarePaymentStrategy::new(
        store.clone(),
        orders,
        payments,
        Arc::clone(&loader) as _,
        Arc::clone(&request_sender) as _,
        Arc::clone(&form_poster) as _,
    ));

    Harness {
        recorder,
        payment_client,
        loader,
        request_sender,
        form_poster,
        strategy,
    }
}

fn initialize_options() -> PaymentInitializeOptions {
    PaymentInitializeOptions {
        method_id: "squarev2".to_string(),
    }
}

#[tokio::test]
async fn initialize_builds_the_form_and_prefills_the_postal_code() {
    let h = harness(ScriptedSquareLoader::new());

    h.strategy.initialize(initialize_options()).await.unwrap();

    let configs = h.loader.loaded_configs();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].application_id, "test-application-id");
    assert_eq!(configs[0].location_id, Some("test-location-id".to_string()));
    assert_eq!(h.loader.postal_codes(), vec!["95131".to_string()]);
}

#[tokio::test]
async fn initialize_fails_when_the_browser_is_unsupported() {
    let h = harness(ScriptedSquareLoader::unsupported_browser());

    let result = h.strategy.initialize(initialize_options()).await;

    assert_eq!(result, Err(CheckoutError::UnsupportedBrowser));
}

#[tokio::test]
async fn execute_before_initialize_is_rejected() {
    let h = harness(ScriptedSquareLoader::new());

    let result = h
        .strategy
        .execute(
            fixtures::order_request_body("squarev2"),
            PaymentRequestOptions::default(),
        )
        .await;

    assert_eq!(
        result,
        Err(CheckoutError::NotInitialized(
            NotInitializedErrorType::PaymentNotInitialized,
        ))
    );
    assert!(h.recorder.is_empty());
}

#[tokio::test]
async fn execute_without_a_payment_section_is_rejected() {
    let h = harness(ScriptedSquareLoader::new());
    h.strategy.initialize(initialize_options()).await.unwrap();

    let result = h
        .strategy
        .execute(
            OrderRequestBody {
                use_store_credit: false,
                payment: None,
            },
            PaymentRequestOptions::default(),
        )
        .await;

    assert!(matches!(result, Err(CheckoutError::InvalidArgument(_))));
}

#[tokio::test]
async fn execute_submits_order_then_payment_with_the_nonce() {
    let h = harness(ScriptedSquareLoader::new());
    h.strategy.initialize(initialize_options()).await.unwrap();

    let strategy = Arc::clone(&h.strategy);
    let executing = tokio::spawn(async move {
        strategy
            .execute(
                fixtures::order_request_body("squarev2"),
                PaymentRequestOptions::default(),
            )
            .await
    });

    h.loader.nonce_requested().await;
    h.loader
        .handler()
        .unwrap()
        .card_nonce_response_received(
            Ok(NonceInstrument {
                nonce: "nonce-xyz".to_string(),
            }),
            None,
        )
        .await
        .unwrap();

    let state = executing.await.unwrap().unwrap();

    // Order submission fully settles before the payment goes out.
    assert_eq!(
        h.recorder.calls(),
        vec![
            CollaboratorCall::Validate,
            CollaboratorCall::SubmitOrder,
            CollaboratorCall::LoadOrder(295),
            CollaboratorCall::SubmitPayment,
        ]
    );
    assert_eq!(state.order().unwrap().order_id, 295);

    let payments = h.payment_client.submitted_payments();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].method_id, "squarev2");
    assert_eq!(
        payments[0].payment_data.as_ref().unwrap().nonce,
        Some("nonce-xyz".to_string())
    );
}

#[tokio::test]
async fn second_execute_preempts_the_first_with_timeout() {
    let h = harness(ScriptedSquareLoader::new());
    h.strategy.initialize(initialize_options()).await.unwrap();

    let first = {
        let strategy = Arc::clone(&h.strategy);
        tokio::spawn(async move {
            strategy
                .execute(
                    fixtures::order_request_body("squarev2"),
                    PaymentRequestOptions::default(),
                )
                .await
        })
    };
    h.loader.nonce_requested().await;

    let second = {
        let strategy = Arc::clone(&h.strategy);
        tokio::spawn(async move {
            strategy
                .execute(
                    fixtures::order_request_body("squarev2"),
                    PaymentRequestOptions::default(),
                )
                .await
        })
    };
    h.loader.nonce_requested().await;

    assert_eq!(first.await.unwrap(), Err(CheckoutError::Timeout));

    h.loader
        .handler()
        .unwrap()
        .card_nonce_response_received(
            Ok(NonceInstrument {
                nonce: "nonce-2".to_string(),
            }),
            None,
        )
        .await
        .unwrap();

    assert!(second.await.unwrap().is_ok());
    assert_eq!(
        h.payment_client.submitted_payments()[0]
            .payment_data
            .as_ref()
            .unwrap()
            .nonce,
        Some("nonce-2".to_string())
    );
}

#[tokio::test]
async fn widget_tokenization_errors_reject_the_execute() {
    let h = harness(ScriptedSquareLoader::new());
    h.strategy.initialize(initialize_options()).await.unwrap();

    let strategy = Arc::clone(&h.strategy);
    let executing = tokio::spawn(async move {
        strategy
            .execute(
                fixtures::order_request_body("squarev2"),
                PaymentRequestOptions::default(),
            )
            .await
    });

    h.loader.nonce_requested().await;
    h.loader
        .handler()
        .unwrap()
        .card_nonce_response_received(Err("card declined by issuer".to_string()), None)
        .await
        .unwrap();

    let result = executing.await.unwrap();
    assert_eq!(
        result,
        Err(CheckoutError::Standard(
            "card declined by issuer".to_string()
        ))
    );
    // Neither order nor payment submission ever started.
    assert!(h.recorder.is_empty());
}

#[tokio::test]
async fn digital_wallet_nonce_routes_through_external_checkout() {
    let h = harness(ScriptedSquareLoader::new());
    h.strategy.initialize(initialize_options()).await.unwrap();

    h.loader
        .handler()
        .unwrap()
        .card_nonce_response_received(
            Ok(NonceInstrument {
                nonce: "wallet-nonce".to_string(),
            }),
            Some(SquareCardData {
                digital_wallet_type: Some("masterpass".to_string()),
                billing_postal_code: None,
            }),
        )
        .await
        .unwrap();

    let posts = h.request_sender.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "/checkout.php");
    assert!(posts[0]
        .1
        .contains(&("nonce".to_string(), "wallet-nonce".to_string())));
    assert!(posts[0]
        .1
        .contains(&("wallet_type".to_string(), "masterpass".to_string())));

    // The page reload follows the post; the nonce slot is never touched.
    assert_eq!(h.form_poster.posts(), vec![("/checkout".to_string(), vec![])]);
    assert!(h.recorder.is_empty());
}

#[tokio::test]
async fn finalize_is_not_supported() {
    let h = harness(ScriptedSquareLoader::new());

    let result = h.strategy.finalize(PaymentRequestOptions::default()).await;

    assert!(matches!(result, Err(CheckoutError::Standard(_))));
}

#[tokio::test]
async fn deinitialize_drops_the_form() {
    let h = harness(ScriptedSquareLoader::new());
    h.strategy.initialize(initialize_options()).await.unwrap();
    h.strategy
        .deinitialize(PaymentRequestOptions::default())
        .await
        .unwrap();

    let result = h
        .strategy
        .execute(
            fixtures::order_request_body("squarev2"),
            PaymentRequestOptions::default(),
        )
        .await;

    assert_eq!(
        result,
        Err(CheckoutError::NotInitialized(
            NotInitializedErrorType::PaymentNotInitialized,
        ))
    );
}
