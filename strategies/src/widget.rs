//! Widget collaborator contracts for the payment strategies.
//!
//! Strategies never touch the provider SDKs or the page directly; they go
//! through the traits below, implemented by the embedding application (and
//! by scripted doubles in `storefront-checkout-testing`).
//!
//! # Dyn Compatibility
//!
//! Boxed-future returns instead of `async fn`, so collaborators can be held
//! as `Arc<dyn …>` trait objects and shared with callback handlers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_checkout_core::error::CheckoutError;
use storefront_checkout_core::payment::NonceInstrument;

/// A boxed future resolving to a widget result.
pub type WidgetFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, CheckoutError>> + Send + 'a>>;

/// Configuration for building a Square payment form, parsed from the
/// payment method's initialization data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareFormConfig {
    /// Square application identifier.
    pub application_id: String,
    /// Square location identifier, when the storefront pins one.
    pub location_id: Option<String>,
}

/// A digital-wallet payment request handed to the Square form, built from
/// the current checkout totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquarePaymentRequest {
    /// Whether the wallet sheet should collect a shipping address.
    pub request_shipping_address: bool,
    /// Whether the wallet sheet should collect billing information.
    pub request_billing_info: bool,
    /// ISO currency code of the total.
    pub currency_code: String,
    /// The payable total.
    pub total: SquarePaymentRequestTotal,
}

/// The total line of a digital-wallet payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquarePaymentRequestTotal {
    /// Decimal amount, rendered as a string per the widget contract.
    pub amount: String,
    /// Display label for the total line.
    pub label: String,
}

/// Card data accompanying a Square nonce. Present only for digital-wallet
/// tokenizations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareCardData {
    /// Wallet that produced the nonce (`masterpass`, `applePay`, …).
    /// Absent for plain card entry.
    pub digital_wallet_type: Option<String>,
    /// Postal code captured by the wallet sheet.
    pub billing_postal_code: Option<String>,
}

/// Push callbacks fired by the Square payment form.
///
/// The strategy installs a handler when it builds the form; scripted forms
/// in tests fire these to simulate widget events. Methods are async so the
/// handler can read checkout state and post external requests.
pub trait SquareFormCallbacks: Send + Sync {
    /// The form finished loading and is ready for input.
    fn payment_form_loaded(&self) -> WidgetFuture<'_, ()>;

    /// The browser cannot host the form.
    fn unsupported_browser_detected(&self) -> WidgetFuture<'_, ()>;

    /// A card tokenization completed. `card_data` is present for
    /// digital-wallet tokenizations only.
    fn card_nonce_response_received(
        &self,
        result: Result<NonceInstrument, String>,
        card_data: Option<SquareCardData>,
    ) -> WidgetFuture<'_, ()>;

    /// The form is opening a digital-wallet sheet and needs a payment
    /// request describing the amount payable.
    fn create_payment_request(&self) -> WidgetFuture<'_, SquarePaymentRequest>;
}

/// A built Square payment form.
pub trait SquarePaymentForm: Send + Sync {
    /// Render the form. [`SquareFormCallbacks::payment_form_loaded`] (or
    /// `unsupported_browser_detected`) fires when the render settles.
    fn build(&self) -> WidgetFuture<'_, ()>;

    /// Ask the form to tokenize the entered card. The result arrives via
    /// [`SquareFormCallbacks::card_nonce_response_received`].
    ///
    /// # Errors
    ///
    /// Fails when the form is not in a tokenizable state.
    fn request_card_nonce(&self) -> Result<(), CheckoutError>;

    /// Prefill the postal code field.
    fn set_postal_code(&self, postal_code: &str);
}

/// Loads the Square SDK and creates payment forms from it.
pub trait SquareScriptLoader: Send + Sync {
    /// Load the SDK and build a form wired to `handler`.
    fn load(
        &self,
        config: SquareFormConfig,
        handler: Arc<dyn SquareFormCallbacks>,
    ) -> WidgetFuture<'_, Box<dyn SquarePaymentForm>>;
}

/// WePay's client-side risk fingerprinting collaborator.
pub trait WepayRiskClient: Send + Sync {
    /// Start fingerprinting. Must complete before a token is requested.
    fn initialize(&self) -> WidgetFuture<'_, ()>;

    /// The risk token for the current session.
    fn risk_token(&self) -> WidgetFuture<'_, String>;
}

/// Posts application/x-www-form-urlencoded requests without navigating.
pub trait RequestSender: Send + Sync {
    /// Post form parameters to a storefront path.
    fn post_form(&self, path: &str, params: &[(String, String)]) -> WidgetFuture<'_, ()>;
}

/// Submits a full-page form post, navigating away from the checkout.
pub trait FormPoster: Send + Sync {
    /// Post form parameters to a storefront path, replacing the page.
    fn post_form(&self, path: &str, params: &[(String, String)]);
}
