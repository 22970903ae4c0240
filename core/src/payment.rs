//! Payment types, actions, and state slice.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::RequestError;

/// A configured payment method offered by the storefront.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Method identifier (e.g. `squarev2`, `wepay`).
    pub id: String,
    /// Gateway identifier, for gateway-routed methods.
    pub gateway: Option<String>,
    /// Provider-specific configuration blob handed to the widget.
    pub initialization_data: Option<serde_json::Value>,
}

/// An opaque, single-use credential representing a tokenized payment
/// instrument, obtained from a provider's client-side widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceInstrument {
    /// The tokenized instrument.
    pub nonce: String,
}

/// Provider-specific extra data attached to a payment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentExtraData {
    /// Risk/fraud token required by some providers (e.g. WePay).
    pub risk_token: Option<String>,
}

/// Payment data accompanying a payment submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    /// Tokenized instrument, when the provider supplies one.
    pub nonce: Option<String>,
    /// Provider-specific extra data.
    pub extra_data: Option<PaymentExtraData>,
}

impl From<NonceInstrument> for PaymentData {
    fn from(instrument: NonceInstrument) -> Self {
        Self {
            nonce: Some(instrument.nonce),
            extra_data: None,
        }
    }
}

/// A payment submission payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Payment method identifier.
    pub method_id: String,
    /// Tokenized or raw payment data.
    pub payment_data: Option<PaymentData>,
}

/// Payment operation lifecycle actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaymentAction {
    /// A payment submission has been issued.
    SubmitPaymentRequested,
    /// A payment submission completed.
    SubmitPaymentSucceeded,
    /// A payment submission failed.
    SubmitPaymentFailed(RequestError),
}

/// Last failure per payment operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentErrors {
    /// Last submission failure.
    pub submit_error: Option<RequestError>,
}

/// In-flight flags per payment operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentStatuses {
    /// A payment submission is in flight.
    pub is_submitting: bool,
}

/// Payment slice state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentState {
    /// Last failure per operation.
    pub errors: PaymentErrors,
    /// In-flight flag per operation.
    pub statuses: PaymentStatuses,
}

/// Available payment methods. Seeded when the store is created; methods are
/// configured out of band and never change during a checkout session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentMethodState {
    /// Configured payment methods.
    pub data: Vec<PaymentMethod>,
}

/// Reduce the payment slice.
#[must_use]
pub fn reduce(state: &PaymentState, action: &Action) -> PaymentState {
    PaymentState {
        errors: errors_reducer(&state.errors, action),
        statuses: statuses_reducer(&state.statuses, action),
    }
}

fn errors_reducer(errors: &PaymentErrors, action: &Action) -> PaymentErrors {
    match action {
        Action::Payment(
            PaymentAction::SubmitPaymentRequested | PaymentAction::SubmitPaymentSucceeded,
        ) => PaymentErrors { submit_error: None },

        Action::Payment(PaymentAction::SubmitPaymentFailed(error)) => PaymentErrors {
            submit_error: Some(error.clone()),
        },

        _ => errors.clone(),
    }
}

fn statuses_reducer(statuses: &PaymentStatuses, action: &Action) -> PaymentStatuses {
    match action {
        Action::Payment(PaymentAction::SubmitPaymentRequested) => PaymentStatuses {
            is_submitting: true,
        },

        Action::Payment(
            PaymentAction::SubmitPaymentSucceeded | PaymentAction::SubmitPaymentFailed(_),
        ) => PaymentStatuses {
            is_submitting: false,
        },

        _ => statuses.clone(),
    }
}
