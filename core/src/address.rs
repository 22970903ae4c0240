//! Billing address types and state slice.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::checkout::CheckoutAction;

/// A postal address as returned by the storefront API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Customer first name.
    pub first_name: String,
    /// Customer last name.
    pub last_name: String,
    /// First street line.
    pub address1: String,
    /// Second street line.
    pub address2: String,
    /// City name.
    pub city: String,
    /// State or province name.
    pub state_or_province: String,
    /// ISO country code.
    pub country_code: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// Contact phone number.
    pub phone: String,
    /// Email address, when known.
    pub email: Option<String>,
}

/// Billing address slice. Data-only: the address is a server-derived part of
/// the checkout snapshot and is re-synchronized from checkout successes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BillingAddressState {
    /// The current billing address, if the checkout carries one.
    pub data: Option<Address>,
}

/// Reduce the billing address slice.
#[must_use]
pub fn reduce(state: &BillingAddressState, action: &Action) -> BillingAddressState {
    match action {
        Action::Checkout(
            CheckoutAction::LoadCheckoutSucceeded(checkout)
            | CheckoutAction::UpdateCheckoutSucceeded(checkout),
        ) => BillingAddressState {
            data: checkout.billing_address.clone().or_else(|| state.data.clone()),
        },

        _ => state.clone(),
    }
}
