//! Cart types and state slice.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::checkout::CheckoutAction;

/// The shopping cart attached to a checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart identifier.
    pub id: String,
    /// ISO currency code for all cart amounts.
    pub currency_code: String,
    /// Cart subtotal before discounts.
    pub base_amount: f64,
}

/// Cart slice. Data-only: the cart is a server-derived part of the checkout
/// snapshot and is re-synchronized from checkout successes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartState {
    /// The current cart, once a checkout has been loaded.
    pub data: Option<Cart>,
}

/// Reduce the cart slice.
#[must_use]
pub fn reduce(state: &CartState, action: &Action) -> CartState {
    match action {
        Action::Checkout(
            CheckoutAction::LoadCheckoutSucceeded(checkout)
            | CheckoutAction::UpdateCheckoutSucceeded(checkout),
        ) => CartState {
            data: checkout.cart.clone().or_else(|| state.data.clone()),
        },

        _ => state.clone(),
    }
}
