//! Checkout types, actions, and state slice.
//!
//! The checkout snapshot returned by the storefront API embeds several
//! server-derived collections (billing address, cart, coupons, gift
//! certificates, consignments). Those collections are owned by their own
//! slices, so the checkout `data` reducer strips them and stores only the
//! flat checkout fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::address::Address;
use crate::cart::Cart;
use crate::consignment::Consignment;
use crate::coupon::Coupon;
use crate::error::RequestError;
use crate::gift_certificate::GiftCertificate;

/// A checkout snapshot as returned by the storefront API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    /// Checkout identifier.
    pub id: String,
    /// Identifier of the order created from this checkout, once one exists.
    pub order_id: Option<u64>,
    /// Free-form message the customer attached to the order.
    pub customer_message: String,
    /// Total amount payable, including discounts and shipping.
    pub grand_total: f64,
    /// When the checkout was created.
    pub created_time: Option<DateTime<Utc>>,
    /// When the checkout was last modified.
    pub updated_time: Option<DateTime<Utc>>,
    /// Billing address. Owned by the billing address slice.
    pub billing_address: Option<Address>,
    /// Shopping cart. Owned by the cart slice.
    pub cart: Option<Cart>,
    /// Applied coupons. Owned by the coupon slice.
    pub coupons: Vec<Coupon>,
    /// Applied gift certificates. Owned by the gift certificate slice.
    pub gift_certificates: Vec<GiftCertificate>,
    /// Shipping consignments.
    pub consignments: Vec<Consignment>,
}

/// The flat checkout fields retained by the checkout slice after the
/// server-derived collections have been stripped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCheckout {
    /// Checkout identifier.
    pub id: String,
    /// Identifier of the order created from this checkout, once one exists.
    pub order_id: Option<u64>,
    /// Free-form message the customer attached to the order.
    pub customer_message: String,
    /// Total amount payable, including discounts and shipping.
    pub grand_total: f64,
    /// When the checkout was created.
    pub created_time: Option<DateTime<Utc>>,
    /// When the checkout was last modified.
    pub updated_time: Option<DateTime<Utc>>,
}

impl From<&Checkout> for StoredCheckout {
    fn from(checkout: &Checkout) -> Self {
        Self {
            id: checkout.id.clone(),
            order_id: checkout.order_id,
            customer_message: checkout.customer_message.clone(),
            grand_total: checkout.grand_total,
            created_time: checkout.created_time,
            updated_time: checkout.updated_time,
        }
    }
}

/// Checkout operation lifecycle actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CheckoutAction {
    /// A checkout load has been issued.
    LoadCheckoutRequested,
    /// A checkout load completed with a fresh snapshot.
    LoadCheckoutSucceeded(Checkout),
    /// A checkout load failed.
    LoadCheckoutFailed(RequestError),
    /// A checkout update has been issued.
    UpdateCheckoutRequested,
    /// A checkout update completed with a fresh snapshot.
    UpdateCheckoutSucceeded(Checkout),
    /// A checkout update failed.
    UpdateCheckoutFailed(RequestError),
}

/// Last failure per checkout operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckoutErrors {
    /// Last load failure, cleared by a new load or a success.
    pub load_error: Option<RequestError>,
    /// Last update failure, cleared by a new update or a success.
    pub update_error: Option<RequestError>,
}

/// In-flight flags per checkout operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutStatuses {
    /// A checkout load is in flight.
    pub is_loading: bool,
    /// A checkout update is in flight.
    pub is_updating: bool,
}

/// Checkout slice state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckoutState {
    /// Stripped checkout snapshot.
    pub data: Option<StoredCheckout>,
    /// Last failure per operation.
    pub errors: CheckoutErrors,
    /// In-flight flag per operation.
    pub statuses: CheckoutStatuses,
}

/// Reduce the checkout slice. Composes the `data`, `errors`, and `statuses`
/// sub-reducers under fixed fields.
#[must_use]
pub fn reduce(state: &CheckoutState, action: &Action) -> CheckoutState {
    CheckoutState {
        data: data_reducer(&state.data, action),
        errors: errors_reducer(&state.errors, action),
        statuses: statuses_reducer(&state.statuses, action),
    }
}

fn data_reducer(data: &Option<StoredCheckout>, action: &Action) -> Option<StoredCheckout> {
    match action {
        Action::Checkout(
            CheckoutAction::LoadCheckoutSucceeded(checkout)
            | CheckoutAction::UpdateCheckoutSucceeded(checkout),
        ) => Some(StoredCheckout::from(checkout)),

        _ => data.clone(),
    }
}

fn errors_reducer(errors: &CheckoutErrors, action: &Action) -> CheckoutErrors {
    match action {
        Action::Checkout(
            CheckoutAction::LoadCheckoutRequested | CheckoutAction::LoadCheckoutSucceeded(_),
        ) => CheckoutErrors {
            load_error: None,
            ..errors.clone()
        },

        Action::Checkout(CheckoutAction::LoadCheckoutFailed(error)) => CheckoutErrors {
            load_error: Some(error.clone()),
            ..errors.clone()
        },

        Action::Checkout(
            CheckoutAction::UpdateCheckoutRequested | CheckoutAction::UpdateCheckoutSucceeded(_),
        ) => CheckoutErrors {
            update_error: None,
            ..errors.clone()
        },

        Action::Checkout(CheckoutAction::UpdateCheckoutFailed(error)) => CheckoutErrors {
            update_error: Some(error.clone()),
            ..errors.clone()
        },

        _ => errors.clone(),
    }
}

fn statuses_reducer(statuses: &CheckoutStatuses, action: &Action) -> CheckoutStatuses {
    match action {
        Action::Checkout(CheckoutAction::LoadCheckoutRequested) => CheckoutStatuses {
            is_loading: true,
            ..*statuses
        },

        Action::Checkout(
            CheckoutAction::LoadCheckoutSucceeded(_) | CheckoutAction::LoadCheckoutFailed(_),
        ) => CheckoutStatuses {
            is_loading: false,
            ..*statuses
        },

        Action::Checkout(CheckoutAction::UpdateCheckoutRequested) => CheckoutStatuses {
            is_updating: true,
            ..*statuses
        },

        Action::Checkout(
            CheckoutAction::UpdateCheckoutSucceeded(_) | CheckoutAction::UpdateCheckoutFailed(_),
        ) => CheckoutStatuses {
            is_updating: false,
            ..*statuses
        },

        _ => statuses.clone(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;

    fn checkout() -> Checkout {
        Checkout {
            id: "b20deef4".to_string(),
            order_id: Some(295),
            customer_message: "please gift wrap".to_string(),
            grand_total: 190.0,
            cart: Some(Cart {
                id: "cart-1".to_string(),
                currency_code: "USD".to_string(),
                base_amount: 200.0,
            }),
            ..Checkout::default()
        }
    }

    #[test]
    fn returns_loading_state() {
        let next = reduce(
            &CheckoutState::default(),
            &Action::Checkout(CheckoutAction::LoadCheckoutRequested),
        );
        assert!(next.statuses.is_loading);
        assert_eq!(next.errors.load_error, None);
    }

    #[test]
    fn returns_loaded_state_with_derived_collections_stripped() {
        let next = reduce(
            &CheckoutState::default(),
            &Action::Checkout(CheckoutAction::LoadCheckoutSucceeded(checkout())),
        );
        let data = next.data.unwrap();
        assert_eq!(data.id, "b20deef4");
        assert_eq!(data.order_id, Some(295));
        assert_eq!(data.customer_message, "please gift wrap");
        assert!(!next.statuses.is_loading);
    }

    #[test]
    fn returns_error_state() {
        let error = RequestError::new(500, "Internal Server Error".to_string());
        let next = reduce(
            &CheckoutState::default(),
            &Action::Checkout(CheckoutAction::LoadCheckoutFailed(error.clone())),
        );
        assert_eq!(next.errors.load_error, Some(error));
        assert!(!next.statuses.is_loading);
    }

    #[test]
    fn returns_updating_state() {
        let next = reduce(
            &CheckoutState::default(),
            &Action::Checkout(CheckoutAction::UpdateCheckoutRequested),
        );
        assert!(next.statuses.is_updating);
        assert_eq!(next.errors.update_error, None);
    }

    #[test]
    fn requested_clears_prior_error() {
        let prior = CheckoutState {
            errors: CheckoutErrors {
                load_error: Some(RequestError::new(500, "boom".to_string())),
                update_error: None,
            },
            ..CheckoutState::default()
        };
        let next = reduce(
            &prior,
            &Action::Checkout(CheckoutAction::LoadCheckoutRequested),
        );
        assert_eq!(next.errors.load_error, None);
    }

    #[test]
    fn unknown_action_returns_unchanged_state() {
        let prior = reduce(
            &CheckoutState::default(),
            &Action::Checkout(CheckoutAction::LoadCheckoutSucceeded(checkout())),
        );
        let next = reduce(
            &prior,
            &Action::Order(crate::order::OrderAction::LoadOrderRequested),
        );
        assert_eq!(next, prior);
    }
}
