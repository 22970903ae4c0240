//! The checkout state tree, its root reducer, and the selector layer.
//!
//! The tree is the only shared resource in the system and is never mutated
//! in place: every dispatched action produces a wholly new tree through
//! [`reduce`]. Selectors are plain read-only methods over an immutable
//! snapshot: no stateful selector objects, no hidden caches.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::address::{self, Address, BillingAddressState};
use crate::cart::{self, Cart, CartState};
use crate::checkout::{self, CheckoutState, StoredCheckout};
use crate::coupon::{self, Coupon, CouponState};
use crate::gift_certificate::{self, GiftCertificate, GiftCertificateState};
use crate::instrument::{self, Instrument, InstrumentState};
use crate::order::{self, Order, OrderState};
use crate::payment::{self, PaymentMethod, PaymentMethodState, PaymentState};

/// The complete reduced state of a checkout session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckoutStoreState {
    /// Checkout slice.
    pub checkout: CheckoutState,
    /// Order slice.
    pub order: OrderState,
    /// Gift certificate slice.
    pub gift_certificates: GiftCertificateState,
    /// Coupon slice.
    pub coupons: CouponState,
    /// Vaulted instrument slice.
    pub instruments: InstrumentState,
    /// Payment submission slice.
    pub payment: PaymentState,
    /// Cart slice.
    pub cart: CartState,
    /// Billing address slice.
    pub billing_address: BillingAddressState,
    /// Configured payment methods, seeded at store creation.
    pub payment_methods: PaymentMethodState,
}

impl CheckoutStoreState {
    /// Create an empty state tree seeded with the storefront's configured
    /// payment methods.
    #[must_use]
    pub fn with_payment_methods(methods: Vec<PaymentMethod>) -> Self {
        Self {
            payment_methods: PaymentMethodState { data: methods },
            ..Self::default()
        }
    }

    /// The current checkout, once one has been loaded.
    #[must_use]
    pub const fn checkout(&self) -> Option<&StoredCheckout> {
        self.checkout.data.as_ref()
    }

    /// The current order, once one has been loaded or submitted.
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.order.data.as_ref()
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        self.cart.data.as_ref()
    }

    /// The current billing address.
    #[must_use]
    pub const fn billing_address(&self) -> Option<&Address> {
        self.billing_address.data.as_ref()
    }

    /// Look up a configured payment method by its identifier.
    #[must_use]
    pub fn payment_method(&self, method_id: &str) -> Option<&PaymentMethod> {
        self.payment_methods
            .data
            .iter()
            .find(|method| method.id == method_id)
    }

    /// Gift certificates applied to the current checkout.
    #[must_use]
    pub fn gift_certificates(&self) -> &[GiftCertificate] {
        self.gift_certificates.data.as_deref().unwrap_or_default()
    }

    /// Coupons applied to the current checkout.
    #[must_use]
    pub fn coupons(&self) -> &[Coupon] {
        self.coupons.data.as_deref().unwrap_or_default()
    }

    /// Vaulted instruments available to the customer.
    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments.data
    }

    /// Resolve the current order identifier: the order slice wins, the
    /// checkout slice is the fallback. `None` when neither slice has one.
    #[must_use]
    pub fn order_id(&self) -> Option<u64> {
        self.order
            .data
            .as_ref()
            .map(|order| order.order_id)
            .or_else(|| self.checkout.data.as_ref().and_then(|checkout| checkout.order_id))
    }

    /// The customer message attached to the current checkout.
    #[must_use]
    pub fn customer_message(&self) -> Option<&str> {
        self.checkout
            .data
            .as_ref()
            .map(|checkout| checkout.customer_message.as_str())
    }
}

/// Reduce the whole state tree: keyed composition of the slice reducers.
/// Reducer application is synchronous; callers serialize dispatches.
#[must_use]
pub fn reduce(state: &CheckoutStoreState, action: &Action) -> CheckoutStoreState {
    CheckoutStoreState {
        checkout: checkout::reduce(&state.checkout, action),
        order: order::reduce(&state.order, action),
        gift_certificates: gift_certificate::reduce(&state.gift_certificates, action),
        coupons: coupon::reduce(&state.coupons, action),
        instruments: instrument::reduce(&state.instruments, action),
        payment: payment::reduce(&state.payment, action),
        cart: cart::reduce(&state.cart, action),
        billing_address: address::reduce(&state.billing_address, action),
        payment_methods: state.payment_methods.clone(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;
    use crate::checkout::{Checkout, CheckoutAction};
    use crate::error::RequestError;
    use crate::order::OrderAction;
    use proptest::prelude::*;

    fn loaded_state(order_id: Option<u64>) -> CheckoutStoreState {
        reduce(
            &CheckoutStoreState::default(),
            &Action::Checkout(CheckoutAction::LoadCheckoutSucceeded(Checkout {
                id: "b20deef4".to_string(),
                order_id,
                customer_message: "hello".to_string(),
                ..Checkout::default()
            })),
        )
    }

    #[test]
    fn order_id_prefers_the_order_slice() {
        let mut state = loaded_state(Some(295));
        assert_eq!(state.order_id(), Some(295));

        state = reduce(
            &state,
            &Action::Order(OrderAction::LoadOrderSucceeded(Order {
                order_id: 300,
                ..Order::default()
            })),
        );
        assert_eq!(state.order_id(), Some(300));
    }

    #[test]
    fn order_id_is_none_without_order_or_checkout() {
        assert_eq!(CheckoutStoreState::default().order_id(), None);
    }

    #[test]
    fn payment_method_lookup_matches_by_id() {
        let state = CheckoutStoreState::with_payment_methods(vec![PaymentMethod {
            id: "squarev2".to_string(),
            ..PaymentMethod::default()
        }]);
        assert!(state.payment_method("squarev2").is_some());
        assert!(state.payment_method("wepay").is_none());
    }

    #[test]
    fn one_checkout_load_fans_out_across_slices() {
        let mut checkout = Checkout {
            id: "b20deef4".to_string(),
            ..Checkout::default()
        };
        checkout.cart = Some(crate::cart::Cart {
            id: "cart-1".to_string(),
            currency_code: "USD".to_string(),
            base_amount: 200.0,
        });
        checkout.gift_certificates = vec![crate::gift_certificate::GiftCertificate {
            code: "gc1".to_string(),
            ..crate::gift_certificate::GiftCertificate::default()
        }];

        let state = reduce(
            &CheckoutStoreState::default(),
            &Action::Checkout(CheckoutAction::LoadCheckoutSucceeded(checkout)),
        );
        assert!(state.checkout().is_some());
        assert!(state.cart().is_some());
        assert_eq!(state.gift_certificates().len(), 1);
    }

    /// One step of an operation lifecycle, for the invariant property below.
    #[derive(Debug, Clone)]
    enum Step {
        Requested,
        Succeeded,
        Failed,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::Requested),
            Just(Step::Succeeded),
            Just(Step::Failed),
        ]
    }

    proptest! {
        /// The request/succeed/fail invariant holds for any interleaving:
        /// `Requested` sets the in-flight flag and clears the error,
        /// `Succeeded` and `Failed` clear the flag, `Failed` records the
        /// carried error.
        #[test]
        fn submit_order_lifecycle_invariant(steps in proptest::collection::vec(step_strategy(), 1..12)) {
            let error = RequestError::new(400, "declined".to_string());
            let mut state = CheckoutStoreState::default();
            let mut expected_in_flight = false;
            let mut expected_error: Option<RequestError> = None;

            for step in &steps {
                let action = match step {
                    Step::Requested => {
                        expected_in_flight = true;
                        expected_error = None;
                        OrderAction::SubmitOrderRequested
                    }
                    Step::Succeeded => {
                        expected_in_flight = false;
                        expected_error = None;
                        OrderAction::SubmitOrderSucceeded {
                            data: Order::default(),
                            meta: crate::order::OrderMeta::default(),
                        }
                    }
                    Step::Failed => {
                        expected_in_flight = false;
                        expected_error = Some(error.clone());
                        OrderAction::SubmitOrderFailed(error.clone())
                    }
                };
                state = reduce(&state, &Action::Order(action));

                prop_assert_eq!(state.order.statuses.is_submitting, expected_in_flight);
                prop_assert_eq!(&state.order.errors.submit_error, &expected_error);
            }
        }

        /// Actions outside a slice's families leave the slice value-unchanged.
        #[test]
        fn unrelated_actions_leave_slices_unchanged(steps in proptest::collection::vec(step_strategy(), 1..8)) {
            let prior = loaded_state(Some(295));

            for step in &steps {
                let action = match step {
                    Step::Requested => OrderAction::LoadOrderRequested,
                    Step::Succeeded => OrderAction::LoadOrderSucceeded(Order::default()),
                    Step::Failed => OrderAction::LoadOrderFailed(RequestError::new(500, "boom".to_string())),
                };
                let next = reduce(&prior, &Action::Order(action));
                prop_assert_eq!(&next.checkout, &prior.checkout);
                prop_assert_eq!(&next.gift_certificates, &prior.gift_certificates);
                prop_assert_eq!(&next.instruments, &prior.instruments);
            }
        }
    }
}
