//! Shared domain fixtures.
//!
//! One canonical checkout (`b20deef4`, 190.00 USD, San Jose billing
//! address) threads through the test suites so assertions can use stable
//! literals.

use chrono::{DateTime, Utc};
use serde_json::json;
use storefront_checkout_core::action::Action;
use storefront_checkout_core::address::Address;
use storefront_checkout_core::cart::Cart;
use storefront_checkout_core::checkout::{Checkout, CheckoutAction};
use storefront_checkout_core::order::{
    Order, OrderPayment, OrderPaymentRequest, OrderRequestBody,
};
use storefront_checkout_core::payment::{PaymentData, PaymentMethod};
use storefront_checkout_core::state::{self, CheckoutStoreState};

/// Fixed fixture timestamp (2025-01-01 00:00:00 UTC).
///
/// # Panics
///
/// This function will panic if the hardcoded timestamp fails to parse,
/// which should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
        .expect("hardcoded timestamp should always parse")
        .with_timezone(&Utc)
}

/// The canonical billing address.
#[must_use]
pub fn address() -> Address {
    Address {
        first_name: "Test".to_string(),
        last_name: "Tester".to_string(),
        address1: "12345 Testing Way".to_string(),
        address2: String::new(),
        city: "San Jose".to_string(),
        state_or_province: "California".to_string(),
        country_code: "US".to_string(),
        postal_code: "95131".to_string(),
        phone: "555-555-5555".to_string(),
        email: Some("shopper@example.com".to_string()),
    }
}

/// The canonical cart.
#[must_use]
pub fn cart() -> Cart {
    Cart {
        id: "b20deef4-cart".to_string(),
        currency_code: "USD".to_string(),
        base_amount: 200.0,
    }
}

/// The canonical checkout snapshot, not yet converted to an order.
#[must_use]
pub fn checkout() -> Checkout {
    Checkout {
        id: "b20deef4".to_string(),
        order_id: None,
        customer_message: "please gift wrap".to_string(),
        grand_total: 190.0,
        created_time: Some(fixed_time()),
        updated_time: Some(fixed_time()),
        billing_address: Some(address()),
        cart: Some(cart()),
        coupons: vec![],
        gift_certificates: vec![],
        consignments: vec![],
    }
}

/// The canonical checkout with an order already created from it.
#[must_use]
pub fn checkout_with_order(order_id: u64) -> Checkout {
    Checkout {
        order_id: Some(order_id),
        ..checkout()
    }
}

/// The canonical submitted order.
#[must_use]
pub fn order() -> Order {
    Order {
        order_id: 295,
        currency: "USD".to_string(),
        total: 190.0,
        is_complete: false,
        payments: vec![OrderPayment {
            provider_id: "squarev2".to_string(),
            description: "Square".to_string(),
            amount: 190.0,
        }],
    }
}

/// An order request body carrying a payment section for `method_id`.
#[must_use]
pub fn order_request_body(method_id: &str) -> OrderRequestBody {
    OrderRequestBody {
        use_store_credit: false,
        payment: Some(OrderPaymentRequest {
            method_id: method_id.to_string(),
            gateway_id: None,
            payment_data: Some(PaymentData::default()),
        }),
    }
}

/// The Square payment method as configured by the storefront.
#[must_use]
pub fn square_payment_method() -> PaymentMethod {
    PaymentMethod {
        id: "squarev2".to_string(),
        gateway: None,
        initialization_data: Some(json!({
            "applicationId": "test-application-id",
            "locationId": "test-location-id",
        })),
    }
}

/// The WePay payment method as configured by the storefront.
#[must_use]
pub fn wepay_payment_method() -> PaymentMethod {
    PaymentMethod {
        id: "wepay".to_string(),
        gateway: None,
        initialization_data: None,
    }
}

/// A state tree with the canonical checkout loaded and both payment
/// methods configured.
#[must_use]
pub fn loaded_state() -> CheckoutStoreState {
    let initial = CheckoutStoreState::with_payment_methods(vec![
        square_payment_method(),
        wepay_payment_method(),
    ]);
    state::reduce(
        &initial,
        &Action::Checkout(CheckoutAction::LoadCheckoutSucceeded(checkout())),
    )
}
