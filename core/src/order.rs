//! Order types, actions, request bodies, and state slice.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::RequestError;
use crate::payment::PaymentData;

/// An order as returned by the storefront API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier.
    pub order_id: u64,
    /// ISO currency code for all order amounts.
    pub currency: String,
    /// Total amount charged.
    pub total: f64,
    /// Whether the order has been fully processed.
    pub is_complete: bool,
    /// Payments recorded against the order.
    pub payments: Vec<OrderPayment>,
}

/// A payment recorded against an order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayment {
    /// Provider that processed the payment.
    pub provider_id: String,
    /// Human-readable description.
    pub description: String,
    /// Amount covered by this payment.
    pub amount: f64,
}

/// Metadata carried by an order submission response. The `token` field is
/// sourced from the response headers, not the body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMeta {
    /// Device fingerprint echoed by the payment host.
    pub device_fingerprint: Option<String>,
    /// Order token from the response headers, required by the payment host.
    pub token: Option<String>,
}

/// The payment section of an externally supplied order request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPaymentRequest {
    /// Payment method identifier.
    pub method_id: String,
    /// Payment gateway identifier, for gateway-routed methods.
    pub gateway_id: Option<String>,
    /// Tokenized or raw payment data.
    pub payment_data: Option<PaymentData>,
}

/// The externally facing order request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequestBody {
    /// Whether store credit should be applied to the order.
    pub use_store_credit: bool,
    /// Payment details, absent when the order requires no payment.
    pub payment: Option<OrderPaymentRequest>,
}

impl OrderRequestBody {
    /// Split the body into its payment section and the remaining order
    /// fields. Payment submission and order submission travel separately.
    #[must_use]
    pub fn split_payment(self) -> (Option<OrderPaymentRequest>, Self) {
        let payment = self.payment;
        (
            payment,
            Self {
                payment: None,
                ..self
            },
        )
    }
}

/// The payment section in the internal wire format expected by the checkout
/// host: `method_id` travels as `name` and `gateway_id` as `gateway`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalOrderPayment {
    /// Payment method name (the external `method_id`).
    pub name: String,
    /// Payment gateway (the external `gateway_id`).
    pub gateway: Option<String>,
    /// Tokenized or raw payment data, passed through unchanged.
    pub payment_data: Option<PaymentData>,
}

/// The internal order request body submitted to the checkout host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalOrderRequestBody {
    /// Whether store credit should be applied to the order.
    pub use_store_credit: bool,
    /// Customer message sourced from checkout state. Only attached when the
    /// body carries a payment section.
    pub customer_message: Option<String>,
    /// Renamed payment section, absent when the external body had none.
    pub payment: Option<InternalOrderPayment>,
}

/// Order operation lifecycle actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderAction {
    /// An order load has been issued.
    LoadOrderRequested,
    /// An order load completed.
    LoadOrderSucceeded(Order),
    /// An order load failed.
    LoadOrderFailed(RequestError),
    /// An order payments load has been issued.
    LoadOrderPaymentsRequested,
    /// An order payments load completed with a fresh order snapshot.
    LoadOrderPaymentsSucceeded(Order),
    /// An order payments load failed.
    LoadOrderPaymentsFailed(RequestError),
    /// An order submission has been issued.
    SubmitOrderRequested,
    /// An order submission completed.
    SubmitOrderSucceeded {
        /// The created order.
        data: Order,
        /// Response metadata, including the header-sourced token.
        meta: OrderMeta,
    },
    /// An order submission failed.
    SubmitOrderFailed(RequestError),
    /// An order finalization has been issued.
    FinalizeOrderRequested,
    /// An order finalization completed.
    FinalizeOrderSucceeded(Order),
    /// An order finalization failed.
    FinalizeOrderFailed(RequestError),
}

/// Last failure per order operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderErrors {
    /// Last load failure.
    pub load_error: Option<RequestError>,
    /// Last payments-load failure.
    pub load_payments_error: Option<RequestError>,
    /// Last submission failure.
    pub submit_error: Option<RequestError>,
    /// Last finalization failure.
    pub finalize_error: Option<RequestError>,
}

/// In-flight flags per order operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderStatuses {
    /// An order load is in flight.
    pub is_loading: bool,
    /// An order payments load is in flight.
    pub is_loading_payments: bool,
    /// An order submission is in flight.
    pub is_submitting: bool,
    /// An order finalization is in flight.
    pub is_finalizing: bool,
}

/// Order slice state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderState {
    /// The most recently loaded or submitted order.
    pub data: Option<Order>,
    /// Last failure per operation.
    pub errors: OrderErrors,
    /// In-flight flag per operation.
    pub statuses: OrderStatuses,
    /// Submission metadata, once an order has been submitted.
    pub meta: Option<OrderMeta>,
}

/// Reduce the order slice.
#[must_use]
pub fn reduce(state: &OrderState, action: &Action) -> OrderState {
    OrderState {
        data: data_reducer(&state.data, action),
        errors: errors_reducer(&state.errors, action),
        statuses: statuses_reducer(&state.statuses, action),
        meta: meta_reducer(&state.meta, action),
    }
}

fn data_reducer(data: &Option<Order>, action: &Action) -> Option<Order> {
    match action {
        Action::Order(
            OrderAction::LoadOrderSucceeded(order)
            | OrderAction::LoadOrderPaymentsSucceeded(order)
            | OrderAction::SubmitOrderSucceeded { data: order, .. }
            | OrderAction::FinalizeOrderSucceeded(order),
        ) => Some(order.clone()),

        _ => data.clone(),
    }
}

fn meta_reducer(meta: &Option<OrderMeta>, action: &Action) -> Option<OrderMeta> {
    match action {
        Action::Order(OrderAction::SubmitOrderSucceeded { meta: next, .. }) => Some(next.clone()),

        _ => meta.clone(),
    }
}

fn errors_reducer(errors: &OrderErrors, action: &Action) -> OrderErrors {
    let Action::Order(action) = action else {
        return errors.clone();
    };

    match action {
        OrderAction::LoadOrderRequested | OrderAction::LoadOrderSucceeded(_) => OrderErrors {
            load_error: None,
            ..errors.clone()
        },
        OrderAction::LoadOrderFailed(error) => OrderErrors {
            load_error: Some(error.clone()),
            ..errors.clone()
        },

        OrderAction::LoadOrderPaymentsRequested | OrderAction::LoadOrderPaymentsSucceeded(_) => {
            OrderErrors {
                load_payments_error: None,
                ..errors.clone()
            }
        }
        OrderAction::LoadOrderPaymentsFailed(error) => OrderErrors {
            load_payments_error: Some(error.clone()),
            ..errors.clone()
        },

        OrderAction::SubmitOrderRequested | OrderAction::SubmitOrderSucceeded { .. } => {
            OrderErrors {
                submit_error: None,
                ..errors.clone()
            }
        }
        OrderAction::SubmitOrderFailed(error) => OrderErrors {
            submit_error: Some(error.clone()),
            ..errors.clone()
        },

        OrderAction::FinalizeOrderRequested | OrderAction::FinalizeOrderSucceeded(_) => {
            OrderErrors {
                finalize_error: None,
                ..errors.clone()
            }
        }
        OrderAction::FinalizeOrderFailed(error) => OrderErrors {
            finalize_error: Some(error.clone()),
            ..errors.clone()
        },
    }
}

fn statuses_reducer(statuses: &OrderStatuses, action: &Action) -> OrderStatuses {
    let Action::Order(action) = action else {
        return statuses.clone();
    };

    match action {
        OrderAction::LoadOrderRequested => OrderStatuses {
            is_loading: true,
            ..*statuses
        },
        OrderAction::LoadOrderSucceeded(_) | OrderAction::LoadOrderFailed(_) => OrderStatuses {
            is_loading: false,
            ..*statuses
        },

        OrderAction::LoadOrderPaymentsRequested => OrderStatuses {
            is_loading_payments: true,
            ..*statuses
        },
        OrderAction::LoadOrderPaymentsSucceeded(_) | OrderAction::LoadOrderPaymentsFailed(_) => {
            OrderStatuses {
                is_loading_payments: false,
                ..*statuses
            }
        }

        OrderAction::SubmitOrderRequested => OrderStatuses {
            is_submitting: true,
            ..*statuses
        },
        OrderAction::SubmitOrderSucceeded { .. } | OrderAction::SubmitOrderFailed(_) => {
            OrderStatuses {
                is_submitting: false,
                ..*statuses
            }
        }

        OrderAction::FinalizeOrderRequested => OrderStatuses {
            is_finalizing: true,
            ..*statuses
        },
        OrderAction::FinalizeOrderSucceeded(_) | OrderAction::FinalizeOrderFailed(_) => {
            OrderStatuses {
                is_finalizing: false,
                ..*statuses
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;

    fn order() -> Order {
        Order {
            order_id: 295,
            currency: "USD".to_string(),
            total: 190.0,
            is_complete: false,
            payments: vec![],
        }
    }

    #[test]
    fn submit_requested_sets_status_and_clears_error() {
        let prior = OrderState {
            errors: OrderErrors {
                submit_error: Some(RequestError::new(400, "declined".to_string())),
                ..OrderErrors::default()
            },
            ..OrderState::default()
        };
        let next = reduce(&prior, &Action::Order(OrderAction::SubmitOrderRequested));
        assert!(next.statuses.is_submitting);
        assert_eq!(next.errors.submit_error, None);
    }

    #[test]
    fn submit_succeeded_replaces_data_and_merges_meta() {
        let next = reduce(
            &OrderState::default(),
            &Action::Order(OrderAction::SubmitOrderSucceeded {
                data: order(),
                meta: OrderMeta {
                    device_fingerprint: None,
                    token: Some("order-token".to_string()),
                },
            }),
        );
        assert_eq!(next.data.unwrap().order_id, 295);
        assert_eq!(next.meta.unwrap().token, Some("order-token".to_string()));
        assert!(!next.statuses.is_submitting);
    }

    #[test]
    fn submit_failed_records_error_and_clears_status() {
        let error = RequestError::new(400, "declined".to_string());
        let prior = reduce(
            &OrderState::default(),
            &Action::Order(OrderAction::SubmitOrderRequested),
        );
        let next = reduce(
            &prior,
            &Action::Order(OrderAction::SubmitOrderFailed(error.clone())),
        );
        assert_eq!(next.errors.submit_error, Some(error));
        assert!(!next.statuses.is_submitting);
    }

    #[test]
    fn load_payments_succeeded_refreshes_order_data() {
        let refreshed = Order {
            payments: vec![OrderPayment {
                provider_id: "squarev2".to_string(),
                description: "Square".to_string(),
                amount: 190.0,
            }],
            ..order()
        };
        let next = reduce(
            &OrderState {
                data: Some(order()),
                ..OrderState::default()
            },
            &Action::Order(OrderAction::LoadOrderPaymentsSucceeded(refreshed.clone())),
        );
        assert_eq!(next.data, Some(refreshed));
    }

    #[test]
    fn unknown_action_returns_unchanged_state() {
        let prior = OrderState {
            data: Some(order()),
            ..OrderState::default()
        };
        let next = reduce(
            &prior,
            &Action::Checkout(crate::checkout::CheckoutAction::LoadCheckoutRequested),
        );
        assert_eq!(next, prior);
    }

    #[test]
    fn split_payment_detaches_the_payment_section() {
        let body = OrderRequestBody {
            use_store_credit: true,
            payment: Some(OrderPaymentRequest {
                method_id: "squarev2".to_string(),
                ..OrderPaymentRequest::default()
            }),
        };
        let (payment, order_body) = body.split_payment();
        assert_eq!(payment.unwrap().method_id, "squarev2");
        assert!(order_body.payment.is_none());
        assert!(order_body.use_store_credit);
    }
}
