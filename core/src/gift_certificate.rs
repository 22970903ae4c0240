//! Gift certificate types, actions, and state slice.
//!
//! The gift certificate collection is computed server-side, so the `data`
//! sub-reducer re-synchronizes it from the checkout snapshot carried by
//! *any* operation that could have altered it: checkout loads, consignment
//! mutations, coupon mutations, and gift certificate mutations alike.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::checkout::{Checkout, CheckoutAction};
use crate::consignment::ConsignmentAction;
use crate::coupon::CouponAction;
use crate::error::RequestError;

/// A gift certificate applied to a checkout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCertificate {
    /// Redemption code.
    pub code: String,
    /// Remaining balance after this application.
    pub remaining: f64,
    /// Amount used by this checkout.
    pub used: f64,
    /// Original balance.
    pub balance: f64,
    /// When the certificate was purchased.
    pub purchase_date: Option<DateTime<Utc>>,
}

/// Gift certificate operation lifecycle actions.
///
/// Succeeded payloads are optional: the server may acknowledge a mutation
/// without returning a fresh checkout snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GiftCertificateAction {
    /// A gift certificate application has been issued.
    ApplyGiftCertificateRequested,
    /// A gift certificate application completed.
    ApplyGiftCertificateSucceeded(Option<Checkout>),
    /// A gift certificate application failed.
    ApplyGiftCertificateFailed(RequestError),
    /// A gift certificate removal has been issued.
    RemoveGiftCertificateRequested,
    /// A gift certificate removal completed.
    RemoveGiftCertificateSucceeded(Option<Checkout>),
    /// A gift certificate removal failed.
    RemoveGiftCertificateFailed(RequestError),
}

/// Last failure per gift certificate operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GiftCertificateErrors {
    /// Last application failure.
    pub apply_error: Option<RequestError>,
    /// Last removal failure.
    pub remove_error: Option<RequestError>,
}

/// In-flight flags per gift certificate operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GiftCertificateStatuses {
    /// A gift certificate application is in flight.
    pub is_applying: bool,
    /// A gift certificate removal is in flight.
    pub is_removing: bool,
}

/// Gift certificate slice state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GiftCertificateState {
    /// Gift certificates applied to the current checkout.
    pub data: Option<Vec<GiftCertificate>>,
    /// Last failure per operation.
    pub errors: GiftCertificateErrors,
    /// In-flight flag per operation.
    pub statuses: GiftCertificateStatuses,
}

/// Reduce the gift certificate slice.
#[must_use]
pub fn reduce(state: &GiftCertificateState, action: &Action) -> GiftCertificateState {
    GiftCertificateState {
        data: data_reducer(&state.data, action),
        errors: errors_reducer(&state.errors, action),
        statuses: statuses_reducer(&state.statuses, action),
    }
}

fn data_reducer(
    data: &Option<Vec<GiftCertificate>>,
    action: &Action,
) -> Option<Vec<GiftCertificate>> {
    match action {
        Action::Checkout(CheckoutAction::LoadCheckoutSucceeded(checkout)) => {
            Some(checkout.gift_certificates.clone())
        }

        Action::Consignment(
            ConsignmentAction::CreateConsignmentsSucceeded(payload)
            | ConsignmentAction::UpdateConsignmentSucceeded(payload),
        )
        | Action::Coupon(
            CouponAction::ApplyCouponSucceeded(payload)
            | CouponAction::RemoveCouponSucceeded(payload),
        )
        | Action::GiftCertificate(
            GiftCertificateAction::ApplyGiftCertificateSucceeded(payload)
            | GiftCertificateAction::RemoveGiftCertificateSucceeded(payload),
        ) => payload
            .as_ref()
            .map_or_else(|| data.clone(), |checkout| Some(checkout.gift_certificates.clone())),

        _ => data.clone(),
    }
}

fn errors_reducer(errors: &GiftCertificateErrors, action: &Action) -> GiftCertificateErrors {
    match action {
        Action::GiftCertificate(
            GiftCertificateAction::ApplyGiftCertificateRequested
            | GiftCertificateAction::ApplyGiftCertificateSucceeded(_),
        ) => GiftCertificateErrors {
            apply_error: None,
            ..errors.clone()
        },

        Action::GiftCertificate(GiftCertificateAction::ApplyGiftCertificateFailed(error)) => {
            GiftCertificateErrors {
                apply_error: Some(error.clone()),
                ..errors.clone()
            }
        }

        Action::GiftCertificate(
            GiftCertificateAction::RemoveGiftCertificateRequested
            | GiftCertificateAction::RemoveGiftCertificateSucceeded(_),
        ) => GiftCertificateErrors {
            remove_error: None,
            ..errors.clone()
        },

        Action::GiftCertificate(GiftCertificateAction::RemoveGiftCertificateFailed(error)) => {
            GiftCertificateErrors {
                remove_error: Some(error.clone()),
                ..errors.clone()
            }
        }

        _ => errors.clone(),
    }
}

fn statuses_reducer(
    statuses: &GiftCertificateStatuses,
    action: &Action,
) -> GiftCertificateStatuses {
    match action {
        Action::GiftCertificate(GiftCertificateAction::ApplyGiftCertificateRequested) => {
            GiftCertificateStatuses {
                is_applying: true,
                ..*statuses
            }
        }

        Action::GiftCertificate(
            GiftCertificateAction::ApplyGiftCertificateSucceeded(_)
            | GiftCertificateAction::ApplyGiftCertificateFailed(_),
        ) => GiftCertificateStatuses {
            is_applying: false,
            ..*statuses
        },

        Action::GiftCertificate(GiftCertificateAction::RemoveGiftCertificateRequested) => {
            GiftCertificateStatuses {
                is_removing: true,
                ..*statuses
            }
        }

        Action::GiftCertificate(
            GiftCertificateAction::RemoveGiftCertificateSucceeded(_)
            | GiftCertificateAction::RemoveGiftCertificateFailed(_),
        ) => GiftCertificateStatuses {
            is_removing: false,
            ..*statuses
        },

        _ => statuses.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificate(code: &str) -> GiftCertificate {
        GiftCertificate {
            code: code.to_string(),
            remaining: 10.0,
            used: 5.0,
            balance: 15.0,
            purchase_date: None,
        }
    }

    fn snapshot(certificates: Vec<GiftCertificate>) -> Checkout {
        Checkout {
            gift_certificates: certificates,
            ..Checkout::default()
        }
    }

    #[test]
    fn apply_succeeded_replaces_data_from_snapshot() {
        let prior = GiftCertificateState {
            data: Some(vec![certificate("gc0")]),
            ..GiftCertificateState::default()
        };
        let next = reduce(
            &prior,
            &Action::GiftCertificate(GiftCertificateAction::ApplyGiftCertificateSucceeded(Some(
                snapshot(vec![certificate("gc1"), certificate("gc2")]),
            ))),
        );
        let codes: Vec<_> = next.data.into_iter().flatten().map(|c| c.code).collect();
        assert_eq!(codes, vec!["gc1".to_string(), "gc2".to_string()]);
    }

    #[test]
    fn apply_succeeded_without_snapshot_retains_data() {
        let prior = GiftCertificateState {
            data: Some(vec![certificate("gc0")]),
            ..GiftCertificateState::default()
        };
        let next = reduce(
            &prior,
            &Action::GiftCertificate(GiftCertificateAction::ApplyGiftCertificateSucceeded(None)),
        );
        assert_eq!(next.data, prior.data);
    }

    #[test]
    fn coupon_and_consignment_successes_also_refresh_data() {
        let prior = GiftCertificateState::default();
        let from_coupon = reduce(
            &prior,
            &Action::Coupon(CouponAction::ApplyCouponSucceeded(Some(snapshot(vec![
                certificate("gc1"),
            ])))),
        );
        assert_eq!(from_coupon.data.as_ref().map(Vec::len), Some(1));

        let from_consignment = reduce(
            &from_coupon,
            &Action::Consignment(ConsignmentAction::UpdateConsignmentSucceeded(Some(
                snapshot(vec![]),
            ))),
        );
        assert_eq!(from_consignment.data, Some(vec![]));
    }

    #[test]
    fn requested_sets_status_and_clears_error() {
        let prior = GiftCertificateState {
            errors: GiftCertificateErrors {
                apply_error: Some(RequestError::new(422, "invalid code".to_string())),
                remove_error: None,
            },
            ..GiftCertificateState::default()
        };
        let next = reduce(
            &prior,
            &Action::GiftCertificate(GiftCertificateAction::ApplyGiftCertificateRequested),
        );
        assert!(next.statuses.is_applying);
        assert_eq!(next.errors.apply_error, None);
    }

    #[test]
    fn failed_records_error_and_clears_status() {
        let error = RequestError::new(422, "invalid code".to_string());
        let requested = reduce(
            &GiftCertificateState::default(),
            &Action::GiftCertificate(GiftCertificateAction::RemoveGiftCertificateRequested),
        );
        let next = reduce(
            &requested,
            &Action::GiftCertificate(GiftCertificateAction::RemoveGiftCertificateFailed(
                error.clone(),
            )),
        );
        assert!(!next.statuses.is_removing);
        assert_eq!(next.errors.remove_error, Some(error));
    }

    #[test]
    fn unknown_action_returns_unchanged_state() {
        let prior = GiftCertificateState {
            data: Some(vec![certificate("gc0")]),
            ..GiftCertificateState::default()
        };
        let next = reduce(
            &prior,
            &Action::Order(crate::order::OrderAction::LoadOrderRequested),
        );
        assert_eq!(next, prior);
    }
}
