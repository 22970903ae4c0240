//! Coupon types, actions, and state slice.
//!
//! Like gift certificates, the coupon collection is computed server-side and
//! re-synchronized from the checkout snapshot carried by any mutating
//! success.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::checkout::{Checkout, CheckoutAction};
use crate::consignment::ConsignmentAction;
use crate::error::RequestError;
use crate::gift_certificate::GiftCertificateAction;

/// A coupon applied to a checkout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Redemption code.
    pub code: String,
    /// Display name shown to the customer.
    pub display_name: String,
    /// Amount discounted by this coupon.
    pub discounted_amount: f64,
}

/// Coupon operation lifecycle actions.
///
/// Succeeded payloads are optional: the server may acknowledge a mutation
/// without returning a fresh checkout snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CouponAction {
    /// A coupon application has been issued.
    ApplyCouponRequested,
    /// A coupon application completed.
    ApplyCouponSucceeded(Option<Checkout>),
    /// A coupon application failed.
    ApplyCouponFailed(RequestError),
    /// A coupon removal has been issued.
    RemoveCouponRequested,
    /// A coupon removal completed.
    RemoveCouponSucceeded(Option<Checkout>),
    /// A coupon removal failed.
    RemoveCouponFailed(RequestError),
}

/// Last failure per coupon operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CouponErrors {
    /// Last application failure.
    pub apply_error: Option<RequestError>,
    /// Last removal failure.
    pub remove_error: Option<RequestError>,
}

/// In-flight flags per coupon operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CouponStatuses {
    /// A coupon application is in flight.
    pub is_applying: bool,
    /// A coupon removal is in flight.
    pub is_removing: bool,
}

/// Coupon slice state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CouponState {
    /// Coupons applied to the current checkout.
    pub data: Option<Vec<Coupon>>,
    /// Last failure per operation.
    pub errors: CouponErrors,
    /// In-flight flag per operation.
    pub statuses: CouponStatuses,
}

/// Reduce the coupon slice.
#[must_use]
pub fn reduce(state: &CouponState, action: &Action) -> CouponState {
    CouponState {
        data: data_reducer(&state.data, action),
        errors: errors_reducer(&state.errors, action),
        statuses: statuses_reducer(&state.statuses, action),
    }
}

fn data_reducer(data: &Option<Vec<Coupon>>, action: &Action) -> Option<Vec<Coupon>> {
    match action {
        Action::Checkout(CheckoutAction::LoadCheckoutSucceeded(checkout)) => {
            Some(checkout.coupons.clone())
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
            .map_or_else(|| data.clone(), |checkout| Some(checkout.coupons.clone())),

        _ => data.clone(),
    }
}

fn errors_reducer(errors: &CouponErrors, action: &Action) -> CouponErrors {
    match action {
        Action::Coupon(CouponAction::ApplyCouponRequested | CouponAction::ApplyCouponSucceeded(_)) => {
            CouponErrors {
                apply_error: None,
                ..errors.clone()
            }
        }

        Action::Coupon(CouponAction::ApplyCouponFailed(error)) => CouponErrors {
            apply_error: Some(error.clone()),
            ..errors.clone()
        },

        Action::Coupon(
            CouponAction::RemoveCouponRequested | CouponAction::RemoveCouponSucceeded(_),
        ) => CouponErrors {
            remove_error: None,
            ..errors.clone()
        },

        Action::Coupon(CouponAction::RemoveCouponFailed(error)) => CouponErrors {
            remove_error: Some(error.clone()),
            ..errors.clone()
        },

        _ => errors.clone(),
    }
}

fn statuses_reducer(statuses: &CouponStatuses, action: &Action) -> CouponStatuses {
    match action {
        Action::Coupon(CouponAction::ApplyCouponRequested) => CouponStatuses {
            is_applying: true,
            ..*statuses
        },

        Action::Coupon(CouponAction::ApplyCouponSucceeded(_) | CouponAction::ApplyCouponFailed(_)) => {
            CouponStatuses {
                is_applying: false,
                ..*statuses
            }
        }

        Action::Coupon(CouponAction::RemoveCouponRequested) => CouponStatuses {
            is_removing: true,
            ..*statuses
        },

        Action::Coupon(
            CouponAction::RemoveCouponSucceeded(_) | CouponAction::RemoveCouponFailed(_),
        ) => CouponStatuses {
            is_removing: false,
            ..*statuses
        },

        _ => statuses.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(code: &str) -> Coupon {
        Coupon {
            code: code.to_string(),
            display_name: "Spring sale".to_string(),
            discounted_amount: 10.0,
        }
    }

    #[test]
    fn gift_certificate_success_refreshes_coupon_data() {
        let snapshot = Checkout {
            coupons: vec![coupon("save10")],
            ..Checkout::default()
        };
        let next = reduce(
            &CouponState::default(),
            &Action::GiftCertificate(GiftCertificateAction::ApplyGiftCertificateSucceeded(Some(
                snapshot,
            ))),
        );
        assert_eq!(next.data.map(|coupons| coupons.len()), Some(1));
    }

    #[test]
    fn apply_lifecycle_tracks_status_and_error() {
        let requested = reduce(
            &CouponState::default(),
            &Action::Coupon(CouponAction::ApplyCouponRequested),
        );
        assert!(requested.statuses.is_applying);

        let error = RequestError::new(422, "coupon expired".to_string());
        let failed = reduce(
            &requested,
            &Action::Coupon(CouponAction::ApplyCouponFailed(error.clone())),
        );
        assert!(!failed.statuses.is_applying);
        assert_eq!(failed.errors.apply_error, Some(error));
    }

    #[test]
    fn unknown_action_returns_unchanged_state() {
        let prior = CouponState {
            data: Some(vec![coupon("save10")]),
            ..CouponState::default()
        };
        let next = reduce(
            &prior,
            &Action::Payment(crate::payment::PaymentAction::SubmitPaymentRequested),
        );
        assert_eq!(next, prior);
    }
}
