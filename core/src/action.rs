//! The closed action union consumed by every reducer.
//!
//! Each operation family contributes exactly three lifecycle members per
//! operation (`*Requested`, `*Succeeded`, `*Failed`). Representing the
//! families as a tagged union means reducers match exhaustively at compile
//! time instead of falling through a runtime string switch.

use serde::{Deserialize, Serialize};

use crate::checkout::CheckoutAction;
use crate::consignment::ConsignmentAction;
use crate::coupon::CouponAction;
use crate::gift_certificate::GiftCertificateAction;
use crate::instrument::InstrumentAction;
use crate::order::OrderAction;
use crate::payment::PaymentAction;

/// Every action the checkout state tree can reduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Checkout operation lifecycle.
    Checkout(CheckoutAction),
    /// Order operation lifecycle.
    Order(OrderAction),
    /// Gift certificate operation lifecycle.
    GiftCertificate(GiftCertificateAction),
    /// Coupon operation lifecycle.
    Coupon(CouponAction),
    /// Consignment operation lifecycle.
    Consignment(ConsignmentAction),
    /// Vaulted instrument operation lifecycle.
    Instrument(InstrumentAction),
    /// Payment submission lifecycle.
    Payment(PaymentAction),
}

impl Action {
    /// Whether this action represents an operation failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(
            self,
            Self::Checkout(
                CheckoutAction::LoadCheckoutFailed(_) | CheckoutAction::UpdateCheckoutFailed(_)
            ) | Self::Order(
                OrderAction::LoadOrderFailed(_)
                    | OrderAction::LoadOrderPaymentsFailed(_)
                    | OrderAction::SubmitOrderFailed(_)
                    | OrderAction::FinalizeOrderFailed(_)
            ) | Self::GiftCertificate(
                GiftCertificateAction::ApplyGiftCertificateFailed(_)
                    | GiftCertificateAction::RemoveGiftCertificateFailed(_)
            ) | Self::Coupon(
                CouponAction::ApplyCouponFailed(_) | CouponAction::RemoveCouponFailed(_)
            ) | Self::Consignment(
                ConsignmentAction::CreateConsignmentsFailed(_)
                    | ConsignmentAction::UpdateConsignmentFailed(_)
            ) | Self::Instrument(
                InstrumentAction::LoadInstrumentsFailed(_)
                    | InstrumentAction::DeleteInstrumentFailed { .. }
            ) | Self::Payment(PaymentAction::SubmitPaymentFailed(_))
        )
    }
}

impl From<CheckoutAction> for Action {
    fn from(action: CheckoutAction) -> Self {
        Self::Checkout(action)
    }
}

impl From<OrderAction> for Action {
    fn from(action: OrderAction) -> Self {
        Self::Order(action)
    }
}

impl From<GiftCertificateAction> for Action {
    fn from(action: GiftCertificateAction) -> Self {
        Self::GiftCertificate(action)
    }
}

impl From<CouponAction> for Action {
    fn from(action: CouponAction) -> Self {
        Self::Coupon(action)
    }
}

impl From<ConsignmentAction> for Action {
    fn from(action: ConsignmentAction) -> Self {
        Self::Consignment(action)
    }
}

impl From<InstrumentAction> for Action {
    fn from(action: InstrumentAction) -> Self {
        Self::Instrument(action)
    }
}

impl From<PaymentAction> for Action {
    fn from(action: PaymentAction) -> Self {
        Self::Payment(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;

    #[test]
    fn failed_actions_are_errors() {
        let action = Action::from(OrderAction::SubmitOrderFailed(RequestError::new(
            400,
            "declined".to_string(),
        )));
        assert!(action.is_error());
    }

    #[test]
    fn requested_and_succeeded_actions_are_not_errors() {
        assert!(!Action::from(OrderAction::SubmitOrderRequested).is_error());
        assert!(!Action::from(PaymentAction::SubmitPaymentSucceeded).is_error());
    }
}
