//! Shipping consignment types and actions.
//!
//! Consignment mutations are reduced by other slices: the server recomputes
//! discount collections whenever shipping changes, so coupon and gift
//! certificate data re-synchronize from the checkout snapshot these actions
//! carry. The consignment collection itself lives inside [`crate::checkout::Checkout`].

use serde::{Deserialize, Serialize};

use crate::checkout::Checkout;
use crate::error::RequestError;

/// A shipping consignment attached to a checkout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consignment {
    /// Consignment identifier.
    pub id: String,
    /// Shipping cost for this consignment.
    pub shipping_cost: f64,
}

/// Consignment operation lifecycle actions.
///
/// Succeeded payloads are optional: the server may acknowledge a mutation
/// without returning a fresh checkout snapshot, in which case dependent
/// slices retain their prior data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConsignmentAction {
    /// A consignment creation has been issued.
    CreateConsignmentsRequested,
    /// A consignment creation completed.
    CreateConsignmentsSucceeded(Option<Checkout>),
    /// A consignment creation failed.
    CreateConsignmentsFailed(RequestError),
    /// A consignment update has been issued.
    UpdateConsignmentRequested,
    /// A consignment update completed.
    UpdateConsignmentSucceeded(Option<Checkout>),
    /// A consignment update failed.
    UpdateConsignmentFailed(RequestError),
}
