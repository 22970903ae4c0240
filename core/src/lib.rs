//! # Storefront Checkout Core
//!
//! State slices, actions, and pure reducers for the storefront checkout
//! library.
//!
//! ## Core Concepts
//!
//! - **Action**: a closed tagged union of operation lifecycles; every
//!   operation contributes `*Requested`, `*Succeeded`, and `*Failed` members.
//! - **Slice**: a named partition of the state tree owning `data`, `errors`,
//!   and `statuses` (plus `meta` where the server returns any).
//! - **Reducer**: pure function `(prior, action) → next`; the prior state is
//!   never mutated and unknown actions return it unchanged.
//! - **Selectors**: read-only methods over an immutable
//!   [`state::CheckoutStoreState`] snapshot.
//!
//! ## The lifecycle invariant
//!
//! For every operation, on every slice: `Requested` sets the in-flight flag
//! and clears the prior error; `Succeeded` and `Failed` clear the flag;
//! `Failed` stores the carried error. Network failures are response-shaped
//! ([`error::RequestError`]) so the original response stays inspectable from
//! state.
//!
//! ## Example
//!
//! ```
//! use storefront_checkout_core::action::Action;
//! use storefront_checkout_core::checkout::{Checkout, CheckoutAction};
//! use storefront_checkout_core::state::{self, CheckoutStoreState};
//!
//! let initial = CheckoutStoreState::default();
//! let loaded = state::reduce(
//!     &initial,
//!     &Action::Checkout(CheckoutAction::LoadCheckoutSucceeded(Checkout::default())),
//! );
//! assert!(loaded.checkout().is_some());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

/// The closed action union consumed by reducers.
pub mod action;
/// Billing address types and slice.
pub mod address;
/// Cart types and slice.
pub mod cart;
/// Checkout types, actions, and slice.
pub mod checkout;
/// Shipping consignment types and actions.
pub mod consignment;
/// Coupon types, actions, and slice.
pub mod coupon;
/// Error taxonomy.
pub mod error;
/// Gift certificate types, actions, and slice.
pub mod gift_certificate;
/// Vaulted instrument types, actions, and slice.
pub mod instrument;
/// Order types, actions, request bodies, and slice.
pub mod order;
/// Payment types, actions, and slice.
pub mod payment;
/// The state tree, root reducer, and selectors.
pub mod state;

pub use action::Action;
pub use error::{CheckoutError, MissingDataErrorType, NotInitializedErrorType, RequestError};
pub use state::CheckoutStoreState;
