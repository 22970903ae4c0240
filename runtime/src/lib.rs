//! # Storefront Checkout Runtime
//!
//! The store runtime and action creators for the storefront checkout
//! library.
//!
//! ## Core Components
//!
//! - **Store**: owns the state tree and serializes reduction of dispatched
//!   action streams
//! - **Action creators**: build cold [`ActionStream`]s over the network
//!   collaborator traits in [`client`]
//! - **State accessor**: a read-only handle compound streams use to resolve
//!   state lazily mid-stream
//!
//! ## Example
//!
//! ```ignore
//! use storefront_checkout_core::state::CheckoutStoreState;
//! use storefront_checkout_runtime::{CheckoutStore, OrderActionCreator, RequestOptions};
//!
//! let store = CheckoutStore::new(CheckoutStoreState::default());
//! let orders = OrderActionCreator::new(client, validator);
//!
//! let state = store
//!     .dispatch(orders.submit_order(payload, store.accessor(), RequestOptions::default()))
//!     .await?;
//!
//! assert!(state.order().is_some());
//! ```

use std::pin::Pin;

use futures::Stream;
use storefront_checkout_core::action::Action;
use storefront_checkout_core::error::CheckoutError;

/// Network collaborator contracts.
pub mod client;

/// Order action creators.
pub mod order;

/// Payment action creator.
pub mod payment;

/// The checkout store and state accessor.
pub mod store;

/// A cold stream of lifecycle actions for one checkout operation.
///
/// Items are the actions to reduce, in order. A failing operation yields its
/// `*Failed` action as a regular item and then terminates the stream with
/// the error, so the failure is reduced into state before it propagates.
/// Nothing in a compound stream past the failure point ever runs.
pub type ActionStream = Pin<Box<dyn Stream<Item = Result<Action, CheckoutError>> + Send>>;

pub use client::{
    CheckoutClient, CheckoutValidator, OrderResponseBody, PaymentClient, RequestOptions, Response,
    ResponseHeaders,
};
pub use order::{map_to_order_request_body, OrderActionCreator};
pub use payment::PaymentActionCreator;
pub use store::{CheckoutStore, StateAccessor};
