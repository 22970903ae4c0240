//! # Storefront Checkout Testing
//!
//! Testing utilities and helpers for the storefront checkout library.
//!
//! This crate provides:
//! - Mock implementations of every collaborator trait
//! - Shared domain fixtures
//! - A fluent assertion helper for slice reducers
//!
//! ## Example
//!
//! ```ignore
//! use storefront_checkout_testing::{fixtures, mocks};
//!
//! #[tokio::test]
//! async fn submits_an_order() {
//!     let recorder = mocks::CallRecorder::new();
//!     let client = Arc::new(mocks::InMemoryCheckoutClient::new(
//!         recorder.clone(),
//!         fixtures::order(),
//!     ));
//!     let store = CheckoutStore::new(fixtures::loaded_state());
//!
//!     // drive an action creator against the mocks…
//! }
//! ```

/// Shared domain fixtures.
pub mod fixtures;

/// Mock implementations of the collaborator traits.
pub mod mocks;


pub use reducer_test::ReducerTest;
