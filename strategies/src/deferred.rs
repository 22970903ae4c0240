//! Single-slot bridge between widget push callbacks and strategy awaits.
//!
//! Payment widgets deliver results by firing callbacks; strategies need to
//! await them. A [`DeferredSlot`] holds at most one outstanding request at
//! a time: opening a new one preempts the previous pending request by
//! rejecting it with [`CheckoutError::Timeout`], which is the only
//! cancellation primitive in the system. Settling with no outstanding slot
//! is an internal sequencing bug and reports [`CheckoutError::Standard`].

use storefront_checkout_core::error::CheckoutError;
use tokio::sync::{oneshot, Mutex};

type Settlement<T> = Result<T, CheckoutError>;

/// A pending settlement, resolved by awaiting it.
pub struct Pending<T> {
    receiver: oneshot::Receiver<Settlement<T>>,
}

impl<T> Pending<T> {
    /// Await the settlement.
    ///
    /// # Errors
    ///
    /// Returns the rejection the slot was settled with, or
    /// [`CheckoutError::Timeout`] when the slot was cancelled or preempted
    /// before settling.
    pub async fn wait(self) -> Result<T, CheckoutError> {
        self.receiver
            .await
            .unwrap_or(Err(CheckoutError::Timeout))
    }
}

/// Single-slot deferred settlement shared between a strategy and its
/// widget callback handler.
pub struct DeferredSlot<T> {
    sender: Mutex<Option<oneshot::Sender<Settlement<T>>>>,
}

impl<T> Default for DeferredSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferredSlot<T> {
    /// An empty slot with no outstanding request.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sender: Mutex::const_new(None),
        }
    }

    /// Open a new outstanding request.
    ///
    /// An already-outstanding request is preempted: it settles with
    /// [`CheckoutError::Timeout`] before the new slot is installed.
    pub async fn open(&self) -> Pending<T> {
        let (sender, receiver) = oneshot::channel();

        let mut slot = self.sender.lock().await;
        if let Some(superseded) = slot.replace(sender) {
            tracing::debug!("preempting outstanding request");
            let _ = superseded.send(Err(CheckoutError::Timeout));
        }

        Pending { receiver }
    }

    /// Settle the outstanding request with a result.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Standard`] when no request is outstanding:
    /// a completion callback fired without a matching open.
    pub async fn settle(&self, result: Settlement<T>) -> Result<(), CheckoutError> {
        let Some(sender) = self.sender.lock().await.take() else {
            return Err(CheckoutError::Standard(
                "settlement received with no outstanding request".to_string(),
            ));
        };

        // The awaiter may have been dropped; nothing left to notify.
        let _ = sender.send(result);
        Ok(())
    }

    /// Cancel the outstanding request, if any, with
    /// [`CheckoutError::Timeout`].
    pub async fn cancel(&self) {
        if let Some(sender) = self.sender.lock().await.take() {
            let _ = sender.send(Err(CheckoutError::Timeout));
        }
    }
}
