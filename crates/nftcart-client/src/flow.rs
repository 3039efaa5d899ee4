//! # Child Flows
//!
//! Short-lived confirmation controllers spawned by the cart. Each one
//! reports at most one [`PendingFlowOutcome`] back to the cart through a
//! one-shot channel the cart owns the receiving end of.
//!
//! ```text
//! CartController                         DeletionConfirmationFlow
//! ──────────────                         ────────────────────────
//! request_deletion(0) ──(item, tx)────►  shown by the view
//!        │                                   │
//!   AwaitingDeletionConfirm                  ├─ confirm() ─► tx.send(ItemRemoved) + dismiss
//!        │                                   ├─ cancel()  ─► dismiss, tx dropped
//!        │                                   └─ drop      ─► tx dropped
//!        ▼
//! resolve_pending_flow() / await_pending_flow()
//! ```
//!
//! Both `confirm` and `cancel` take `self`, so a flow reports once.

use tokio::sync::oneshot;
use tracing::{debug, info};

use nftcart_core::{Item, OrderSummary, PendingFlowOutcome};

use crate::view::{CartView, ViewSlot};

// =============================================================================
// Deletion Confirmation
// =============================================================================

/// Asks the user to confirm removing one item from the cart.
#[derive(Debug)]
pub struct DeletionConfirmationFlow {
    item: Item,
    completion: oneshot::Sender<PendingFlowOutcome>,
    view: ViewSlot<dyn CartView>,
}

impl DeletionConfirmationFlow {
    pub(crate) fn new(
        item: Item,
        completion: oneshot::Sender<PendingFlowOutcome>,
        view: ViewSlot<dyn CartView>,
    ) -> Self {
        DeletionConfirmationFlow {
            item,
            completion,
            view,
        }
    }

    /// The item the user is asked about.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// User confirmed: the cart removes the item.
    pub fn confirm(self) {
        debug!(id = %self.item.id, "Deletion confirmed");
        if self
            .completion
            .send(PendingFlowOutcome::ItemRemoved(self.item))
            .is_err()
        {
            debug!("Cart no longer waiting for deletion outcome");
        }
        self.view
            .send("dismiss_presented_flow", |v| v.dismiss_presented_flow());
    }

    /// User backed out: the cart stays unchanged.
    pub fn cancel(self) {
        debug!(id = %self.item.id, "Deletion cancelled");
        self.view
            .send("dismiss_presented_flow", |v| v.dismiss_presented_flow());
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Shows the order summary and completes the purchase.
#[derive(Debug)]
pub struct CheckoutFlow {
    summary: OrderSummary,
    completion: oneshot::Sender<PendingFlowOutcome>,
    view: ViewSlot<dyn CartView>,
}

impl CheckoutFlow {
    pub(crate) fn new(
        summary: OrderSummary,
        completion: oneshot::Sender<PendingFlowOutcome>,
        view: ViewSlot<dyn CartView>,
    ) -> Self {
        CheckoutFlow {
            summary,
            completion,
            view,
        }
    }

    /// What is being bought.
    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    /// Purchase went through: the cart empties.
    pub fn confirm(self) {
        info!(
            items = self.summary.item_count,
            total = %self.summary.total,
            "Purchase completed"
        );
        if self
            .completion
            .send(PendingFlowOutcome::PurchaseCompleted)
            .is_err()
        {
            debug!("Cart no longer waiting for checkout outcome");
        }
        self.view
            .send("dismiss_presented_flow", |v| v.dismiss_presented_flow());
    }

    /// User left checkout without paying.
    pub fn cancel(self) {
        debug!("Checkout cancelled");
        self.view
            .send("dismiss_presented_flow", |v| v.dismiss_presented_flow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::NoOpView;
    use nftcart_core::{ItemCollection, Money};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct DismissCounter {
        dismissals: AtomicUsize,
    }

    impl CartView for DismissCounter {
        fn toggle_empty_state(&self, _is_empty: bool) {}
        fn refresh_totals(&self) {}
        fn refresh_list(&self) {}
        fn present_deletion_confirm(&self, _item: &Item) {}
        fn present_checkout(&self, _summary: &OrderSummary) {}
        fn dismiss_presented_flow(&self) {
            self.dismissals.fetch_add(1, Ordering::SeqCst);
        }
        fn present_sort_options(&self) {}
    }

    fn april() -> Item {
        Item::priced("1", "April", "april.png", 1, Money::from_cents(180))
    }

    #[test]
    fn test_deletion_confirm_sends_outcome_and_dismisses() {
        let view = Arc::new(DismissCounter::default());
        let as_dyn: Arc<dyn CartView> = view.clone();
        let mut slot = ViewSlot::empty();
        slot.attach(&as_dyn);

        let (tx, mut rx) = oneshot::channel();
        let flow = DeletionConfirmationFlow::new(april(), tx, slot);
        assert_eq!(flow.item().display_name, "April");
        flow.confirm();

        assert_eq!(rx.try_recv().unwrap(), PendingFlowOutcome::ItemRemoved(april()));
        assert_eq!(view.dismissals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deletion_cancel_closes_channel() {
        let (tx, mut rx) = oneshot::channel();
        DeletionConfirmationFlow::new(april(), tx, ViewSlot::empty()).cancel();

        assert_eq!(rx.try_recv(), Err(oneshot::error::TryRecvError::Closed));
    }

    #[test]
    fn test_checkout_confirm_survives_dropped_receiver() {
        let view: Arc<dyn CartView> = Arc::new(NoOpView);
        let mut slot = ViewSlot::empty();
        slot.attach(&view);

        let summary = ItemCollection::from_items([april()])
            .unwrap()
            .order_summary(chrono::Utc::now());
        let (tx, rx) = oneshot::channel();
        drop(rx);

        let flow = CheckoutFlow::new(summary, tx, slot);
        assert_eq!(flow.summary().total, Money::from_cents(180));
        flow.confirm();
    }
}
