//! # View Boundary
//!
//! Signals the controllers emit towards the UI layer, and the non-owning
//! handle they emit them through.
//!
//! ## Signal Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         View Signals                                    │
//! │                                                                         │
//! │  CartController ──► ViewSlot<dyn CartView> ──► (weak) ──► cart screen  │
//! │  Child flows ─────► ViewSlot<dyn CartView> ──► (weak) ──► cart screen  │
//! │  CollectionCtrl ──► ViewSlot<dyn CollectionView> ──► my-NFTs screen    │
//! │                                                                         │
//! │  The screen owns itself. Controllers only hold a Weak handle, so a     │
//! │  screen torn down mid-fetch turns every later signal into a no-op.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Weak};
use tracing::trace;

use nftcart_core::{Item, OrderSummary};

// =============================================================================
// View Traits
// =============================================================================

/// Render signals for the cart screen.
pub trait CartView: Send + Sync {
    /// Shows or hides the "cart is empty" placeholder.
    fn toggle_empty_state(&self, is_empty: bool);

    /// Re-reads item count and total price.
    fn refresh_totals(&self);

    /// Re-reads every row.
    fn refresh_list(&self);

    /// Presents the deletion confirmation for this item.
    fn present_deletion_confirm(&self, item: &Item);

    /// Presents the checkout screen for this order.
    fn present_checkout(&self, summary: &OrderSummary);

    /// Dismisses whichever child flow is on screen.
    fn dismiss_presented_flow(&self);

    /// Presents the price/rating/name chooser.
    fn present_sort_options(&self);
}

/// Render signals for the owned-collection screen.
pub trait CollectionView: Send + Sync {
    /// Shows or hides the "no NFTs yet" placeholder.
    fn toggle_empty_state(&self, is_empty: bool);

    /// Re-reads every row.
    fn refresh_list(&self);

    /// Presents the price/rating/name chooser.
    fn present_sort_options(&self);
}

/// View that ignores every signal. Useful for headless controllers.
pub struct NoOpView;

impl CartView for NoOpView {
    fn toggle_empty_state(&self, _is_empty: bool) {}
    fn refresh_totals(&self) {}
    fn refresh_list(&self) {}
    fn present_deletion_confirm(&self, _item: &Item) {}
    fn present_checkout(&self, _summary: &OrderSummary) {}
    fn dismiss_presented_flow(&self) {}
    fn present_sort_options(&self) {}
}

impl CollectionView for NoOpView {
    fn toggle_empty_state(&self, _is_empty: bool) {}
    fn refresh_list(&self) {}
    fn present_sort_options(&self) {}
}

// =============================================================================
// View Slot
// =============================================================================

/// Non-owning handle to a view.
///
/// Signals sent while nothing is attached, or after the view was dropped,
/// are silently discarded. They are never queued.
pub struct ViewSlot<V: ?Sized> {
    view: Option<Weak<V>>,
}

impl<V: ?Sized> ViewSlot<V> {
    /// Creates a slot with no view attached.
    pub fn empty() -> Self {
        ViewSlot { view: None }
    }

    /// Binds the slot to `view` without taking ownership.
    pub fn attach(&mut self, view: &Arc<V>) {
        self.view = Some(Arc::downgrade(view));
    }

    /// Unbinds the slot.
    pub fn detach(&mut self) {
        self.view = None;
    }

    /// Returns true while the attached view is still alive.
    pub fn is_attached(&self) -> bool {
        self.view
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Delivers `signal` to the view if it is still alive.
    ///
    /// Returns whether the signal was delivered.
    pub fn send(&self, signal: &str, f: impl FnOnce(&V)) -> bool {
        match self.view.as_ref().and_then(Weak::upgrade) {
            Some(view) => {
                trace!(signal, "Delivering view signal");
                f(&view);
                true
            }
            None => {
                trace!(signal, "No view attached, dropping signal");
                false
            }
        }
    }
}

impl<V: ?Sized> Clone for ViewSlot<V> {
    fn clone(&self) -> Self {
        ViewSlot {
            view: self.view.clone(),
        }
    }
}

impl<V: ?Sized> std::fmt::Debug for ViewSlot<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl<V: ?Sized> Default for ViewSlot<V> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingView {
        refreshes: AtomicUsize,
    }

    impl CollectionView for CountingView {
        fn toggle_empty_state(&self, _is_empty: bool) {}
        fn refresh_list(&self) {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }
        fn present_sort_options(&self) {}
    }

    #[test]
    fn test_signals_reach_attached_view() {
        let view = Arc::new(CountingView::default());
        let mut slot: ViewSlot<dyn CollectionView> = ViewSlot::empty();
        let as_dyn: Arc<dyn CollectionView> = view.clone();
        slot.attach(&as_dyn);

        assert!(slot.is_attached());
        assert!(slot.send("refresh_list", |v| v.refresh_list()));
        assert_eq!(view.refreshes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_signals_after_drop_are_discarded() {
        let mut slot: ViewSlot<dyn CollectionView> = ViewSlot::empty();
        assert!(!slot.send("refresh_list", |v| v.refresh_list()));

        let view: Arc<dyn CollectionView> = Arc::new(CountingView::default());
        slot.attach(&view);
        drop(view);

        assert!(!slot.is_attached());
        assert!(!slot.send("refresh_list", |v| v.refresh_list()));
    }

    #[test]
    fn test_detach() {
        let view: Arc<dyn CartView> = Arc::new(NoOpView);
        let mut slot: ViewSlot<dyn CartView> = ViewSlot::default();
        slot.attach(&view);
        let copy = slot.clone();
        slot.detach();

        assert!(!slot.is_attached());
        assert!(copy.is_attached());
    }
}
