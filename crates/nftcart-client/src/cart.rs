//! # Cart Controller
//!
//! Owns the cart's item collection and drives the cart screen.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            request_deletion(i)                                          │
//! │   ┌──────┐ ─────────────────────► ┌─────────────────────────┐          │
//! │   │      │ ◄───────────────────── │ AwaitingDeletionConfirm │          │
//! │   │      │  ItemRemoved: remove   └─────────────────────────┘          │
//! │   │ Idle │  closed: unchanged                                          │
//! │   │      │                                                             │
//! │   │      │ ─────────────────────► ┌─────────────────────────┐          │
//! │   │      │ ◄───────────────────── │    AwaitingCheckout     │          │
//! │   └──────┘  PurchaseCompleted:    └─────────────────────────┘          │
//! │             clear                                                       │
//! │             closed: unchanged                                           │
//! │                                                                         │
//! │  At most one child flow at a time.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use nftcart_core::{Item, ItemCollection, Money, PendingFlowOutcome, SortCriterion};

use crate::config::CartConfig;
use crate::error::{ClientError, ClientResult};
use crate::flow::{CheckoutFlow, DeletionConfirmationFlow};
use crate::preference::{open_store, SortPreferenceStore};
use crate::view::{CartView, ViewSlot};

// =============================================================================
// State
// =============================================================================

/// Which child flow, if any, the cart is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    Idle,
    AwaitingDeletionConfirm,
    AwaitingCheckout,
}

impl CartState {
    fn flow_name(&self) -> &'static str {
        match self {
            CartState::Idle => "idle",
            CartState::AwaitingDeletionConfirm => "deletion",
            CartState::AwaitingCheckout => "checkout",
        }
    }
}

enum PendingFlow {
    None,
    Deletion {
        item_id: String,
        outcome: oneshot::Receiver<PendingFlowOutcome>,
    },
    Checkout {
        outcome: oneshot::Receiver<PendingFlowOutcome>,
    },
}

impl PendingFlow {
    fn kind(&self) -> CartState {
        match self {
            PendingFlow::None => CartState::Idle,
            PendingFlow::Deletion { .. } => CartState::AwaitingDeletionConfirm,
            PendingFlow::Checkout { .. } => CartState::AwaitingCheckout,
        }
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Cart screen controller.
pub struct CartController {
    collection: ItemCollection,
    preferences: Arc<dyn SortPreferenceStore>,
    default_sort: Option<SortCriterion>,
    view: ViewSlot<dyn CartView>,
    pending: PendingFlow,
}

impl CartController {
    /// Creates a controller over `seed` sharing `preferences`.
    pub fn new(seed: ItemCollection, preferences: Arc<dyn SortPreferenceStore>) -> Self {
        CartController {
            collection: seed,
            preferences,
            default_sort: None,
            view: ViewSlot::empty(),
            pending: PendingFlow::None,
        }
    }

    /// Creates a controller whose preference store and default sort come
    /// from configuration.
    pub fn from_config(seed: ItemCollection, config: &CartConfig) -> Self {
        Self::new(seed, open_store(&config.preferences))
            .with_default_sort(config.preferences.default_sort)
    }

    /// Criterion applied when no preference was ever saved.
    pub fn with_default_sort(mut self, criterion: Option<SortCriterion>) -> Self {
        self.default_sort = criterion;
        self
    }

    // =========================================================================
    // View Binding
    // =========================================================================

    /// Binds the cart screen without owning it.
    pub fn attach(&mut self, view: &Arc<dyn CartView>) {
        self.view.attach(view);
    }

    pub fn detach(&mut self) {
        self.view.detach();
    }

    /// Screen is about to appear: applies the saved sort and renders.
    pub fn on_view_will_appear(&mut self) {
        let criterion = match self.preferences.load() {
            Ok(saved) => saved.or(self.default_sort),
            Err(e) => {
                warn!(error = %e, "Failed to load sort preference");
                self.default_sort
            }
        };

        if let Some(criterion) = criterion {
            if !self.collection.is_empty() {
                debug!(%criterion, "Applying sort preference");
                self.collection.sort_by(criterion);
            }
        }

        let is_empty = self.collection.is_empty();
        self.view
            .send("toggle_empty_state", |v| v.toggle_empty_state(is_empty));
        self.signal_update();
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Sorts the cart, remembers the choice and re-renders.
    pub fn request_sort(&mut self, criterion: SortCriterion) {
        debug!(%criterion, "Sorting cart");
        self.collection.sort_by(criterion);

        if let Err(e) = self.preferences.save(criterion) {
            warn!(%criterion, error = %e, "Failed to save sort preference");
        }

        self.signal_update();
    }

    /// Asks the view to show the sort chooser.
    pub fn request_sort_options(&self) {
        self.view
            .send("present_sort_options", |v| v.present_sort_options());
    }

    // =========================================================================
    // Child Flows
    // =========================================================================

    /// Starts the deletion confirmation for the item at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn request_deletion(&mut self, index: usize) -> ClientResult<DeletionConfirmationFlow> {
        let item = self.collection.item_at(index).clone();
        self.ensure_idle()?;

        let (tx, rx) = oneshot::channel();
        self.pending = PendingFlow::Deletion {
            item_id: item.id.clone(),
            outcome: rx,
        };

        debug!(id = %item.id, index, "Requesting deletion confirmation");
        self.view
            .send("present_deletion_confirm", |v| v.present_deletion_confirm(&item));

        Ok(DeletionConfirmationFlow::new(item, tx, self.view.clone()))
    }

    /// Starts checkout for the whole cart.
    pub fn request_checkout(&mut self) -> ClientResult<CheckoutFlow> {
        self.ensure_idle()?;
        if self.collection.is_empty() {
            return Err(ClientError::EmptyCart);
        }

        let summary = self.collection.order_summary(Utc::now());
        let (tx, rx) = oneshot::channel();
        self.pending = PendingFlow::Checkout { outcome: rx };

        info!(
            items = summary.item_count,
            total = %summary.total,
            "Starting checkout"
        );
        self.view
            .send("present_checkout", |v| v.present_checkout(&summary));

        Ok(CheckoutFlow::new(summary, tx, self.view.clone()))
    }

    /// Applies a child flow's outcome and returns to `Idle`.
    pub fn on_child_outcome(&mut self, outcome: PendingFlowOutcome) {
        let expected = std::mem::replace(&mut self.pending, PendingFlow::None);

        match outcome {
            PendingFlowOutcome::ItemRemoved(item) => {
                match &expected {
                    PendingFlow::Deletion { item_id, .. } if *item_id == item.id => {}
                    other => warn!(
                        id = %item.id,
                        state = other.kind().flow_name(),
                        "Deletion outcome does not match pending flow"
                    ),
                }

                match self.collection.remove_by_id(&item.id) {
                    Some(removed) => info!(id = %removed.id, "Item removed from cart"),
                    None => debug!(id = %item.id, "Item already gone from cart"),
                }
            }
            PendingFlowOutcome::PurchaseCompleted => {
                if expected.kind() != CartState::AwaitingCheckout {
                    warn!(
                        state = expected.kind().flow_name(),
                        "Purchase outcome does not match pending flow"
                    );
                }
                info!(items = self.collection.count(), "Clearing cart after purchase");
                self.collection.clear();
            }
        }

        if self.collection.is_empty() {
            self.view
                .send("toggle_empty_state", |v| v.toggle_empty_state(true));
        }
        self.signal_update();
    }

    /// Polls the pending flow without waiting.
    ///
    /// Returns the applied outcome, if one was delivered. A flow that was
    /// cancelled or dropped returns the cart to `Idle` unchanged; one that
    /// is still open stays pending.
    pub fn resolve_pending_flow(&mut self) -> Option<PendingFlowOutcome> {
        let received = match &mut self.pending {
            PendingFlow::None => return None,
            PendingFlow::Deletion { outcome, .. } | PendingFlow::Checkout { outcome } => {
                outcome.try_recv()
            }
        };

        match received {
            Ok(outcome) => {
                self.on_child_outcome(outcome.clone());
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                self.abandon_pending_flow();
                None
            }
        }
    }

    /// Waits until the pending flow confirms, cancels or is dropped.
    pub async fn await_pending_flow(&mut self) -> Option<PendingFlowOutcome> {
        let received = match &mut self.pending {
            PendingFlow::None => return None,
            PendingFlow::Deletion { outcome, .. } | PendingFlow::Checkout { outcome } => {
                outcome.await
            }
        };

        match received {
            Ok(outcome) => {
                self.on_child_outcome(outcome.clone());
                Some(outcome)
            }
            Err(_) => {
                self.abandon_pending_flow();
                None
            }
        }
    }

    fn abandon_pending_flow(&mut self) {
        let previous = std::mem::replace(&mut self.pending, PendingFlow::None);
        debug!(
            flow = previous.kind().flow_name(),
            "Child flow closed without outcome"
        );
    }

    fn ensure_idle(&self) -> ClientResult<()> {
        match self.pending.kind() {
            CartState::Idle => Ok(()),
            busy => Err(ClientError::FlowInProgress(busy.flow_name().to_string())),
        }
    }

    fn signal_update(&self) {
        self.view.send("refresh_totals", |v| v.refresh_totals());
        self.view.send("refresh_list", |v| v.refresh_list());
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> CartState {
        self.pending.kind()
    }

    pub fn total_price(&self) -> Money {
        self.collection.total_price()
    }

    pub fn item_count(&self) -> usize {
        self.collection.count()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn item_at(&self, index: usize) -> &Item {
        self.collection.item_at(index)
    }

    pub fn items(&self) -> &[Item] {
        self.collection.items()
    }
}

/// The three items the cart screen starts with until a cart endpoint exists.
pub fn demo_cart_items() -> Vec<Item> {
    vec![
        Item::priced(
            "1",
            "April",
            "https://code.s3.yandex.net/Mobile/iOS/NFT/Pink/April/1.png",
            1,
            Money::from_cents(180),
        ),
        Item::priced(
            "2",
            "Betty",
            "https://code.s3.yandex.net/Mobile/iOS/NFT/Pink/Betty/1.png",
            5,
            Money::from_cents(179),
        ),
        Item::priced(
            "3",
            "Chloe",
            "https://code.s3.yandex.net/Mobile/iOS/NFT/Pink/Chloe/1.png",
            3,
            Money::from_cents(150),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::MemorySortPreferenceStore;
    use nftcart_core::OrderSummary;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingView {
        events: Mutex<Vec<String>>,
    }

    impl RecordingView {
        fn record(&self, event: impl Into<String>) {
            self.events.lock().unwrap().push(event.into());
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn count(&self, event: &str) -> usize {
            self.events().iter().filter(|e| *e == event).count()
        }
    }

    impl CartView for RecordingView {
        fn toggle_empty_state(&self, is_empty: bool) {
            self.record(format!("empty:{}", is_empty));
        }
        fn refresh_totals(&self) {
            self.record("totals");
        }
        fn refresh_list(&self) {
            self.record("list");
        }
        fn present_deletion_confirm(&self, item: &Item) {
            self.record(format!("confirm:{}", item.display_name));
        }
        fn present_checkout(&self, summary: &OrderSummary) {
            self.record(format!("checkout:{}", summary.item_count));
        }
        fn dismiss_presented_flow(&self) {
            self.record("dismiss");
        }
        fn present_sort_options(&self) {
            self.record("sort_options");
        }
    }

    fn seeded(store: Arc<dyn SortPreferenceStore>) -> (CartController, Arc<RecordingView>) {
        let seed = ItemCollection::from_items(demo_cart_items()).unwrap();
        let mut controller = CartController::new(seed, store);
        let view = Arc::new(RecordingView::default());
        let as_dyn: Arc<dyn CartView> = view.clone();
        controller.attach(&as_dyn);
        (controller, view)
    }

    fn names(controller: &CartController) -> Vec<&str> {
        controller
            .items()
            .iter()
            .map(|item| item.display_name.as_str())
            .collect()
    }

    #[test]
    fn test_confirmed_deletion_removes_item() {
        let (mut cart, view) = seeded(Arc::new(MemorySortPreferenceStore::new()));

        let flow = cart.request_deletion(0).unwrap();
        assert_eq!(cart.state(), CartState::AwaitingDeletionConfirm);
        assert_eq!(view.count("confirm:April"), 1);

        flow.confirm();
        let outcome = cart.resolve_pending_flow();

        assert!(matches!(outcome, Some(PendingFlowOutcome::ItemRemoved(_))));
        assert_eq!(cart.item_count(), 2);
        assert!(cart.items().iter().all(|item| item.id != "1"));
        assert_eq!(cart.state(), CartState::Idle);
        assert_eq!(cart.total_price(), Money::from_cents(329));
        assert_eq!(view.count("dismiss"), 1);
        assert_eq!(view.count("empty:true"), 0);
    }

    #[tokio::test]
    async fn test_checkout_clears_cart() {
        let (mut cart, view) = seeded(Arc::new(MemorySortPreferenceStore::new()));

        let before = Utc::now();
        let flow = cart.request_checkout().unwrap();
        assert_eq!(flow.summary().total, Money::from_cents(509));
        assert!(flow.summary().created_at >= before);
        assert!(flow.summary().created_at <= Utc::now());
        assert_eq!(cart.state(), CartState::AwaitingCheckout);

        flow.confirm();
        let outcome = cart.await_pending_flow().await;

        assert_eq!(outcome, Some(PendingFlowOutcome::PurchaseCompleted));
        assert_eq!(cart.item_count(), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.state(), CartState::Idle);
        assert_eq!(view.count("empty:true"), 1);
        assert!(view.events().ends_with(&["totals".to_string(), "list".to_string()]));
    }

    #[tokio::test]
    async fn test_cancelled_or_dropped_flow_leaves_cart_unchanged() {
        let (mut cart, _view) = seeded(Arc::new(MemorySortPreferenceStore::new()));

        cart.request_checkout().unwrap().cancel();
        assert_eq!(cart.await_pending_flow().await, None);
        assert_eq!(cart.state(), CartState::Idle);
        assert_eq!(cart.item_count(), 3);

        let flow = cart.request_deletion(2).unwrap();
        drop(flow);
        assert_eq!(cart.resolve_pending_flow(), None);
        assert_eq!(cart.state(), CartState::Idle);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_open_flow_stays_pending() {
        let (mut cart, _view) = seeded(Arc::new(MemorySortPreferenceStore::new()));

        let _flow = cart.request_deletion(1).unwrap();
        assert_eq!(cart.resolve_pending_flow(), None);
        assert_eq!(cart.state(), CartState::AwaitingDeletionConfirm);

        let err = cart.request_checkout().unwrap_err();
        assert!(matches!(err, ClientError::FlowInProgress(ref kind) if kind == "deletion"));
        assert!(cart.request_deletion(0).unwrap_err().is_flow_error());
    }

    #[test]
    fn test_checkout_on_empty_cart() {
        let mut cart = CartController::new(
            ItemCollection::new(),
            Arc::new(MemorySortPreferenceStore::new()),
        );
        assert!(matches!(cart.request_checkout(), Err(ClientError::EmptyCart)));
        assert_eq!(cart.state(), CartState::Idle);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_deletion_of_missing_index_panics() {
        let (mut cart, _view) = seeded(Arc::new(MemorySortPreferenceStore::new()));
        let _ = cart.request_deletion(3);
    }

    #[test]
    fn test_saved_preference_applied_on_appear() {
        let (mut cart, view) = seeded(Arc::new(MemorySortPreferenceStore::with_value(
            SortCriterion::Price,
        )));

        cart.on_view_will_appear();

        assert_eq!(names(&cart), vec!["Chloe", "Betty", "April"]);
        assert_eq!(view.events(), vec!["empty:false", "totals", "list"]);
    }

    #[test]
    fn test_unset_preference_keeps_seed_order() {
        let (mut cart, _view) = seeded(Arc::new(MemorySortPreferenceStore::new()));
        cart.on_view_will_appear();
        assert_eq!(names(&cart), vec!["April", "Betty", "Chloe"]);

        let (cart, _view) = seeded(Arc::new(MemorySortPreferenceStore::new()));
        let mut cart = cart.with_default_sort(Some(SortCriterion::Rating));
        cart.on_view_will_appear();
        assert_eq!(names(&cart), vec!["April", "Chloe", "Betty"]);
    }

    #[test]
    fn test_request_sort_persists_across_controllers() {
        let store: Arc<dyn SortPreferenceStore> = Arc::new(MemorySortPreferenceStore::new());

        let (mut first, _view) = seeded(store.clone());
        first.request_sort(SortCriterion::Price);
        first.request_sort(SortCriterion::Rating);
        assert_eq!(names(&first), vec!["April", "Chloe", "Betty"]);

        let (mut second, _view) = seeded(store.clone());
        second.on_view_will_appear();
        assert_eq!(names(&second), vec!["April", "Chloe", "Betty"]);
        assert_eq!(store.load().unwrap(), Some(SortCriterion::Rating));
    }

    #[test]
    fn test_signals_without_view_are_tolerated() {
        let (mut cart, view) = seeded(Arc::new(MemorySortPreferenceStore::new()));
        drop(view);

        cart.request_sort_options();
        let flow = cart.request_deletion(0).unwrap();
        flow.confirm();
        cart.resolve_pending_flow();
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_request_sort_options() {
        let (cart, view) = seeded(Arc::new(MemorySortPreferenceStore::new()));
        cart.request_sort_options();
        assert_eq!(view.events(), vec!["sort_options"]);
    }
}
