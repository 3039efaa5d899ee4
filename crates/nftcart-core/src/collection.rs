//! # Item Collection
//!
//! The ordered list of items a controller owns and the user sees.
//!
//! ## Collection Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Collection Operations                                │
//! │                                                                         │
//! │  Trigger                    Operation             Change               │
//! │  ───────                    ─────────             ──────               │
//! │                                                                         │
//! │  Cart screen created ─────► from_items() ───────► seed list            │
//! │                                                                         │
//! │  Fetch result arrives ────► append() ───────────► items.push(item)     │
//! │                                                                         │
//! │  Sort chooser ────────────► sort_by() ──────────► stable reorder       │
//! │                                                                         │
//! │  Delete confirmed ────────► remove_by_id() ─────► items.retain(..)     │
//! │                                                                         │
//! │  Purchase completed ──────► clear() ────────────► items.clear()        │
//! │                                                                         │
//! │  Row rendering ───────────► item_at() ──────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Rules
//! - Sorting is stable: equal keys keep their previous relative order.
//! - Items missing the sorted field (price or rating) always go last,
//!   whatever the direction, so the order is total.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Item, OrderSummary, SortCriterion, SortDirection};

/// Ordered, ID-unique list of items.
///
/// ## Invariants
/// - No two items share an `id`
/// - Order only changes through `sort_by*`, `append`, `remove_by_id`, `clear`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCollection {
    items: Vec<Item>,
}

impl ItemCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        ItemCollection { items: Vec::new() }
    }

    /// Creates a collection from a seed list, keeping its order.
    ///
    /// Fails on the first repeated ID.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> CoreResult<Self> {
        let mut collection = ItemCollection::new();
        for item in items {
            collection.append(item)?;
        }
        Ok(collection)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the number of items.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range. Rows are only ever requested for
    /// indices below [`count`](Self::count), so a bad index is a caller bug.
    pub fn item_at(&self, index: usize) -> &Item {
        let len = self.items.len();
        self.items.get(index).unwrap_or_else(|| {
            panic!("item index {index} out of range for collection of {len} items")
        })
    }

    /// Returns the item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Checks whether an item with this ID is present.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Returns the index of the item with this ID.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    /// Iterates over the items in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Returns the items in display order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the IDs in display order.
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    /// Sum of all present prices. Absent prices count as zero.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(Item::price_or_zero).sum()
    }

    /// Builds the confirmation data for a checkout of the whole collection,
    /// stamped with the caller's `created_at`.
    pub fn order_summary(&self, created_at: DateTime<Utc>) -> OrderSummary {
        OrderSummary {
            item_ids: self.ids(),
            item_count: self.count(),
            total: self.total_price(),
            created_at,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds an item at the end.
    ///
    /// ## Behavior
    /// - New ID: pushed after the current last item
    /// - Existing ID: rejected with `DuplicateItem`, collection unchanged
    pub fn append(&mut self, item: Item) -> CoreResult<()> {
        if self.contains(&item.id) {
            return Err(CoreError::DuplicateItem(item.id));
        }
        self.items.push(item);
        Ok(())
    }

    /// Removes the item with this ID and returns it.
    ///
    /// Removing an absent ID is a no-op and returns `None`.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Item> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sorts ascending by `criterion`.
    pub fn sort_by(&mut self, criterion: SortCriterion) {
        self.sort_by_with(criterion, SortDirection::Ascending);
    }

    /// Sorts by `criterion` in `direction`.
    ///
    /// Uses the stable `slice::sort_by`, so ties keep their prior order.
    pub fn sort_by_with(&mut self, criterion: SortCriterion, direction: SortDirection) {
        self.items
            .sort_by(|a, b| compare_items(a, b, criterion, direction));
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Comparators
// =============================================================================

/// Total order over items for one criterion and direction.
fn compare_items(a: &Item, b: &Item, criterion: SortCriterion, direction: SortDirection) -> Ordering {
    match criterion {
        SortCriterion::Price => compare_present(a.price, b.price, direction),
        SortCriterion::Rating => compare_present(a.rating, b.rating, direction),
        SortCriterion::Name => directed(a.display_name.cmp(&b.display_name), direction),
    }
}

/// Compares optional keys with missing values last in either direction.
fn compare_present<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_cart() -> ItemCollection {
        ItemCollection::from_items(vec![
            Item::priced("1", "April", "MockNFTCard1", 1, Money::from_cents(180)),
            Item::priced("2", "Betty", "MockNFTCard2", 5, Money::from_cents(179)),
            Item::priced("3", "Chloe", "MockNFTCard3", 3, Money::from_cents(150)),
        ])
        .unwrap()
    }

    fn permutations(items: Vec<Item>) -> Vec<Vec<Item>> {
        if items.len() <= 1 {
            return vec![items];
        }
        let mut result = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.clone();
            let head = rest.remove(i);
            for mut tail in permutations(rest) {
                tail.insert(0, head.clone());
                result.push(tail);
            }
        }
        result
    }

    fn ids(collection: &ItemCollection) -> Vec<&str> {
        collection.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_price_is_non_decreasing_for_every_permutation() {
        let base = vec![
            Item::priced("a", "A", "img", 2, Money::from_cents(300)),
            Item::priced("b", "B", "img", 4, Money::from_cents(100)),
            Item::priced("c", "C", "img", 1, Money::from_cents(200)),
            Item::priced("d", "D", "img", 3, Money::from_cents(100)),
        ];

        for permutation in permutations(base) {
            let mut collection = ItemCollection::from_items(permutation).unwrap();
            collection.sort_by(SortCriterion::Price);

            let prices: Vec<i64> = collection.iter().map(|i| i.price_or_zero().cents()).collect();
            assert!(prices.windows(2).all(|w| w[0] <= w[1]), "{prices:?}");

            let once = collection.clone();
            collection.sort_by(SortCriterion::Price);
            assert_eq!(collection, once);
        }
    }

    #[test]
    fn test_sort_keeps_tie_order() {
        let mut collection = ItemCollection::from_items(vec![
            Item::priced("x", "X", "img", 3, Money::from_cents(100)),
            Item::priced("y", "Y", "img", 3, Money::from_cents(100)),
            Item::priced("z", "Z", "img", 1, Money::from_cents(50)),
        ])
        .unwrap();

        collection.sort_by(SortCriterion::Rating);
        assert_eq!(ids(&collection), vec!["z", "x", "y"]);

        collection.sort_by_with(SortCriterion::Price, SortDirection::Descending);
        assert_eq!(ids(&collection), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_sort_seed_cart_by_each_criterion() {
        let mut cart = seed_cart();

        cart.sort_by(SortCriterion::Price);
        assert_eq!(ids(&cart), vec!["3", "2", "1"]);

        cart.sort_by(SortCriterion::Rating);
        assert_eq!(ids(&cart), vec!["1", "3", "2"]);

        cart.sort_by(SortCriterion::Name);
        assert_eq!(ids(&cart), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_missing_fields_sort_last_in_both_directions() {
        let mut collection = ItemCollection::from_items(vec![
            Item::new("none", "Nil", "img"),
            Item::new("cheap", "Cheap", "img").with_price(Money::from_cents(10)),
            Item::new("rated", "Rated", "img").with_rating(4),
            Item::new("dear", "Dear", "img").with_price(Money::from_cents(990)),
        ])
        .unwrap();

        collection.sort_by(SortCriterion::Price);
        assert_eq!(ids(&collection), vec!["cheap", "dear", "none", "rated"]);

        collection.sort_by_with(SortCriterion::Price, SortDirection::Descending);
        assert_eq!(ids(&collection), vec!["dear", "cheap", "none", "rated"]);

        collection.sort_by_with(SortCriterion::Rating, SortDirection::Descending);
        assert_eq!(ids(&collection), vec!["rated", "dear", "cheap", "none"]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut cart = seed_cart();

        let removed = cart.remove_by_id("2").unwrap();
        assert_eq!(removed.display_name, "Betty");
        assert_eq!(cart.count(), 2);
        assert!(!cart.contains("2"));

        let before = cart.clone();
        assert!(cart.remove_by_id("2").is_none());
        assert!(cart.remove_by_id("missing").is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear() {
        let mut cart = seed_cart();
        cart.clear();
        assert_eq!(cart.count(), 0);
        assert!(cart.is_empty());

        cart.clear();
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_total_price() {
        let cart = seed_cart();
        assert_eq!(cart.total_price().cents(), 509);
        assert!((cart.total_price().as_decimal() - 5.09).abs() < 1e-9);

        let mut partial = ItemCollection::new();
        partial.append(Item::new("u", "Unpriced", "img")).unwrap();
        partial
            .append(Item::new("p", "Priced", "img").with_price(Money::from_cents(42)))
            .unwrap();
        assert_eq!(partial.total_price().cents(), 42);
    }

    #[test]
    fn test_total_price_saturates_instead_of_overflowing() {
        let mut cart = ItemCollection::new();
        cart.append(Item::new("a", "Whale", "img").with_price(Money::from_cents(i64::MAX)))
            .unwrap();
        cart.append(Item::new("b", "Shark", "img").with_price(Money::from_cents(i64::MAX / 2)))
            .unwrap();
        assert_eq!(cart.total_price().cents(), i64::MAX);
    }

    #[test]
    fn test_append_rejects_duplicate_id() {
        let mut cart = seed_cart();
        let err = cart
            .append(Item::new("1", "Impostor", "img"))
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateItem(id) if id == "1"));
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.item_at(0).display_name, "April");
    }

    #[test]
    fn test_from_items_rejects_duplicates() {
        let result = ItemCollection::from_items(vec![
            Item::new("1", "A", "img"),
            Item::new("1", "B", "img"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_item_at_out_of_range_panics() {
        let cart = seed_cart();
        let _ = cart.item_at(3);
    }

    #[test]
    fn test_order_summary() {
        let cart = seed_cart();
        let at = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let summary = cart.order_summary(at);
        assert_eq!(summary.created_at, at);
        assert_eq!(summary.item_ids, vec!["1", "2", "3"]);
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total.cents(), 509);
    }
}
