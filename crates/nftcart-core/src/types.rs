//! # Domain Types
//!
//! Core domain types shared by the cart and the owned-collection screens.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │  SortCriterion  │   │  OrderSummary   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (string)    │   │  Price          │   │  item_ids       │       │
//! │  │  display_name   │   │  Rating         │   │  item_count     │       │
//! │  │  image_ref      │   │  Name           │   │  total (Money)  │       │
//! │  │  rating?  1..=5 │   └─────────────────┘   │  created_at     │       │
//! │  │  price?  Money  │                         └─────────────────┘       │
//! │  └─────────────────┘   ┌─────────────────┐   ┌──────────────────────┐  │
//! │                        │  SortDirection  │   │ PendingFlowOutcome   │  │
//! │                        │  Ascending      │   │ ItemRemoved(Item)    │  │
//! │                        │  Descending     │   │ PurchaseCompleted    │  │
//! │                        └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart items always carry a rating and a price. Items fetched for the
//! owned collection may lack either when the server omits them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// One tradable unit shown in the cart or in the owned collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique, stable identifier.
    pub id: String,

    /// Name shown on the row.
    pub display_name: String,

    /// Opaque reference to the artwork (URL or local asset key).
    pub image_ref: String,

    /// Rating in `MIN_RATING..=MAX_RATING`, absent if the server omitted it.
    pub rating: Option<u8>,

    /// Price, absent if the server omitted it.
    pub price: Option<Money>,
}

impl Item {
    /// Creates an item with no rating and no price.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Item {
            id: id.into(),
            display_name: display_name.into(),
            image_ref: image_ref.into(),
            rating: None,
            price: None,
        }
    }

    /// Creates a fully populated item, the shape every cart item has.
    pub fn priced(
        id: impl Into<String>,
        display_name: impl Into<String>,
        image_ref: impl Into<String>,
        rating: u8,
        price: Money,
    ) -> Self {
        Item::new(id, display_name, image_ref)
            .with_rating(rating)
            .with_price(price)
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the price.
    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    /// Price used for totals: absent counts as zero.
    #[inline]
    pub fn price_or_zero(&self) -> Money {
        self.price.unwrap_or_default()
    }
}

// =============================================================================
// Sort Criterion
// =============================================================================

/// What a list is ordered by.
///
/// Persisted as the single most recently applied value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    /// Order by price.
    Price,
    /// Order by rating.
    Rating,
    /// Order by display name (lexicographic).
    Name,
}

impl SortCriterion {
    /// All criteria, in the order the sort chooser lists them.
    pub const ALL: [SortCriterion; 3] =
        [SortCriterion::Price, SortCriterion::Rating, SortCriterion::Name];

    /// Returns the persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::Price => "price",
            SortCriterion::Rating => "rating",
            SortCriterion::Name => "name",
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" | "by_price" => Ok(SortCriterion::Price),
            "rating" | "by_rating" => Ok(SortCriterion::Rating),
            "name" | "by_name" => Ok(SortCriterion::Name),
            other => Err(format!("Unknown sort criterion: {other}")),
        }
    }
}

// =============================================================================
// Sort Direction
// =============================================================================

/// Direction applied on top of a [`SortCriterion`].
///
/// Items missing the sorted field stay at the end in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortDirection::Ascending),
            "descending" | "desc" => Ok(SortDirection::Descending),
            other => Err(format!("Unknown sort direction: {other}")),
        }
    }
}

// =============================================================================
// Child Flow Outcome
// =============================================================================

/// The single result a child flow reports back to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingFlowOutcome {
    /// The user confirmed removing this item.
    ItemRemoved(Item),
    /// The user completed the purchase of the whole cart.
    PurchaseCompleted,
}

// =============================================================================
// Order Summary
// =============================================================================

/// Confirmation data shown while checking out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Item IDs in the order the cart shows them.
    pub item_ids: Vec<String>,
    /// Number of items being purchased.
    pub item_count: usize,
    /// Sum of all item prices.
    pub total: Money,
    /// When checkout was requested.
    pub created_at: DateTime<Utc>,
}

impl OrderSummary {
    /// Builds the body an order-submission collaborator would send.
    pub fn to_payload(&self) -> OrderPayload {
        OrderPayload {
            nfts: self.item_ids.clone(),
        }
    }
}

/// Order body: the list of NFT IDs being bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub nfts: Vec<String>,
}

impl OrderPayload {
    /// Serializes the payload to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_criterion_parsing() {
        assert_eq!("price".parse::<SortCriterion>().unwrap(), SortCriterion::Price);
        assert_eq!("by_rating".parse::<SortCriterion>().unwrap(), SortCriterion::Rating);
        assert_eq!(" Name ".parse::<SortCriterion>().unwrap(), SortCriterion::Name);
        assert!("color".parse::<SortCriterion>().is_err());
    }

    #[test]
    fn test_sort_criterion_display_matches_serde() {
        for criterion in SortCriterion::ALL {
            let json = serde_json::to_string(&criterion).unwrap();
            assert_eq!(json, format!("\"{}\"", criterion));
        }
    }

    #[test]
    fn test_sort_direction_default() {
        assert_eq!(SortDirection::default(), SortDirection::Ascending);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Descending);
    }

    #[test]
    fn test_price_or_zero() {
        let unpriced = Item::new("9", "Zed", "img");
        assert!(unpriced.price_or_zero().is_zero());

        let priced = Item::priced("1", "April", "img", 1, Money::from_cents(180));
        assert_eq!(priced.price_or_zero().cents(), 180);
    }

    #[test]
    fn test_order_payload_json() {
        let summary = OrderSummary {
            item_ids: vec!["1".into(), "3".into()],
            item_count: 2,
            total: Money::from_cents(330),
            created_at: Utc::now(),
        };
        let json = summary.to_payload().to_json().unwrap();
        assert_eq!(json, r#"{"nfts":["1","3"]}"#);
    }
}
