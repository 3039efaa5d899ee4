//! # nftcart-core: Pure Cart Logic for the NFT Marketplace
//!
//! This crate holds the domain model of the cart and owned-collection
//! screens as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        nftcart Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (out of scope)                     │   │
//! │  │    Cart list ──► Delete confirm ──► Checkout ──► My NFTs       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ view signals                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    nftcart-client                               │   │
//! │  │    CartController, CollectionController, flows, fetcher        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nftcart-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ collection │  │ validation│  │   │
//! │  │   │   Item    │  │   Money   │  │ ItemColl.  │  │  records  │  │   │
//! │  │   │ SortCrit. │  │  totals   │  │ sort/remove│  │  ratings  │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO ASYNC • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, SortCriterion, OrderSummary)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`collection`] - The ordered item list owned by a controller
//! - [`error`] - Domain error types
//! - [`validation`] - Rules applied to remotely received records
//!
//! ## Example Usage
//!
//! ```rust
//! use nftcart_core::{Item, ItemCollection, Money, SortCriterion};
//!
//! let mut cart = ItemCollection::from_items(vec![
//!     Item::priced("1", "April", "MockNFTCard1", 1, Money::from_cents(180)),
//!     Item::priced("2", "Betty", "MockNFTCard2", 5, Money::from_cents(179)),
//! ])
//! .unwrap();
//!
//! cart.sort_by(SortCriterion::Price);
//! assert_eq!(cart.item_at(0).id, "2");
//! assert_eq!(cart.total_price().cents(), 359);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collection;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use collection::ItemCollection;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest rating an item can carry.
pub const MIN_RATING: u8 = 1;

/// Highest rating an item can carry.
pub const MAX_RATING: u8 = 5;

/// Maximum length of an item identifier.
pub const MAX_ITEM_ID_LEN: usize = 64;

/// Maximum length of an item display name.
pub const MAX_DISPLAY_NAME_LEN: usize = 200;
