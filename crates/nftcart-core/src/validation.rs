//! # Validation Module
//!
//! Rules applied to item records before they enter a collection.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Remote item document (JSON)                                           │
//! │       │  serde: types and field presence                               │
//! │       ▼                                                                 │
//! │  RemoteItemRecord::into_item (nftcart-client)                          │
//! │       │  THIS MODULE: id, name, rating range, price sign               │
//! │       ▼                                                                 │
//! │  ItemCollection::append                                                │
//! │          uniqueness of id                                              │
//! │                                                                         │
//! │  A record rejected here counts as a failed fetch for its ID.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart seed items are built in code and are not re-validated.

use crate::error::ValidationError;
use crate::money::{Money, MAX_PRICE_CENTS};
use crate::types::Item;
use crate::{MAX_DISPLAY_NAME_LEN, MAX_ITEM_ID_LEN, MAX_RATING, MIN_RATING};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item identifier.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_ITEM_ID_LEN` characters
///
/// ## Example
/// ```rust
/// use nftcart_core::validation::validate_item_id;
///
/// assert!(validate_item_id("d6a02bd1-1255-46cd-815b-656174c1d9c0").is_ok());
/// assert!(validate_item_id("  ").is_err());
/// ```
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.chars().count() > MAX_ITEM_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_ITEM_ID_LEN,
        });
    }

    Ok(())
}

/// Validates an item display name.
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_DISPLAY_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a raw rating and narrows it to `u8`.
///
/// ## Example
/// ```rust
/// use nftcart_core::validation::validate_rating;
///
/// assert_eq!(validate_rating(4).unwrap(), 4);
/// assert!(validate_rating(0).is_err());
/// assert!(validate_rating(6).is_err());
/// ```
pub fn validate_rating(rating: i64) -> ValidationResult<u8> {
    if rating < MIN_RATING as i64 || rating > MAX_RATING as i64 {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING as i64,
            max: MAX_RATING as i64,
            actual: rating,
        });
    }

    Ok(rating as u8)
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (free drops)
/// - Must not exceed `MAX_PRICE_CENTS`
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    if price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
            actual: price.cents(),
        });
    }

    Ok(())
}

// =============================================================================
// Item Validator
// =============================================================================

/// Validates every field of an item.
pub fn validate_item(item: &Item) -> ValidationResult<()> {
    validate_item_id(&item.id)?;
    validate_display_name(&item.display_name)?;

    if let Some(rating) = item.rating {
        validate_rating(rating as i64)?;
    }

    if let Some(price) = item.price {
        validate_price(price)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
