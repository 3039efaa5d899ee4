//! # Error Types
//!
//! Domain-specific error types for nftcart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nftcart-core errors (this file)                                       │
//! │  ├── CoreError        - Collection invariant violations                │
//! │  └── ValidationError  - Remote record validation failures              │
//! │                                                                         │
//! │  nftcart-client errors (separate crate)                                │
//! │  └── ClientError      - Config, persistence, fetch, flow errors        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → logged / returned   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Out-of-range index access is NOT an error variant: it is a contract
//! violation and panics.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item with the same ID is already in the collection.
    ///
    /// ## When This Occurs
    /// - The profile lists the same NFT twice and both fetches arrive
    /// - A seed list contains a repeated ID
    #[error("Item {0} is already in the collection")]
    DuplicateItem(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Record validation errors.
///
/// Raised while turning a remote item document into an [`crate::Item`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. a price that is not a finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
