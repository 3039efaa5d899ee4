//! # Client Error Types
//!
//! Error types for controllers, persistence and fetching.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Persistence   │  │       Fetching          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  PreferenceLoad │  │  FetchFailed            │ │
//! │  │  ConfigLoad     │  │  PreferenceSave │  │  InvalidRecord          │ │
//! │  │  ConfigSave     │  │  FavoritesUpd.  │  │  MalformedRecord        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   Child flows   │  │     Domain      │                              │
//! │  │                 │  │                 │                              │
//! │  │  FlowInProgress │  │  Core(CoreError)│                              │
//! │  │  EmptyCart      │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal: controllers log persistence and fetch errors and
//! keep going with whatever state they have.

use nftcart_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    /// Failed to read the persisted sort preference.
    #[error("Failed to load sort preference: {0}")]
    PreferenceLoadFailed(String),

    /// Failed to write the sort preference.
    #[error("Failed to save sort preference: {0}")]
    PreferenceSaveFailed(String),

    /// Failed to mark or unmark a favorite.
    #[error("Failed to update favorites: {0}")]
    FavoritesUpdateFailed(String),

    // =========================================================================
    // Fetch Errors
    // =========================================================================
    /// The remote source could not deliver the item.
    #[error("Fetching item {id} failed: {reason}")]
    FetchFailed { id: String, reason: String },

    /// The remote source delivered a record that is not a valid item.
    #[error("Invalid item record: {0}")]
    InvalidRecord(#[from] ValidationError),

    /// The item document could not be decoded.
    #[error("Malformed item document: {0}")]
    MalformedRecord(String),

    // =========================================================================
    // Flow Errors
    // =========================================================================
    /// Another confirmation is already on screen.
    #[error("A {0} flow is already in progress")]
    FlowInProgress(String),

    /// Checkout requested on an empty cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Collection invariant violated.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedRecord(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if this error came from retrieving a remote item.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            ClientError::FetchFailed { .. }
                | ClientError::InvalidRecord(_)
                | ClientError::MalformedRecord(_)
        )
    }

    /// Returns true if this error rejected a child-flow request.
    pub fn is_flow_error(&self) -> bool {
        matches!(self, ClientError::FlowInProgress(_) | ClientError::EmptyCart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert!(ClientError::InvalidConfig("x".into()).is_config_error());
        assert!(ClientError::FetchFailed {
            id: "1".into(),
            reason: "timeout".into()
        }
        .is_fetch_error());
        assert!(ClientError::EmptyCart.is_flow_error());
        assert!(!ClientError::EmptyCart.is_fetch_error());
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::FetchFailed {
            id: "abc".into(),
            reason: "404".into(),
        };
        assert_eq!(err.to_string(), "Fetching item abc failed: 404");

        let err = ClientError::FavoritesUpdateFailed("lock poisoned".into());
        assert_eq!(err.to_string(), "Failed to update favorites: lock poisoned");

        let err = ClientError::FlowInProgress("deletion".into());
        assert_eq!(err.to_string(), "A deletion flow is already in progress");
    }

    #[test]
    fn test_validation_becomes_invalid_record() {
        let err: ClientError = ValidationError::Required {
            field: "id".into(),
        }
        .into();
        assert!(err.is_fetch_error());
    }
}
