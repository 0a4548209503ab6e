//! Storefront error type.
//!
//! Controllers log every failure where it happens and leave their state
//! untouched; the error is handed back so the caller can decide on an exit
//! status. The only failure with a user-facing message is
//! [`StorefrontError::NotSignedIn`] on add-to-cart.

use thiserror::Error;

use tienda_client::{ApiError, StorageError};

/// Message shown when a signed-out user tries to add to the cart.
pub const SIGN_IN_TO_ADD: &str = "Please sign in to add products to your cart.";

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Client-side storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation needs a bearer token and none is stored.
    #[error("Not signed in")]
    NotSignedIn,
}

impl StorefrontError {
    /// Text to show the user, for the one error that has any.
    #[must_use]
    pub const fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::NotSignedIn => Some(SIGN_IN_TO_ADD),
            _ => None,
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
