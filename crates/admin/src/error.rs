//! Admin editor error type.

use thiserror::Error;

use tienda_client::{ApiError, StorageError};
use tienda_core::{DraftError, ProductId};
use tienda_storefront::StorefrontError;

/// Errors from the admin catalog editor.
///
/// Like the storefront controllers, the editor logs these where they happen
/// and leaves its state (catalog and open modal) as it was.
#[derive(Debug, Error)]
pub enum EditorError {
    /// API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Client-side storage could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The product form is incomplete or invalid.
    #[error("Invalid product: {0}")]
    Draft(#[from] DraftError),

    /// No bearer token is stored.
    #[error("Not signed in")]
    NotSignedIn,

    /// The product is not in the loaded catalog.
    #[error("Product {0} not found")]
    NotFound(ProductId),
}

impl From<StorefrontError> for EditorError {
    fn from(err: StorefrontError) -> Self {
        match err {
            StorefrontError::Api(e) => Self::Api(e),
            StorefrontError::Storage(e) => Self::Storage(e),
            StorefrontError::NotSignedIn => Self::NotSignedIn,
        }
    }
}

/// Result type alias for `EditorError`.
pub type Result<T> = std::result::Result<T, EditorError>;
