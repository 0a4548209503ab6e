//! Catalog product types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;

/// Image shown for products without an image URL.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

/// A product as returned by `GET /api/productos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Image URL to render, falling back to [`PLACEHOLDER_IMAGE`].
    #[must_use]
    pub fn image_or_placeholder(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// Product form errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// A required text field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Price is below zero.
    #[error("price cannot be negative")]
    NegativePrice,

    /// Stock is below zero.
    #[error("stock cannot be negative")]
    NegativeStock,
}

/// Body of `POST /api/productos` and `PUT /api/productos/{id}`.
///
/// Every field is required, mirroring the admin product form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: i64,
    pub image_url: String,
}

impl ProductDraft {
    /// Check the draft before it is sent to the API.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingField("description"));
        }
        if self.image_url.trim().is_empty() {
            return Err(DraftError::MissingField("image_url"));
        }
        if self.price.is_negative() {
            return Err(DraftError::NegativePrice);
        }
        if self.stock < 0 {
            return Err(DraftError::NegativeStock);
        }
        Ok(())
    }
}

/// Pre-fill the edit form from an existing product.
impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price,
            stock: product.stock,
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }
}
