//! Cart types and the derived cart total.

use serde::{Deserialize, Serialize};

use super::id::{CartItemId, ProductId};
use super::price::Price;

/// A cart line as returned by `GET /api/carrito`.
///
/// Display fields are denormalized from the product by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    #[serde(rename = "producto_id", default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

impl CartItem {
    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Body of `POST /api/carrito`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewCartItem {
    pub producto_id: ProductId,
    pub cantidad: u32,
}

impl NewCartItem {
    /// A single unit of `product_id`.
    #[must_use]
    pub const fn single(product_id: ProductId) -> Self {
        Self {
            producto_id: product_id,
            cantidad: 1,
        }
    }
}

/// Body of `PUT /api/carrito/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartItemUpdate {
    pub cantidad: u32,
}

/// Sum of `price × quantity` over all items.
#[must_use]
pub fn cart_total(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}
