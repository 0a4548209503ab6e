//! Cart routes.

use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use tienda_core::{CartItem, CartItemId, CartItemUpdate, NewCartItem};

use super::{ApiClient, NoBody};
use crate::error::ApiError;

impl ApiClient {
    /// Fetch the cart owned by the token's user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the token is rejected, or the
    /// body is not a cart item list.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &SecretString) -> Result<Vec<CartItem>, ApiError> {
        self.fetch::<_, NoBody>(Method::GET, "api/carrito", Some(token), None)
            .await
    }

    /// Add a product to the cart. The created record is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token), fields(product_id = %item.producto_id))]
    pub async fn add_cart_item(
        &self,
        token: &SecretString,
        item: &NewCartItem,
    ) -> Result<(), ApiError> {
        self.execute(Method::POST, "api/carrito", Some(token), Some(item))
            .await
            .map(drop)
    }

    /// Set a cart item's quantity. The response body is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token), fields(item_id = %id, quantity = update.cantidad))]
    pub async fn update_cart_item(
        &self,
        token: &SecretString,
        id: CartItemId,
        update: &CartItemUpdate,
    ) -> Result<(), ApiError> {
        let route = format!("api/carrito/{id}");
        self.execute(Method::PUT, &route, Some(token), Some(update))
            .await
            .map(drop)
    }

    /// Remove an item from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token), fields(item_id = %id))]
    pub async fn delete_cart_item(&self, token: &SecretString, id: CartItemId) -> Result<(), ApiError> {
        let route = format!("api/carrito/{id}");
        self.execute::<NoBody>(Method::DELETE, &route, Some(token), None)
            .await
            .map(drop)
    }
}
