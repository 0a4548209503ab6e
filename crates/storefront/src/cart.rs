//! Cart controller.
//!
//! The server owns the cart. Every mutation (add, increase, decrease,
//! remove) is followed by a full `GET /api/carrito`, issued only after the
//! mutation's response arrives, and the local list is replaced wholesale.
//! Mutation response bodies are never read.
//!
//! Failures are logged and leave the local items and total exactly as they
//! were.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::instrument;

use tienda_client::storage::read_token;
use tienda_client::{ApiClient, Storage};
use tienda_core::{
    CartItem, CartItemId, CartItemUpdate, LoadState, NewCartItem, Price, ProductId, cart_total,
};

use crate::error::{Result, StorefrontError};

/// Local view of the signed-in user's cart.
pub struct CartController {
    client: ApiClient,
    storage: Arc<dyn Storage>,
    items: Vec<CartItem>,
    total: Price,
    state: LoadState,
}

impl std::fmt::Debug for CartController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartController")
            .field("items", &self.items)
            .field("total", &self.total)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CartController {
    #[must_use]
    pub fn new(client: ApiClient, storage: Arc<dyn Storage>) -> Self {
        Self {
            client,
            storage,
            items: Vec::new(),
            total: Price::ZERO,
            state: LoadState::Idle,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetch the cart and recompute the total.
    ///
    /// Without a stored token no request is made and the cart is unchanged.
    ///
    /// # Errors
    ///
    /// Returns the storage or API error after logging it.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<()> {
        let Some(token) = self.token("Error fetching cart")? else {
            tracing::debug!("No stored token, skipping cart fetch");
            return Ok(());
        };

        self.state = LoadState::Loading;
        let result = self.client.get_cart(&token).await;
        self.state = LoadState::Loaded;

        match result {
            Ok(items) => {
                self.total = cart_total(&items);
                self.items = items;
                tracing::debug!(lines = self.items.len(), total = %self.total, "Cart loaded");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching cart");
                Err(e.into())
            }
        }
    }

    /// Add one unit of a product, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotSignedIn`] without issuing a request if
    /// no token is stored; otherwise the storage or API error after logging
    /// it.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&mut self, product_id: ProductId) -> Result<()> {
        let Some(token) = self.token("Error adding product to cart")? else {
            tracing::warn!("Add to cart attempted without a session");
            return Err(StorefrontError::NotSignedIn);
        };

        if let Err(e) = self
            .client
            .add_cart_item(&token, &NewCartItem::single(product_id))
            .await
        {
            tracing::error!(error = %e, "Error adding product to cart");
            return Err(e.into());
        }

        self.load().await
    }

    /// Raise an item's quantity by one, then re-fetch.
    ///
    /// Unknown items are ignored.
    ///
    /// # Errors
    ///
    /// Returns the storage or API error after logging it.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn increase(&mut self, id: CartItemId) -> Result<()> {
        let Some(quantity) = self.quantity_of(id) else {
            tracing::debug!("Increase on unknown cart item ignored");
            return Ok(());
        };

        self.set_quantity(id, quantity.saturating_add(1)).await
    }

    /// Lower an item's quantity by one, then re-fetch.
    ///
    /// At quantity 1 (or for an unknown item) nothing happens: no request is
    /// sent and local state is untouched. Removing the last unit is what
    /// [`CartController::remove`] is for.
    ///
    /// # Errors
    ///
    /// Returns the storage or API error after logging it.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn decrease(&mut self, id: CartItemId) -> Result<()> {
        match self.quantity_of(id) {
            Some(quantity) if quantity > 1 => self.set_quantity(id, quantity - 1).await,
            _ => Ok(()),
        }
    }

    /// Delete an item, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns the storage or API error after logging it.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn remove(&mut self, id: CartItemId) -> Result<()> {
        let Some(token) = self.token("Error deleting cart item")? else {
            return Err(self.signed_out("Error deleting cart item"));
        };

        if let Err(e) = self.client.delete_cart_item(&token, id).await {
            tracing::error!(error = %e, "Error deleting cart item");
            return Err(e.into());
        }

        self.load().await
    }

    /// Forget every item and reset the total, without touching the server.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Price::ZERO;
        self.state = LoadState::Idle;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of `price × quantity` as of the last successful load.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of cart lines, as shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn quantity_of(&self, id: CartItemId) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.quantity)
    }

    async fn set_quantity(&mut self, id: CartItemId, quantity: u32) -> Result<()> {
        let Some(token) = self.token("Error updating cart item")? else {
            return Err(self.signed_out("Error updating cart item"));
        };

        let update = CartItemUpdate { cantidad: quantity };
        if let Err(e) = self.client.update_cart_item(&token, id, &update).await {
            tracing::error!(error = %e, "Error updating cart item");
            return Err(e.into());
        }

        self.load().await
    }

    /// Read the token, logging a storage failure under `context`.
    fn token(&self, context: &'static str) -> Result<Option<SecretString>> {
        read_token(self.storage.as_ref()).map_err(|e| {
            tracing::error!(error = %e, "{context}");
            StorefrontError::from(e)
        })
    }

    fn signed_out(&self, context: &'static str) -> StorefrontError {
        tracing::error!(lines = self.items.len(), "{context}: no stored token");
        StorefrontError::NotSignedIn
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tienda_client::MemoryStorage;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn line(id: i64, price: &str, quantity: u32) -> Value {
        json!({
            "id": id,
            "producto_id": id * 10,
            "name": format!("Item {id}"),
            "description": "",
            "price": price,
            "image_url": null,
            "cantidad": quantity,
        })
    }

    fn cart_for(server: &MockServer, storage: MemoryStorage) -> CartController {
        CartController::new(
            ApiClient::with_base_url(Url::parse(&server.uri()).unwrap()),
            Arc::new(storage),
        )
    }

    async fn mount_cart_once(server: &MockServer, body: Value) {
        Mock::given(method("GET"))
            .and(path("/api/carrito"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .up_to_n_times(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_load_computes_total() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 2), line(2, "2.50", 4)])).await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.load().await.unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), Price::from_units(30));
        assert_eq!(cart.total(), cart_total(cart.items()));
        assert_eq!(cart.state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_load_without_token_issues_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/carrito"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let mut cart = cart_for(&server, MemoryStorage::new());
        cart.load().await.unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_stale_items() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 2)])).await;
        Mock::given(method("GET"))
            .and(path("/api/carrito"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.load().await.unwrap();
        assert!(cart.load().await.is_err());

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total(), Price::from_units(20));
        assert_eq!(cart.state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_increase_puts_quantity_plus_one_then_refetches() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 2)])).await;
        Mock::given(method("PUT"))
            .and(path("/api/carrito/1"))
            .and(body_json(json!({ "cantidad": 3 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ignored": true })))
            .expect(1)
            .mount(&server)
            .await;
        mount_cart_once(&server, json!([line(1, "10", 3)])).await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.load().await.unwrap();
        assert_eq!(cart.total(), Price::from_units(20));

        cart.increase(CartItemId::new(1)).await.unwrap();

        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.total(), Price::from_units(30));
    }

    #[tokio::test]
    async fn test_decrease_at_one_is_a_no_op() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 1)])).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.load().await.unwrap();
        let before = cart.items().to_vec();

        cart.decrease(CartItemId::new(1)).await.unwrap();

        assert_eq!(cart.items(), before.as_slice());
        assert_eq!(cart.total(), Price::from_units(10));
    }

    #[tokio::test]
    async fn test_decrease_sends_quantity_minus_one() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 4)])).await;
        Mock::given(method("PUT"))
            .and(path("/api/carrito/1"))
            .and(body_json(json!({ "cantidad": 3 })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        mount_cart_once(&server, json!([line(1, "10", 3)])).await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.load().await.unwrap();
        cart.decrease(CartItemId::new(1)).await.unwrap();

        assert_eq!(cart.total(), Price::from_units(30));
    }

    #[tokio::test]
    async fn test_unknown_item_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.increase(CartItemId::new(99)).await.unwrap();
        cart.decrease(CartItemId::new(99)).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_update_leaves_state_unchanged() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 2)])).await;
        Mock::given(method("PUT"))
            .and(path("/api/carrito/1"))
            .respond_with(ResponseTemplate::new(409).set_body_string("sin stock"))
            .mount(&server)
            .await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.load().await.unwrap();

        assert!(matches!(
            cart.increase(CartItemId::new(1)).await,
            Err(StorefrontError::Api(_))
        ));
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total(), Price::from_units(20));

        // No follow-up fetch after a failed mutation
        let gets = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == "GET")
            .count();
        assert_eq!(gets, 1);
    }

    #[tokio::test]
    async fn test_remove_only_item_empties_cart() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 2)])).await;
        Mock::given(method("DELETE"))
            .and(path("/api/carrito/1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        mount_cart_once(&server, json!([])).await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.load().await.unwrap();
        cart.remove(CartItemId::new(1)).await.unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[tokio::test]
    async fn test_failed_remove_leaves_state_unchanged() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 2), line(2, "5", 1)])).await;
        Mock::given(method("DELETE"))
            .and(path("/api/carrito/1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.load().await.unwrap();
        let before = cart.items().to_vec();

        assert!(matches!(
            cart.remove(CartItemId::new(1)).await,
            Err(StorefrontError::Api(_))
        ));
        assert_eq!(cart.items(), before.as_slice());
        assert_eq!(cart.total(), Price::from_units(25));

        let gets = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == "GET")
            .count();
        assert_eq!(gets, 1);
    }

    #[tokio::test]
    async fn test_mutations_after_logout_send_nothing() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 2)])).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let storage = Arc::new(MemoryStorage::with_token("abc"));
        let mut cart = CartController::new(
            ApiClient::with_base_url(Url::parse(&server.uri()).unwrap()),
            storage.clone(),
        );
        cart.load().await.unwrap();

        // Token goes away while the cart view is still populated
        tienda_client::storage::clear_token(storage.as_ref()).unwrap();

        assert!(matches!(
            cart.increase(CartItemId::new(1)).await,
            Err(StorefrontError::NotSignedIn)
        ));
        assert!(matches!(
            cart.decrease(CartItemId::new(1)).await,
            Err(StorefrontError::NotSignedIn)
        ));
        assert!(matches!(
            cart.remove(CartItemId::new(1)).await,
            Err(StorefrontError::NotSignedIn)
        ));
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total(), Price::from_units(20));
    }

    #[tokio::test]
    async fn test_add_refetches_instead_of_appending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/carrito"))
            .and(body_json(json!({ "producto_id": 10, "cantidad": 1 })))
            .respond_with(ResponseTemplate::new(201).set_body_json(line(1, "10", 1)))
            .expect(1)
            .mount(&server)
            .await;
        // The server merged the add into an existing line
        mount_cart_once(&server, json!([line(1, "10", 3)])).await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.add(ProductId::new(10)).await.unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_add_without_token_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut cart = cart_for(&server, MemoryStorage::new());
        let err = cart.add(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, StorefrontError::NotSignedIn));
        assert!(err.user_message().is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let server = MockServer::start().await;
        mount_cart_once(&server, json!([line(1, "10", 2)])).await;

        let mut cart = cart_for(&server, MemoryStorage::with_token("abc"));
        cart.load().await.unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.state(), LoadState::Idle);
    }
}
