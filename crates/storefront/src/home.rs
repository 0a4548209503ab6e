//! Landing page: catalog grid, greeting and cart badge.

use std::sync::Arc;

use tienda_client::{ApiClient, Storage};
use tienda_core::{Product, Profile};

use crate::cart::CartController;
use crate::catalog::CatalogLoader;
use crate::error::Result;
use crate::session::SessionContext;

/// The storefront's landing page.
///
/// Composes the three storefront controllers. Each one fetches on its own;
/// a failure in one never stops the others from loading.
#[derive(Debug)]
pub struct HomePage {
    pub catalog: CatalogLoader,
    pub session: SessionContext,
    pub cart: CartController,
}

impl HomePage {
    #[must_use]
    pub fn new(client: &ApiClient, storage: &Arc<dyn Storage>) -> Self {
        Self {
            catalog: CatalogLoader::new(client.clone()),
            session: SessionContext::new(client.clone(), Arc::clone(storage)),
            cart: CartController::new(client.clone(), Arc::clone(storage)),
        }
    }

    /// Load catalog, session and cart. Failures are logged by each
    /// controller and do not abort the others.
    pub async fn mount(&mut self) {
        let _ = self.catalog.load().await;
        let _ = self.session.resolve().await;
        let _ = self.cart.load().await;
    }

    /// Add one unit of `product` to the cart.
    ///
    /// # Errors
    ///
    /// See [`CartController::add`]; a missing session yields
    /// [`crate::StorefrontError::NotSignedIn`].
    pub async fn add_to_cart(&mut self, product: &Product) -> Result<()> {
        self.cart.add(product.id).await
    }

    /// End the session: discard the token, forget the user and empty the
    /// cart view, whatever they held before.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the token could not be discarded.
    /// In-memory state is cleared regardless.
    pub fn logout(&mut self) -> Result<()> {
        self.cart.clear();
        self.session.logout()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&Profile> {
        self.session.user()
    }

    /// Cart line count for the header badge, hidden when zero.
    #[must_use]
    pub fn cart_badge(&self) -> Option<usize> {
        Some(self.cart.item_count()).filter(|count| *count > 0)
    }
}
