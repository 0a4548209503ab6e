//! Admin catalog editor.
//!
//! Holds the product table and the add/edit modal. Create and update dismiss
//! the modal as soon as the server accepts the mutation, then re-fetch the
//! catalog. A rejected mutation leaves the modal open with the catalog as it
//! was.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::instrument;

use tienda_client::storage::read_token;
use tienda_client::{ApiClient, Storage};
use tienda_core::{LoadState, Product, ProductDraft, ProductId};
use tienda_storefront::CatalogLoader;

use crate::confirm::{Confirm, DELETE_PROMPT};
use crate::error::{EditorError, Result};

/// Which product form is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorModal {
    #[default]
    Closed,
    /// Empty "add product" form.
    Adding,
    /// Edit form pre-filled from this product.
    Editing(Product),
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The confirmation was declined; nothing was sent.
    Declined,
}

/// Authenticated CRUD over the product catalog.
pub struct AdminCatalogEditor {
    client: ApiClient,
    storage: Arc<dyn Storage>,
    catalog: CatalogLoader,
    modal: EditorModal,
}

impl std::fmt::Debug for AdminCatalogEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCatalogEditor")
            .field("catalog", &self.catalog)
            .field("modal", &self.modal)
            .finish_non_exhaustive()
    }
}

impl AdminCatalogEditor {
    #[must_use]
    pub fn new(client: ApiClient, storage: Arc<dyn Storage>) -> Self {
        Self {
            catalog: CatalogLoader::new(client.clone()),
            client,
            storage,
            modal: EditorModal::Closed,
        }
    }

    /// Load the product table.
    ///
    /// # Errors
    ///
    /// Returns the API error after the catalog loader has logged it.
    pub async fn mount(&mut self) -> Result<()> {
        Ok(self.catalog.load().await?)
    }

    // =========================================================================
    // Modal
    // =========================================================================

    pub fn open_add(&mut self) {
        self.modal = EditorModal::Adding;
    }

    /// Open the edit form for a product in the loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::NotFound` if the product is not loaded.
    pub fn open_edit(&mut self, id: ProductId) -> Result<&Product> {
        let product = self.catalog.find(id).ok_or(EditorError::NotFound(id))?;
        self.modal = EditorModal::Editing(product.clone());
        Ok(product)
    }

    pub fn close(&mut self) {
        self.modal = EditorModal::Closed;
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a product, dismiss the modal and re-fetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation, storage or API error after logging it. Nothing
    /// is sent for an invalid draft. A failed re-fetch is reported too, but
    /// the product exists and the modal is already closed.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&mut self, draft: &ProductDraft) -> Result<()> {
        let token = self.prepare(draft, "Error adding product")?;

        if let Err(e) = self.client.create_product(&token, draft).await {
            tracing::error!(error = %e, "Error adding product");
            return Err(e.into());
        }

        self.close();
        Ok(self.catalog.load().await?)
    }

    /// Replace a product's fields, dismiss the modal and re-fetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation, storage or API error after logging it. Nothing
    /// is sent for an invalid draft. A failed re-fetch is reported after the
    /// modal has closed.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update(&mut self, id: ProductId, draft: &ProductDraft) -> Result<()> {
        let token = self.prepare(draft, "Error editing product")?;

        if let Err(e) = self.client.update_product(&token, id, draft).await {
            tracing::error!(error = %e, "Error editing product");
            return Err(e.into());
        }

        self.close();
        Ok(self.catalog.load().await?)
    }

    /// Ask for confirmation, delete a product and re-fetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns a storage or API error after logging it.
    #[instrument(skip(self, confirm), fields(product_id = %id))]
    pub async fn delete(&mut self, id: ProductId, confirm: &dyn Confirm) -> Result<DeleteOutcome> {
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!("Product deletion declined");
            return Ok(DeleteOutcome::Declined);
        }

        let token = self.token("Error deleting product")?;

        if let Err(e) = self.client.delete_product(&token, id).await {
            tracing::error!(error = %e, "Error deleting product");
            return Err(e.into());
        }

        self.catalog.load().await?;
        Ok(DeleteOutcome::Deleted)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.catalog.products()
    }

    #[must_use]
    pub const fn modal(&self) -> &EditorModal {
        &self.modal
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.catalog.state()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn prepare(&self, draft: &ProductDraft, context: &'static str) -> Result<SecretString> {
        if let Err(e) = draft.validate() {
            tracing::warn!(error = %e, "{context}");
            return Err(e.into());
        }
        self.token(context)
    }

    fn token(&self, context: &'static str) -> Result<SecretString> {
        match read_token(self.storage.as_ref()) {
            Ok(Some(token)) => Ok(token),
            Ok(None) => {
                tracing::error!("{context}: no stored token");
                Err(EditorError::NotSignedIn)
            }
            Err(e) => {
                tracing::error!(error = %e, "{context}");
                Err(e.into())
            }
        }
    }
}
