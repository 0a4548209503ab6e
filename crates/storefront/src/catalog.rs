//! Product catalog loader.

use tracing::instrument;

use tienda_client::ApiClient;
use tienda_core::{LoadState, Product, ProductId};

use crate::error::Result;

/// Holds the product list fetched from `GET /api/productos`.
///
/// A failed fetch keeps whatever was loaded before, which on first mount is
/// an empty catalog.
#[derive(Debug)]
pub struct CatalogLoader {
    client: ApiClient,
    products: Vec<Product>,
    state: LoadState,
}

impl CatalogLoader {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self {
            client,
            products: Vec::new(),
            state: LoadState::Idle,
        }
    }

    /// Fetch the catalog and replace the current list.
    ///
    /// # Errors
    ///
    /// Returns the API error after logging it. The product list is left as
    /// it was.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<()> {
        self.state = LoadState::Loading;
        let result = self.client.list_products().await;
        self.state = LoadState::Loaded;

        match result {
            Ok(products) => {
                tracing::debug!(count = products.len(), "Catalog loaded");
                self.products = products;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching products");
                Err(e.into())
            }
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::StorefrontError;

    fn loader_for(server: &MockServer) -> CatalogLoader {
        CatalogLoader::new(ApiClient::with_base_url(Url::parse(&server.uri()).unwrap()))
    }

    #[tokio::test]
    async fn test_load_replaces_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/productos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Mate", "price": "10", "stock": 2 },
                { "id": 2, "name": "Yerba", "price": "7.5", "stock": 9 }
            ])))
            .mount(&server)
            .await;

        let mut catalog = loader_for(&server);
        assert_eq!(catalog.state(), LoadState::Idle);

        catalog.load().await.unwrap();

        assert_eq!(catalog.state(), LoadState::Loaded);
        assert_eq!(catalog.products().len(), 2);
        assert_eq!(catalog.find(ProductId::new(2)).unwrap().name, "Yerba");
        assert!(catalog.find(ProductId::new(3)).is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_catalog_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/productos"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let mut catalog = loader_for(&server);
        let result = catalog.load().await;

        assert!(matches!(result, Err(StorefrontError::Api(_))));
        assert!(catalog.is_empty());
        assert_eq!(catalog.state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/productos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "id": 1, "name": "Mate", "price": 10 }])),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/productos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut catalog = loader_for(&server);
        catalog.load().await.unwrap();
        assert!(catalog.load().await.is_err());

        assert_eq!(catalog.products().len(), 1);
    }
}
