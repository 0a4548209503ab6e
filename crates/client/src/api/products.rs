//! Product catalog routes.

use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use tienda_core::{Product, ProductDraft, ProductId};

use super::{ApiClient, NoBody};
use crate::error::ApiError;

impl ApiClient {
    /// Fetch the whole catalog. Unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch::<_, NoBody>(Method::GET, "api/productos", None, None)
            .await
    }

    /// Create a product. The response body is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token, draft), fields(name = %draft.name))]
    pub async fn create_product(
        &self,
        token: &SecretString,
        draft: &ProductDraft,
    ) -> Result<(), ApiError> {
        self.execute(Method::POST, "api/productos", Some(token), Some(draft))
            .await
            .map(drop)
    }

    /// Replace a product's fields. The response body is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &SecretString,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<(), ApiError> {
        let route = format!("api/productos/{id}");
        self.execute(Method::PUT, &route, Some(token), Some(draft))
            .await
            .map(drop)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &SecretString, id: ProductId) -> Result<(), ApiError> {
        let route = format!("api/productos/{id}");
        self.execute::<NoBody>(Method::DELETE, &route, Some(token), None)
            .await
            .map(drop)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use tienda_core::Price;

    use super::*;

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::with_base_url(Url::parse(&server.uri()).unwrap())
    }

    #[tokio::test]
    async fn test_list_products_is_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/productos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Mate", "description": "Calabaza", "price": "10.00", "stock": 3, "image_url": null },
                { "id": 2, "name": "Bombilla", "description": null, "price": 4.5, "stock": 8 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let products = client_for(&server).list_products().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[1].price, "4.5".parse().unwrap());

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_list_products_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/productos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).list_products().await;
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[tokio::test]
    async fn test_create_product_sends_bearer_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/productos"))
            .and(header("authorization", "Bearer admin-token"))
            .and(body_json(json!({
                "name": "X",
                "description": "Thing",
                "price": "5",
                "stock": 1,
                "image_url": "https://img.example/x.png",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 10 })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = ProductDraft {
            name: "X".to_string(),
            description: "Thing".to_string(),
            price: Price::from_units(5),
            stock: 1,
            image_url: "https://img.example/x.png".to_string(),
        };

        client_for(&server)
            .create_product(&SecretString::from("admin-token"), &draft)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_product_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/productos/3"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .delete_product(&SecretString::from("user-token"), ProductId::new(3))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(reqwest::StatusCode::FORBIDDEN));
    }
}
