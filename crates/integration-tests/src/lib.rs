//! End-to-end storefront scenarios.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tienda-integration-tests
//! ```
//!
//! The tests drive the real controllers over HTTP against [`FakeApi`], an
//! in-memory stand-in for the store's REST API served by `wiremock`. It keeps
//! products, users and one cart, checks bearer tokens, and records every
//! request so tests can assert that nothing was sent.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use tienda_client::storage::write_token;
use tienda_client::{ApiClient, MemoryStorage, Storage, StorageError};

#[derive(Debug, Default)]
struct FakeState {
    products: Vec<Value>,
    cart: Vec<Value>,
    users: HashMap<String, Value>,
    admins: HashSet<String>,
    next_id: i64,
    requests: Vec<String>,
    catalog_down: bool,
}

impl FakeState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn product(&self, id: i64) -> Option<&Value> {
        self.products.iter().find(|p| p["id"] == id)
    }
}

/// In-memory store API. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a product and return its ID.
    pub fn add_product(&self, name: &str, price: &str, stock: i64) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.products.push(json!({
            "id": id,
            "name": name,
            "description": format!("{name} description"),
            "price": price,
            "stock": stock,
            "image_url": format!("https://img.example/{id}.png"),
        }));
        id
    }

    /// Seed a cart line and return its ID.
    ///
    /// # Panics
    ///
    /// Panics if `product_id` was never seeded.
    pub fn add_cart_line(&self, product_id: i64, quantity: u32) -> i64 {
        let mut state = self.lock();
        let product = state
            .product(product_id)
            .cloned()
            .unwrap_or_else(|| panic!("unknown product {product_id}"));
        let id = state.next_id();
        state.cart.push(cart_line(id, &product, quantity));
        id
    }

    /// Accept `token` as a regular user.
    pub fn add_user(&self, token: &str, id: i64, name: &str) {
        self.lock().users.insert(
            token.to_string(),
            json!({ "id": id, "nombre": name, "email": format!("{}@example.com", name.to_lowercase()) }),
        );
    }

    /// Accept `token` as a user allowed to change the catalog.
    pub fn add_admin(&self, token: &str, id: i64, name: &str) {
        self.add_user(token, id, name);
        self.lock().admins.insert(token.to_string());
    }

    /// Make `GET /api/productos` fail with a 500.
    pub fn set_catalog_down(&self, down: bool) {
        self.lock().catalog_down = down;
    }

    /// Every request seen so far, as `"METHOD /path"`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// Requests seen so far with the given method.
    #[must_use]
    pub fn requests_with_method(&self, method: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.split_whitespace().next() == Some(method))
            .count()
    }

    /// Product names currently in the store.
    #[must_use]
    pub fn product_names(&self) -> Vec<String> {
        self.lock()
            .products
            .iter()
            .filter_map(|p| p["name"].as_str().map(str::to_string))
            .collect()
    }

    /// Quantity of a cart line, if it exists.
    #[must_use]
    pub fn cart_quantity(&self, line_id: i64) -> Option<u64> {
        self.lock()
            .cart
            .iter()
            .find(|line| line["id"] == line_id)
            .and_then(|line| line["cantidad"].as_u64())
    }

    fn handle(&self, request: &Request) -> ResponseTemplate {
        let method = request.method.as_str().to_string();
        let path = request.url.path().to_string();
        let mut state = self.lock();
        state.requests.push(format!("{method} {path}"));

        let token = request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);
        let body: Option<Value> = serde_json::from_slice(&request.body).ok();

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (method.as_str(), segments.as_slice()) {
            ("GET", ["api", "productos"]) => {
                if state.catalog_down {
                    return ResponseTemplate::new(500).set_body_string("catalog unavailable");
                }
                ResponseTemplate::new(200).set_body_json(Value::Array(state.products.clone()))
            }
            (_, ["api", "productos", ..]) => {
                if !token.as_ref().is_some_and(|t| state.admins.contains(t)) {
                    return ResponseTemplate::new(403);
                }
                products_mutation(&mut state, &method, segments.get(2..).unwrap_or_default(), body)
            }
            ("GET", ["api", "user"]) => match token.and_then(|t| state.users.get(&t).cloned()) {
                Some(user) => ResponseTemplate::new(200).set_body_json(json!({ "user": user })),
                None => ResponseTemplate::new(401),
            },
            (_, ["api", "carrito", ..]) => {
                if !token.as_ref().is_some_and(|t| state.users.contains_key(t)) {
                    return ResponseTemplate::new(401);
                }
                cart_route(&mut state, &method, segments.get(2..).unwrap_or_default(), body)
            }
            _ => ResponseTemplate::new(404),
        }
    }
}

impl Respond for FakeApi {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.handle(request)
    }
}

fn cart_line(id: i64, product: &Value, quantity: u32) -> Value {
    json!({
        "id": id,
        "producto_id": product["id"],
        "name": product["name"],
        "description": product["description"],
        "price": product["price"],
        "image_url": product["image_url"],
        "cantidad": quantity,
    })
}

fn parse_id(segments: &[&str]) -> Option<i64> {
    match segments {
        [id] => id.parse().ok(),
        _ => None,
    }
}

fn products_mutation(
    state: &mut FakeState,
    method: &str,
    rest: &[&str],
    body: Option<Value>,
) -> ResponseTemplate {
    match (method, rest, body) {
        ("POST", [], Some(mut product)) => {
            product["id"] = json!(state.next_id());
            state.products.push(product.clone());
            ResponseTemplate::new(201).set_body_json(product)
        }
        ("PUT", _, Some(mut fields)) => {
            let Some(id) = parse_id(rest) else {
                return ResponseTemplate::new(404);
            };
            match state.products.iter_mut().find(|p| p["id"] == id) {
                Some(product) => {
                    fields["id"] = json!(id);
                    *product = fields;
                    ResponseTemplate::new(200).set_body_json(product.clone())
                }
                None => ResponseTemplate::new(404),
            }
        }
        ("DELETE", _, _) => {
            let Some(id) = parse_id(rest) else {
                return ResponseTemplate::new(404);
            };
            let before = state.products.len();
            state.products.retain(|p| p["id"] != id);
            if state.products.len() == before {
                ResponseTemplate::new(404)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" }))
            }
        }
        _ => ResponseTemplate::new(400),
    }
}

fn cart_route(
    state: &mut FakeState,
    method: &str,
    rest: &[&str],
    body: Option<Value>,
) -> ResponseTemplate {
    match (method, rest, body) {
        ("GET", [], _) => ResponseTemplate::new(200).set_body_json(Value::Array(state.cart.clone())),
        ("POST", [], Some(body)) => {
            let product_id = body["producto_id"].as_i64().unwrap_or_default();
            let quantity = body["cantidad"].as_u64().unwrap_or(1);
            if let Some(line) = state
                .cart
                .iter_mut()
                .find(|line| line["producto_id"] == product_id)
            {
                let current = line["cantidad"].as_u64().unwrap_or_default();
                line["cantidad"] = json!(current + quantity);
                return ResponseTemplate::new(200).set_body_json(line.clone());
            }
            let Some(product) = state.product(product_id).cloned() else {
                return ResponseTemplate::new(404);
            };
            let id = state.next_id();
            let line = cart_line(id, &product, u32::try_from(quantity).unwrap_or(1));
            state.cart.push(line.clone());
            ResponseTemplate::new(201).set_body_json(line)
        }
        ("PUT", _, Some(body)) => {
            let Some(id) = parse_id(rest) else {
                return ResponseTemplate::new(404);
            };
            match state.cart.iter_mut().find(|line| line["id"] == id) {
                Some(line) => {
                    line["cantidad"] = body["cantidad"].clone();
                    ResponseTemplate::new(200).set_body_json(line.clone())
                }
                None => ResponseTemplate::new(404),
            }
        }
        ("DELETE", _, _) => {
            let Some(id) = parse_id(rest) else {
                return ResponseTemplate::new(404);
            };
            state.cart.retain(|line| line["id"] != id);
            ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" }))
        }
        _ => ResponseTemplate::new(400),
    }
}

/// A running fake API plus a client and storage pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub api: FakeApi,
    pub client: ApiClient,
    pub storage: Arc<dyn Storage>,
}

impl TestContext {
    /// Start a fake API with empty in-memory storage.
    pub async fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new())).await
    }

    /// Start a fake API using `storage` for the token.
    ///
    /// # Panics
    ///
    /// Panics if the mock server address is not a valid URL.
    pub async fn with_storage(storage: Arc<dyn Storage>) -> Self {
        let server = MockServer::start().await;
        let api = FakeApi::new();

        Mock::given(path_regex("^/api/"))
            .respond_with(api.clone())
            .mount(&server)
            .await;

        let base_url = Url::parse(&server.uri()).unwrap_or_else(|e| panic!("mock server URI: {e}"));

        Self {
            client: ApiClient::with_base_url(base_url),
            server,
            api,
            storage,
        }
    }

    /// Store `token` as if the user had signed in elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn store_token(&self, token: &str) -> Result<(), StorageError> {
        write_token(self.storage.as_ref(), &SecretString::from(token))
    }
}
