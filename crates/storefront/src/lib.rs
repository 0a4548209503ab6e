//! Tienda storefront controllers.
//!
//! Each controller owns the state of one part of the storefront and keeps
//! it in step with the API by re-fetching after every mutation:
//!
//! - [`catalog::CatalogLoader`] - product list
//! - [`session::SessionContext`] - bearer token and signed-in profile
//! - [`cart::CartController`] - cart items and total
//! - [`home::HomePage`] - the landing page, composing the three above
//!
//! Controllers are driven through `&mut self`, so each has at most one
//! request in flight. The only state shared between them is the token in
//! client-side storage.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod error;
pub mod home;
pub mod session;

pub use cart::CartController;
pub use catalog::CatalogLoader;
pub use error::{Result, SIGN_IN_TO_ADD, StorefrontError};
pub use home::HomePage;
pub use session::SessionContext;
