//! Core types for Tienda.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod status;
pub mod user;

pub use cart::{CartItem, CartItemUpdate, NewCartItem, cart_total};
pub use id::*;
pub use price::Price;
pub use product::{DraftError, PLACEHOLDER_IMAGE, Product, ProductDraft};
pub use status::LoadState;
pub use user::{Profile, UserEnvelope};
