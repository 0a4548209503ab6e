//! Tienda Core - Shared domain types.
//!
//! This crate provides the types shared by every Tienda component:
//! - `client` - REST API client and client-side storage
//! - `storefront` - Catalog, session and cart controllers
//! - `admin` - Product catalog editor
//! - `cli` - The `tienda` command line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure computations - no I/O, no HTTP
//! clients. The remote API is authoritative for pricing, stock and ownership;
//! these types only mirror what it returns.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, products, cart items, profiles and load states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
