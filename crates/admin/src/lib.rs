//! Tienda admin library.
//!
//! The admin panel is a product table with add, edit and delete. Every
//! mutation needs the stored bearer token and is followed by a full catalog
//! re-fetch; the API decides whether the token may manage products.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod confirm;
pub mod editor;
pub mod error;

pub use confirm::{AlwaysConfirm, Confirm, DELETE_PROMPT};
pub use editor::{AdminCatalogEditor, DeleteOutcome, EditorModal};
pub use error::{EditorError, Result};
