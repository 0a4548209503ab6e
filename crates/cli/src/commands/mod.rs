//! Command implementations.
//!
//! Each command builds the controllers it needs from a shared [`Context`],
//! drives them, and renders the result. Controllers log their own failures;
//! commands only decide what to print and whether the process fails.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod session;

use std::sync::Arc;

use thiserror::Error;

use tienda_admin::EditorError;
use tienda_client::{ApiClient, ClientConfig, FileStorage, Storage, StorageError};
use tienda_storefront::StorefrontError;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Shared handles for one invocation.
pub struct Context {
    pub client: ApiClient,
    pub storage: Arc<dyn Storage>,
}

impl Context {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ApiClient::new(config),
            storage: Arc::new(FileStorage::new(config.storage_path.clone())),
        }
    }
}
