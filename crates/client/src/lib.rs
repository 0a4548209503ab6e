//! Tienda client library.
//!
//! Everything that talks to the outside world lives here: the REST API
//! client, the client-side persistent storage holding the bearer token, and
//! configuration loaded from the environment.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod storage;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use reqwest::StatusCode;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, TOKEN_KEY};
