//! Session context.
//!
//! The session is a bearer token in client-side storage plus the profile
//! the server derives from it. Lifecycle:
//!
//! 1. `resolve` - if a token is stored, ask `GET /api/user` who it belongs to.
//!    A rejected or failed lookup leaves the session signed out but keeps the
//!    token; there is no retry and no expiry handling.
//! 2. `sign_in` - store a token obtained elsewhere, then `resolve`.
//! 3. `logout` - local only: discard the token and forget the profile.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::instrument;

use tienda_client::storage::{clear_token, read_token, write_token};
use tienda_client::{ApiClient, Storage};
use tienda_core::{LoadState, Profile};

use crate::error::Result;

/// Explicit session state shared by the storefront pages.
pub struct SessionContext {
    client: ApiClient,
    storage: Arc<dyn Storage>,
    user: Option<Profile>,
    state: LoadState,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user", &self.user)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    #[must_use]
    pub fn new(client: ApiClient, storage: Arc<dyn Storage>) -> Self {
        Self {
            client,
            storage,
            user: None,
            state: LoadState::Idle,
        }
    }

    /// The stored bearer token, read fresh from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn token(&self) -> Result<Option<SecretString>> {
        Ok(read_token(self.storage.as_ref())?)
    }

    /// Resolve the signed-in user from the stored token.
    ///
    /// Without a token this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the storage or API error after logging it. The token is never
    /// cleared here.
    #[instrument(skip(self))]
    pub async fn resolve(&mut self) -> Result<Option<&Profile>> {
        let token = match self.token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("No stored token, session stays signed out");
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(error = %e, "Error reading stored token");
                return Err(e);
            }
        };

        self.state = LoadState::Loading;
        let result = self.client.current_user(&token).await;
        self.state = LoadState::Loaded;

        match result {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, "Session resolved");
                self.user = Some(profile);
                Ok(self.user.as_ref())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching user data");
                Err(e.into())
            }
        }
    }

    /// Store `token` and resolve the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be stored or the profile lookup
    /// fails. A stored token stays stored even if the lookup fails.
    #[instrument(skip(self, token))]
    pub async fn sign_in(&mut self, token: &SecretString) -> Result<Option<&Profile>> {
        if let Err(e) = write_token(self.storage.as_ref(), token) {
            tracing::error!(error = %e, "Error storing token");
            return Err(e.into());
        }
        self.user = None;
        self.resolve().await
    }

    /// Discard the token and forget the user.
    ///
    /// In-memory state is always cleared, even if storage cannot be written.
    ///
    /// # Errors
    ///
    /// Returns the storage error after logging it.
    pub fn logout(&mut self) -> Result<()> {
        self.user = None;
        self.state = LoadState::Idle;

        clear_token(self.storage.as_ref()).map_err(|e| {
            tracing::error!(error = %e, "Error discarding token");
            e.into()
        })
    }

    #[must_use]
    pub const fn user(&self) -> Option<&Profile> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Storage handle, for controllers that read the token themselves.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage)
    }
}
