//! Current user route.

use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use tienda_core::{Profile, UserEnvelope};

use super::{ApiClient, NoBody};
use crate::error::ApiError;

impl ApiClient {
    /// Resolve the profile behind a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the token is rejected, or the
    /// body is not a `{ user }` envelope.
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: &SecretString) -> Result<Profile, ApiError> {
        let envelope: UserEnvelope = self
            .fetch::<_, NoBody>(Method::GET, "api/user", Some(token), None)
            .await?;
        Ok(envelope.user)
    }
}
