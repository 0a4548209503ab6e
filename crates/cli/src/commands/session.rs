//! Session commands: `login`, `logout` and `whoami`.

use secrecy::SecretString;

use tienda_storefront::{HomePage, SessionContext};

use super::{Context, Result};
use crate::render;

pub async fn login(ctx: &Context, token: &SecretString) -> Result<()> {
    let mut session = SessionContext::new(ctx.client.clone(), ctx.storage.clone());

    match session.sign_in(token).await {
        Ok(Some(profile)) => {
            render::header(Some(profile), None);
            Ok(())
        }
        Ok(None) => {
            render::header(None, None);
            Ok(())
        }
        Err(e) => {
            render::notice("Token stored, but the user could not be resolved.");
            Err(e.into())
        }
    }
}

/// Local only; the server is never told.
pub fn logout(ctx: &Context) -> Result<()> {
    let mut page = HomePage::new(&ctx.client, &ctx.storage);
    page.logout()?;

    render::notice("Signed out.");
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<()> {
    let mut session = SessionContext::new(ctx.client.clone(), ctx.storage.clone());

    match session.resolve().await? {
        Some(profile) => render::profile(profile),
        None => render::header(None, None),
    }
    Ok(())
}
