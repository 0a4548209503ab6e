//! Cart commands.
//!
//! Every command prints the cart as the server reports it afterwards.

use tienda_client::storage::read_token;
use tienda_core::{CartItemId, ProductId};
use tienda_storefront::{CartController, SIGN_IN_TO_ADD, StorefrontError};

use super::{Context, Result};
use crate::render;

fn controller(ctx: &Context) -> CartController {
    CartController::new(ctx.client.clone(), ctx.storage.clone())
}

fn render_cart(cart: &CartController) {
    render::cart(cart.items(), cart.total());
}

/// Alert and fail when no token is stored.
fn require_session(ctx: &Context) -> Result<()> {
    if read_token(ctx.storage.as_ref())?.is_some() {
        return Ok(());
    }
    render::alert(SIGN_IN_TO_ADD);
    Err(StorefrontError::NotSignedIn.into())
}

/// Loaded cart for a mutation on `id`, or `None` after reporting an unknown item.
async fn cart_holding(ctx: &Context, id: CartItemId) -> Result<Option<CartController>> {
    require_session(ctx)?;

    let mut cart = controller(ctx);
    cart.load().await?;

    if cart.items().iter().any(|item| item.id == id) {
        Ok(Some(cart))
    } else {
        render::notice(&format!("No cart item {id}."));
        render_cart(&cart);
        Ok(None)
    }
}

pub async fn show(ctx: &Context) -> Result<()> {
    let mut cart = controller(ctx);
    let loaded = cart.load().await;

    render_cart(&cart);
    Ok(loaded?)
}

pub async fn add(ctx: &Context, product_id: ProductId) -> Result<()> {
    require_session(ctx)?;

    let mut cart = controller(ctx);
    cart.add(product_id).await?;

    render_cart(&cart);
    Ok(())
}

pub async fn increase(ctx: &Context, id: CartItemId) -> Result<()> {
    let Some(mut cart) = cart_holding(ctx, id).await? else {
        return Ok(());
    };

    let changed = cart.increase(id).await;
    render_cart(&cart);
    Ok(changed?)
}

/// Lowering a quantity of 1 is a no-op; `remove` deletes the line.
pub async fn decrease(ctx: &Context, id: CartItemId) -> Result<()> {
    let Some(mut cart) = cart_holding(ctx, id).await? else {
        return Ok(());
    };

    let changed = cart.decrease(id).await;
    render_cart(&cart);
    Ok(changed?)
}

pub async fn remove(ctx: &Context, id: CartItemId) -> Result<()> {
    let Some(mut cart) = cart_holding(ctx, id).await? else {
        return Ok(());
    };

    let removed = cart.remove(id).await;
    render_cart(&cart);
    Ok(removed?)
}
