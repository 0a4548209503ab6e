//! Catalog commands: `products` and `home`.

use tienda_storefront::{CatalogLoader, HomePage};

use super::{Context, Result};
use crate::render;

/// Print the product grid. A failed fetch still renders (an empty grid).
pub async fn products(ctx: &Context) -> Result<()> {
    let mut catalog = CatalogLoader::new(ctx.client.clone());
    let loaded = catalog.load().await;

    render::product_grid(catalog.products());
    Ok(loaded?)
}

/// Print the landing page: header with greeting and cart badge, then the grid.
pub async fn home(ctx: &Context) -> Result<()> {
    let mut page = HomePage::new(&ctx.client, &ctx.storage);
    page.mount().await;

    render::header(page.user(), page.cart_badge());
    render::product_grid(page.catalog.products());
    Ok(())
}
