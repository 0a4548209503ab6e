//! Terminal output for storefront views.
#![allow(clippy::print_stdout)]

use tienda_core::{CartItem, Price, Product, Profile};

pub const EMPTY_CART: &str = "Your cart is empty.";
pub const EMPTY_CATALOG: &str = "No products available.";

/// Blocking alert shown to the user.
pub fn alert(message: &str) {
    println!("! {message}");
}

pub fn notice(message: &str) {
    println!("{message}");
}

/// Header line: greeting when signed in, plus the cart badge.
pub fn header(user: Option<&Profile>, badge: Option<usize>) {
    let greeting = user.map_or_else(
        || "Not signed in".to_string(),
        |profile| format!("Hello, {}", profile.name),
    );
    match badge {
        Some(count) => println!("{greeting}  [cart: {count}]"),
        None => println!("{greeting}"),
    }
}

pub fn product_grid(products: &[Product]) {
    if products.is_empty() {
        println!("{EMPTY_CATALOG}");
        return;
    }
    for product in products {
        println!("#{} {}  {}", product.id, product.name, product.price);
        if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
            println!("    {description}");
        }
        println!("    image: {}", product.image_or_placeholder());
    }
}

/// Admin table: one row per product with every editable field.
pub fn product_table(products: &[Product]) {
    if products.is_empty() {
        println!("{EMPTY_CATALOG}");
        return;
    }
    println!("{:>6}  {:<24}  {:>10}  {:>6}  IMAGE", "ID", "NAME", "PRICE", "STOCK");
    for product in products {
        println!(
            "{:>6}  {:<24}  {:>10}  {:>6}  {}",
            product.id,
            product.name,
            product.price.to_string(),
            product.stock,
            product.image_or_placeholder()
        );
    }
}

pub fn cart(items: &[CartItem], total: Price) {
    if items.is_empty() {
        println!("{EMPTY_CART}");
        return;
    }
    for item in items {
        println!(
            "[{}] {} x{}  {} each  {}",
            item.id,
            item.name,
            item.quantity,
            item.price,
            item.line_total()
        );
    }
    println!("Total: {total}");
}

pub fn profile(profile: &Profile) {
    match &profile.email {
        Some(email) => println!("{} <{email}> (id {})", profile.name, profile.id),
        None => println!("{} (id {})", profile.name, profile.id),
    }
}
