//! Tienda CLI - the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! tienda products
//!
//! # Store a bearer token and see who it belongs to
//! tienda login --token "$TOKEN"
//! tienda whoami
//!
//! # Work with the cart
//! tienda cart add 3
//! tienda cart increase 12
//! tienda cart show
//!
//! # Manage products (needs an admin token)
//! tienda admin create --name Mate --description Calabaza --price 10 --stock 5 --image-url https://img.example/mate.png
//! tienda admin delete 3
//! ```
//!
//! # Commands
//!
//! - `products` / `home` - Catalog grid, greeting and cart badge
//! - `login` / `logout` / `whoami` - Session management
//! - `cart` - Show and change the cart
//! - `admin` - Product CRUD

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use tienda_client::ClientConfig;
use tienda_core::{CartItemId, Price, ProductId};

mod commands;
mod render;
mod telemetry;

use commands::Context;

#[derive(Parser)]
#[command(name = "tienda")]
#[command(author, version, about = "Tienda storefront CLI")]
struct Cli {
    /// API origin (overrides `TIENDA_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Client storage file (overrides `TIENDA_STORAGE_PATH`)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Products,
    /// Catalog, greeting and cart badge
    Home,
    /// Store a bearer token and resolve its user
    Login {
        /// Bearer token issued by the API
        #[arg(short, long)]
        token: String,
    },
    /// Discard the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the product catalog
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart items and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Raise an item's quantity by one
    Increase {
        /// Cart item ID
        item_id: CartItemId,
    },
    /// Lower an item's quantity by one (never below 1)
    Decrease {
        /// Cart item ID
        item_id: CartItemId,
    },
    /// Remove an item
    Remove {
        /// Cart item ID
        item_id: CartItemId,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Show the product table
    List,
    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: Price,
        #[arg(long)]
        stock: i64,
        #[arg(long)]
        image_url: String,
    },
    /// Edit a product; omitted fields keep their current value
    Update {
        /// Product ID
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<Price>,
        #[arg(long)]
        stock: Option<i64>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: ProductId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_tracing();
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };

    // Sentry before the subscriber, so the tracing layer binds to its hub
    let sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing();
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let ctx = Context::new(&config);

    report(run(cli.command, &ctx).await)
}

/// Log a failed command and map the outcome to the process status.
fn report(result: Result<(), Box<dyn std::error::Error>>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, tienda_client::ConfigError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(path) = &cli.storage {
        config = config.with_storage_path(path);
    }
    Ok(config)
}

async fn run(command: Commands, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Products => commands::catalog::products(ctx).await?,
        Commands::Home => commands::catalog::home(ctx).await?,
        Commands::Login { token } => {
            commands::session::login(ctx, &SecretString::from(token)).await?;
        }
        Commands::Logout => commands::session::logout(ctx)?,
        Commands::Whoami => commands::session::whoami(ctx).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(ctx).await?,
            CartAction::Add { product_id } => commands::cart::add(ctx, product_id).await?,
            CartAction::Increase { item_id } => commands::cart::increase(ctx, item_id).await?,
            CartAction::Decrease { item_id } => commands::cart::decrease(ctx, item_id).await?,
            CartAction::Remove { item_id } => commands::cart::remove(ctx, item_id).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::List => commands::admin::list(ctx).await?,
            AdminAction::Create {
                name,
                description,
                price,
                stock,
                image_url,
            } => {
                let draft = tienda_core::ProductDraft {
                    name,
                    description,
                    price,
                    stock,
                    image_url,
                };
                commands::admin::create(ctx, &draft).await?;
            }
            AdminAction::Update {
                id,
                name,
                description,
                price,
                stock,
                image_url,
            } => {
                let changes = commands::admin::ProductChanges {
                    name,
                    description,
                    price,
                    stock,
                    image_url,
                };
                commands::admin::update(ctx, id, changes).await?;
            }
            AdminAction::Delete { id, yes } => commands::admin::delete(ctx, id, yes).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from(["tienda", "cart", "add", "7"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Add { product_id }
            }) if product_id == ProductId::new(7)
        ));
    }

    #[test]
    fn test_parse_admin_create_price() {
        let cli = Cli::try_parse_from([
            "tienda",
            "admin",
            "create",
            "--name",
            "X",
            "--description",
            "Thing",
            "--price",
            "5.50",
            "--stock",
            "1",
            "--image-url",
            "https://img.example/x.png",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Admin {
                action: AdminAction::Create { price, .. }
            }) if price == "5.5".parse::<Price>().unwrap_or_default()
        ));
    }

    #[test]
    fn test_failed_command_exits_with_failure() {
        let not_found = commands::CommandError::from(tienda_admin::EditorError::NotFound(
            ProductId::new(999),
        ));

        assert_eq!(report(Err(Box::new(not_found))), ExitCode::FAILURE);
        assert_eq!(report(Ok(())), ExitCode::SUCCESS);
    }

    #[test]
    fn test_rejects_non_numeric_ids() {
        assert!(Cli::try_parse_from(["tienda", "cart", "remove", "abc"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tienda",
            "products",
            "--api-url",
            "http://localhost:9000",
        ]);
        assert!(cli.is_ok_and(|c| c.api_url.as_deref() == Some("http://localhost:9000")));
    }
}
