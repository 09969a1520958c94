//! ShopSmart CLI - Inspect the remote store catalog.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! shopsmart-cli catalog products --title shirt --price-min 10 --price-max 50 --category 1
//!
//! # Show one product
//! shopsmart-cli catalog product 4
//!
//! # List categories
//! shopsmart-cli catalog categories
//! ```
//!
//! The store API is configured with the same `STORE_API_*` variables as the
//! storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shopsmart_core::{CategoryId, ProductFilter, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "shopsmart-cli")]
#[command(author, version, about = "ShopSmart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the remote catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products matching the given filters
    Products {
        /// Title substring
        #[arg(short, long)]
        title: Option<String>,

        /// Inclusive lower price bound
        #[arg(long)]
        price_min: Option<Decimal>,

        /// Inclusive upper price bound
        #[arg(long)]
        price_max: Option<Decimal>,

        /// Category ID
        #[arg(short, long)]
        category: Option<CategoryId>,
    },
    /// Show a single product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// List all categories
    Categories,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::catalog::CatalogCommandError> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Products {
                title,
                price_min,
                price_max,
                category,
            } => {
                let filter = ProductFilter {
                    title,
                    price_min,
                    price_max,
                    category_id: category,
                };
                commands::catalog::products(&filter).await?;
            }
            CatalogAction::Product { id } => commands::catalog::product(id).await?,
            CatalogAction::Categories => commands::catalog::categories().await?,
        },
    }
    Ok(())
}
