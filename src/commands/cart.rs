use anyhow::Result;
use clap::Subcommand;
use tracing::info;

use crate::config::Config;
use crate::errors::ShopprobeError;
use crate::extract;
use crate::session::SessionController;
use crate::source::{LiveSource, MarkupSource, Operation, SnapshotSource};
use crate::types::{ClearCartResult, OutputFormat, valid_asin};

const CART_PATH: &str = "/gp/cart/view.html";

#[derive(Subcommand)]
pub enum CartCommands {
    /// Show the cart contents
    Show,

    /// Add a product to the cart
    Add {
        /// Catalog identifier (10-character code)
        asin: String,
    },

    /// Remove every item from the cart
    Clear,
}

pub async fn handle_cart(
    config: &Config,
    session: &SessionController,
    command: CartCommands,
    format: OutputFormat,
) -> Result<()> {
    // Cart operations act on an account: the profile must be confirmed first
    if !super::gate(session).await? {
        return Ok(());
    }
    let domain = session.domain().await;

    match command {
        CartCommands::Show => {
            let url = super::storefront_url(&domain, CART_PATH);
            let html = super::acquire(config, session, Operation::CartView, &url).await?;
            let cart = extract::cart::cart_view(&html);

            match format {
                OutputFormat::Json => super::print_json(&cart)?,
                OutputFormat::Simple => {
                    if cart.is_empty {
                        println!("Cart is empty");
                    } else {
                        for item in &cart.items {
                            println!(
                                "{}x {}  {}",
                                item.quantity,
                                item.title,
                                item.price.as_deref().unwrap_or("-")
                            );
                        }
                        if let Some(subtotal) = &cart.subtotal {
                            println!("Subtotal ({} items): {}", cart.item_count, subtotal);
                        }
                    }
                }
            }
        }

        CartCommands::Add { asin } => {
            if !valid_asin(&asin) {
                return Err(ShopprobeError::Validation(format!(
                    "Catalog identifier must be 10 alphanumeric characters, got '{asin}'"
                ))
                .into());
            }

            let url = super::storefront_url(&domain, &format!("/dp/{asin}"));
            let html = super::acquire(config, session, Operation::AddToCart, &url).await?;
            let outcome = extract::atc::confirmation(&html);

            if !outcome.added {
                return Err(ShopprobeError::UnexpectedContent {
                    operation: Operation::AddToCart.slug().to_string(),
                    observed: outcome.confirmation,
                }
                .into());
            }
            info!("Added {} to cart", asin);

            match format {
                OutputFormat::Json => super::print_json(&outcome)?,
                OutputFormat::Simple => println!("✓ {}", outcome.confirmation),
            }
        }

        CartCommands::Clear => {
            let url = super::storefront_url(&domain, CART_PATH);
            let result = if config.mock {
                // Extraction-only source: count the deletable lines in the
                // newest cart snapshot, nothing to actually delete
                let source = SnapshotSource::new(config.snapshots_dir());
                let html = source.acquire(Operation::CartView, &url, &[]).await?;
                ClearCartResult {
                    observed: extract::cart::delete_control_count(&html),
                    removed: 0,
                }
            } else {
                let cookies = session.cookies().await;
                LiveSource::new(config).clear_cart(&url, &cookies).await?
            };

            match format {
                OutputFormat::Json => super::print_json(&result)?,
                OutputFormat::Simple => {
                    println!("Removed {} of {} items", result.removed, result.observed)
                }
            }
        }
    }
    Ok(())
}
