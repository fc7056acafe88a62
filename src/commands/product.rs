use anyhow::Result;

use crate::config::Config;
use crate::errors::ShopprobeError;
use crate::extract;
use crate::session::SessionController;
use crate::source::Operation;
use crate::types::{OutputFormat, valid_asin};

pub async fn handle_product(
    config: &Config,
    session: &SessionController,
    asin: String,
    format: OutputFormat,
) -> Result<()> {
    if !valid_asin(&asin) {
        return Err(ShopprobeError::Validation(format!(
            "Catalog identifier must be 10 alphanumeric characters, got '{asin}'"
        ))
        .into());
    }

    let domain = session.domain().await;
    let url = super::storefront_url(&domain, &format!("/dp/{asin}"));

    let html = super::acquire(config, session, Operation::Product, &url).await?;
    let detail = extract::product::product_detail(&html, &asin)?;

    match format {
        OutputFormat::Json => super::print_json(&detail)?,
        OutputFormat::Simple => {
            println!("{}  {}", detail.asin, detail.title);
            if let Some(price) = &detail.price {
                println!("Price: {}", price);
            }
            if let Some(reviews) = &detail.reviews {
                println!("Rating: {} ({} ratings)", reviews.rating, reviews.count);
            }
            if detail.subscribe_and_save {
                println!("Subscribe & Save available");
            }
        }
    }
    Ok(())
}
