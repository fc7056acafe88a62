use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::extract;
use crate::session::SessionController;
use crate::source::Operation;
use crate::types::OutputFormat;

const ORDER_HISTORY_PATH: &str = "/gp/css/order-history";

pub async fn handle_orders(
    config: &Config,
    session: &SessionController,
    format: OutputFormat,
) -> Result<()> {
    // Order history is account data: the profile must be confirmed first
    if !super::gate(session).await? {
        return Ok(());
    }

    let domain = session.domain().await;
    let url = super::storefront_url(&domain, ORDER_HISTORY_PATH);

    let html = super::acquire(config, session, Operation::Orders, &url).await?;
    let orders = extract::orders::order_history(&html);
    info!("Extracted {} orders", orders.len());

    match format {
        OutputFormat::Json => super::print_json(&orders)?,
        OutputFormat::Simple => {
            if orders.is_empty() {
                println!("No orders found");
            }
            for order in &orders {
                println!(
                    "{}  {}  {}  {}",
                    order.order_number,
                    order.date.as_deref().unwrap_or("-"),
                    order.total.as_deref().unwrap_or("-"),
                    order.status.as_deref().unwrap_or("-"),
                );
                for item in &order.items {
                    println!("    {}", item.title);
                }
            }
        }
    }
    Ok(())
}
