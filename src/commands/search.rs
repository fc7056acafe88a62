use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::extract;
use crate::session::SessionController;
use crate::source::Operation;
use crate::types::OutputFormat;

pub async fn handle_search(
    config: &Config,
    session: &SessionController,
    query: String,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let domain = session.domain().await;
    let url = super::search_url(&domain, &query)?;

    let html = super::acquire(config, session, Operation::Search, &url).await?;
    let mut results = extract::search::search_results(&html);
    info!("Extracted {} search results for \"{}\"", results.len(), query);

    if let Some(limit) = limit {
        results.truncate(limit);
    }

    match format {
        OutputFormat::Json => super::print_json(&results)?,
        OutputFormat::Simple => {
            if results.is_empty() {
                println!("No results for \"{}\"", query);
            }
            for result in &results {
                let mut badges = String::new();
                if result.prime {
                    badges.push_str(" [prime]");
                }
                if result.sponsored {
                    badges.push_str(" [sponsored]");
                }
                println!(
                    "{}  {:>10}  {}{}",
                    result.asin, result.price, result.title, badges
                );
            }
        }
    }
    Ok(())
}
