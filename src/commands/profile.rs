use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::json;
use std::io::Read;

use crate::config::Config;
use crate::cookies::storefront_domain;
use crate::session::SessionController;
use crate::types::OutputFormat;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List all saved profiles
    List,

    /// Validate and overwrite a profile's cookies
    Save {
        /// Profile name (lowercase letters, digits, hyphens)
        name: String,

        /// Cookie payload: path to a JSON file, or '-' for stdin
        #[arg(long)]
        cookies: String,
    },
}

pub async fn handle_profile(
    config: &Config,
    session: &SessionController,
    command: ProfileCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ProfileCommands::List => {
            let profiles = session.store().list()?;
            let active = session.active_profile().await;

            match format {
                OutputFormat::Json => super::print_json(&json!({
                    "active": active,
                    "profiles": profiles,
                }))?,
                OutputFormat::Simple => {
                    if profiles.is_empty() {
                        println!("No profiles found");
                        return Ok(());
                    }
                    println!("{:<24} {:>8}  {}", "Name", "Cookies", "Domain");
                    println!("{}", "-".repeat(48));
                    for profile in profiles {
                        let name = if profile.name == active {
                            format!("{} (active)", profile.name)
                        } else {
                            profile.name.clone()
                        };
                        println!(
                            "{:<24} {:>8}  {}",
                            name,
                            profile.cookies,
                            profile.domain.as_deref().unwrap_or("-")
                        );
                    }
                }
            }
        }

        ProfileCommands::Save { name, cookies } => {
            let payload = if cookies == "-" {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Unable to read cookie payload from stdin")?;
                buffer
            } else {
                std::fs::read_to_string(&cookies)
                    .with_context(|| format!("Unable to read cookie file {cookies}"))?
            };

            let saved = session.store().save(&name, &payload)?;
            let domain = storefront_domain(&saved, &config.brand_token);

            match format {
                OutputFormat::Json => super::print_json(&json!({
                    "profile": name,
                    "cookies": saved.len(),
                    "domain": domain,
                }))?,
                OutputFormat::Simple => println!(
                    "✓ Saved profile '{}' ({} cookies, domain {})",
                    name,
                    saved.len(),
                    domain.as_deref().unwrap_or("unknown")
                ),
            }
        }
    }
    Ok(())
}
