use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopprobe::commands::{self, cart::CartCommands, profile::ProfileCommands};
use shopprobe::config::Config;
use shopprobe::cookies::CookieStore;
use shopprobe::errors;
use shopprobe::session::SessionController;
use shopprobe::types::OutputFormat;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const _EXIT_COMMAND_ERROR: i32 = 1;
const _EXIT_VALIDATION: i32 = 2;
const _EXIT_NOT_FOUND: i32 = 3;
const _EXIT_AUTH_REQUIRED: i32 = 4;
const _EXIT_CONTENT_MISSING: i32 = 5;
const _EXIT_BROWSER_FAILED: i32 = 6;

#[derive(Parser)]
#[command(name = "shopprobe")]
#[command(about = "Drive an Amazon storefront from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Profile to operate as (switches before the command runs)
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Confirm the active profile for identity-scoped commands
    #[arg(long, global = true)]
    confirm: bool,

    /// Serve markup from captured snapshots instead of a live browser
    #[arg(long, global = true)]
    mock: bool,

    /// Capture page markup to timestamped snapshot files
    #[arg(long, global = true)]
    capture: bool,

    /// Run the browser with a visible window
    #[arg(long = "no-headless", global = true)]
    no_headless: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// Search query
        query: String,

        /// Keep only the first N results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Fetch product detail by catalog identifier
    Product {
        /// Catalog identifier (10-character code)
        asin: String,
    },

    /// View or modify the shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },

    /// List order history
    Orders,

    /// Manage cookie profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            let exit_code = errors::exit_code_for(&err);

            // JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": format!("{err:#}"),
                "exit_code": exit_code,
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Human-readable line on stderr
            eprintln!("Error: {err:#}");
            std::process::exit(exit_code);
        }
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("SHOPPROBE_LOG")
                .unwrap_or_else(|_| "shopprobe=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.mock, cli.capture, cli.no_headless)?;
    let store = CookieStore::open(&config)?;
    let session = SessionController::new(store, &config);

    // Apply identity flags before the command runs: --profile switches (and
    // clears any confirmation), --confirm confirms, together they do both in
    // one step, mirroring a confirm/switch resubmission from an agent.
    match (cli.profile.as_deref(), cli.confirm) {
        (Some(profile), true) => {
            session.confirm_session(Some(profile)).await?;
        }
        (Some(profile), false) => {
            session.switch_profile(profile).await?;
        }
        (None, true) => {
            session.confirm_session(None).await?;
        }
        (None, false) => {}
    }

    match cli.command {
        Commands::Search { query, limit } => {
            commands::search::handle_search(&config, &session, query, limit, cli.format).await?
        }

        Commands::Product { asin } => {
            commands::product::handle_product(&config, &session, asin, cli.format).await?
        }

        Commands::Cart { command } => {
            commands::cart::handle_cart(&config, &session, command, cli.format).await?
        }

        Commands::Orders => commands::orders::handle_orders(&config, &session, cli.format).await?,

        Commands::Profile { command } => {
            commands::profile::handle_profile(&config, &session, command, cli.format).await?
        }

        Commands::Version => {
            println!(
                "{}",
                json!({
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                })
            );
        }
    }

    Ok(())
}
