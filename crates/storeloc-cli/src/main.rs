mod query;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storeloc")]
#[command(about = "Store locator scraper and query tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the store locator page and write the dataset file
    Scrape {
        /// Locator page URL (overrides the locator config)
        #[arg(long)]
        url: Option<String>,
        /// Text typed into the locator search box (overrides the locator config)
        #[arg(long)]
        location: Option<String>,
        /// Dataset file to write (defaults to `STORELOC_DATABASE_PATH`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Geocode one address and print its coordinates
    Geocode {
        /// Free-form address
        address: String,
    },
    /// List stores within a radius of a named store
    Catchment {
        /// Exact store name as it appears in the dataset
        #[arg(long)]
        store_name: String,
        /// Radius in kilometres
        #[arg(long)]
        distance: u32,
        /// Dataset file to read (defaults to `STORELOC_DATABASE_PATH`)
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storeloc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape {
            url,
            location,
            output,
        } => scrape::run_scrape(&config, url, location, output).await,
        Commands::Geocode { address } => query::run_geocode(&config, &address).await,
        Commands::Catchment {
            store_name,
            distance,
            database,
        } => query::run_catchment(&config, &store_name, distance, database.as_deref()),
    }
}
