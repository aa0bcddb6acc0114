use std::path::PathBuf;

use clap::{Parser, Subcommand};
use salesboard_core::{DataSources, SalesQuery, SystemClock};
use salesboard_ingest::OrderRepository;

#[derive(Debug, Parser)]
#[command(name = "salesboard-cli")]
#[command(about = "Load and inspect pending-order data offline")]
struct Cli {
    /// Gzip order table; defaults to `SALESBOARD_ORDERS_PATH`.
    #[arg(long, global = true)]
    orders: Option<PathBuf>,

    /// Store table; defaults to `SALESBOARD_STORES_PATH`.
    #[arg(long, global = true)]
    stores: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full load and print what was kept and dropped.
    Load,
    /// Run a full load and print one page of results.
    Query {
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        limit: Option<String>,
        /// `asc` or `desc`; anything else sorts descending.
        #[arg(long)]
        sort: Option<String>,
    },
}

impl Cli {
    fn sources(&self, defaults: DataSources) -> DataSources {
        DataSources {
            orders_path: self.orders.clone().unwrap_or(defaults.orders_path),
            stores_path: self.stores.clone().unwrap_or(defaults.stores_path),
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = salesboard_core::load_app_config()?;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let sources = cli.sources(config.sources);
    let repository = OrderRepository::new();
    let report = repository.load(&sources, &SystemClock)?;

    match cli.command {
        Commands::Load => println!("{}", serde_json::to_string_pretty(&report)?),
        Commands::Query { page, limit, sort } => {
            let query = SalesQuery::from_raw(page.as_deref(), limit.as_deref(), sort.as_deref());
            let page = repository.query(&query)?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }

    Ok(())
}
