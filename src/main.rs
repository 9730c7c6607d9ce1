use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

/// pantry - Match what is in your kitchen against a recipe corpus
#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Pantry-aware recipe matching and coverage ranking", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Import recipes from a JSON array
    Import {
        /// JSON file holding the recipes
        file: PathBuf,
    },
    /// List distinct recipe source domains
    Sources,
    /// Rank recipes for a query request
    Query {
        /// Request JSON file, `-` reads stdin
        #[arg(long, default_value = "-")]
        request: String,

        /// Keep at most this many results
        #[arg(long)]
        top_k: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = pantry::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    pantry::observability::init_observability(
        "pantry",
        env!("CARGO_PKG_VERSION"),
        &config.observability,
    )?;

    match cli.command {
        Commands::Migrate => cli::migrate::migrate(config).await,
        Commands::Import { file } => cli::recipe::import(config, file).await,
        Commands::Sources => cli::recipe::sources(config).await,
        Commands::Query { request, top_k } => cli::query::query(config, request, top_k).await,
    }
}
