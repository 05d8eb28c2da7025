//! One-shot client for the product search service.

use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use searchbox::backend::http::SearchClient;
use searchbox::backend::SearchError;
use searchbox::config;
use searchbox::render;

#[derive(Parser)]
#[command(name = "searchbox-query")]
#[command(about = "Query the product search service from the command line", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the search service (defaults to the config file value)
    #[arg(long)]
    endpoint: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products
    Search {
        /// Text sent as the `query` parameter, unmodified
        query: String,
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
    /// List completion suggestions for a partial name
    Suggest { query: String },
    /// Ask the service to re-index recently changed products
    Update,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Name, then indented price and details
    Text,
    /// One JSON object per line
    Json,
}

fn main() {
    searchbox::init_logging();
    let cli = Cli::parse();

    let config = config::load();
    let endpoint = cli.endpoint.unwrap_or(config.server.endpoint.clone());
    let timeout = cli.timeout.map(Duration::from_secs).or(config.server.timeout());

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("searchbox-query: failed to start runtime: {e}");
            process::exit(2);
        }
    };

    if let Err(e) = rt.block_on(run(&endpoint, timeout, cli.command)) {
        eprintln!("searchbox-query: {e}");
        process::exit(2);
    }
}

async fn run(endpoint: &str, timeout: Option<Duration>, command: Commands) -> Result<(), SearchError> {
    let client = SearchClient::new(endpoint, timeout)?;

    match command {
        Commands::Search { query, format } => {
            let results = client.search(&query).await?;
            tracing::debug!("{} results for '{}'", results.len(), query);
            match format {
                Format::Text => print!("{}", render::to_text(&render::blocks(&results))),
                Format::Json => {
                    for result in &results {
                        let line = serde_json::to_string(result)
                            .map_err(|e| SearchError::Decode(e.to_string()))?;
                        println!("{line}");
                    }
                }
            }
        }
        Commands::Suggest { query } => {
            for suggestion in client.suggestions(&query).await? {
                println!("{}", suggestion.text);
            }
        }
        Commands::Update => {
            let reply = client.refresh_index().await?;
            println!("{}", reply.trim_end());
        }
    }

    Ok(())
}
