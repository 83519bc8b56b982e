//! Maretempo CLI - coastal conditions for Brazilian beaches
//!
//! Resolves the requested location and date, aggregates weather, tides, wind
//! and a fishing forecast, and prints the result as pretty JSON on stdout.
//! Logs go to stderr so the JSON stream stays clean.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use maretempo::aggregator::{AggregateResult, Aggregator};
use maretempo::cli::{self, Cli};
use maretempo::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("maretempo=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let request = match cli::resolve_request(&cli) {
        Ok(request) => request,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    };

    let result = if cli.offline {
        AggregateResult::fully_synthetic(&request, "offline mode, providers not contacted")
    } else {
        let config = Config::from_env();
        let aggregator = Aggregator::new(&config);
        aggregator.fetch(&request).await
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
