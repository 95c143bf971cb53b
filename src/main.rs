use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brain_preview::config::Config;
use brain_preview::preview::{classify, PreviewResolver};

/// Resolve preview metadata for a saved link and print it as JSON.
#[derive(Parser)]
#[command(name = "brain-preview", version, about)]
struct Cli {
    /// Link to resolve (http or https).
    url: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Only print the detected platform; makes no network calls.
    #[arg(long)]
    platform_only: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    // JSON in production, human-readable in dev. Logs go to stderr so stdout
    // stays pure JSON.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("brain_preview=info"));
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.platform_only {
        println!("{}", classify(&cli.url));
        return ExitCode::SUCCESS;
    }

    let resolver = match PreviewResolver::from_config(&config) {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    info!(url = %cli.url, "Resolving preview");
    let preview = match resolver.resolve(&cli.url).await {
        Ok(preview) => preview,
        Err(e) => {
            tracing::error!(error = %e, url = %cli.url, "Preview resolution failed");
            return ExitCode::FAILURE;
        }
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&preview)
    } else {
        serde_json::to_string(&preview)
    };
    match rendered {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize preview");
            ExitCode::FAILURE
        }
    }
}
