mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use client::DeckwiseClient;
use deckwise::config;
use output::{OutputConfig, OutputFormat};
use std::process;

/// CLI for the Deckwise progress server
#[derive(Parser, Debug)]
#[clap(name = "deckwise-cli", about = "CLI for the Deckwise progress server")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "DECKWISE_URL", global = true)]
    server_url: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just hashes or counts)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fingerprint a deck file locally
    Fingerprint(commands::fingerprint::FingerprintArgs),
    /// Record a review of one card
    Review(commands::review::ReviewArgs),
    /// Show what each review button would schedule for a card
    Preview(commands::review::PreviewArgs),
    /// Show a user's progress on a deck file
    Progress(commands::progress::ProgressArgs),
    /// Show the stored states of specific cards
    States(commands::progress::StatesArgs),
    /// Delete a user's progress on a deck file
    Reset(commands::progress::ResetArgs),
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    let config_path = config::get_config_dir_path().map(|dir| dir.join("config.toml"));
    if let Ok(update) = config::config_from_file(config_path) {
        if let Some(url) = update.server_url {
            return url;
        }
    }

    config::DEFAULT_SERVER_URL.to_string()
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("Connection refused")
        || err_string.contains("connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!("Could not connect to server. Is deckwise running?\n  {}", err_string);
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let server_url = cli.server_url;
    let connect = move || DeckwiseClient::new(resolve_server_url(server_url.clone()));

    let result = match cli.command {
        Commands::Fingerprint(args) => commands::fingerprint::execute(args, &output_config),
        Commands::Review(args) => commands::review::execute_review(&connect(), args, &output_config).await,
        Commands::Preview(args) => commands::review::execute_preview(&connect(), args, &output_config).await,
        Commands::Progress(args) => commands::progress::execute_progress(&connect(), args, &output_config).await,
        Commands::States(args) => commands::progress::execute_states(&connect(), args, &output_config).await,
        Commands::Reset(args) => commands::progress::execute_reset(&connect(), args, &output_config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
