//! Console CLI - Command-line front end for the registrar administration console
//!
//! Each subcommand is one console view backed by the console API.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console_client::ConsoleClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::domains::DomainListArgs;
use crate::config::{Config, MergedConfig};
use crate::output::{OutputContext, OutputFormat, TerminalNavigator};

#[derive(Parser)]
#[command(name = "console-cli")]
#[command(author, version, about = "Registrar Console CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Server URL [default: http://localhost:8080]
    #[arg(short, long, env = "CONSOLE_SERVER")]
    server: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "CONSOLE_CONFIG")]
    config: Option<PathBuf>,

    /// Bearer token for the console API
    #[arg(long, env = "CONSOLE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output format [default: table]
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signed-in user
    Whoami,

    /// List registrars
    Registrars,

    /// Create or update a registrar from a JSON file
    SaveRegistrar {
        /// Registrar JSON file
        file: PathBuf,
    },

    /// List or replace registrar contacts
    Contacts {
        /// Registrar ID
        registrar: String,

        /// Replace all contacts with the list in this JSON file
        #[arg(long, value_name = "FILE")]
        set: Option<PathBuf>,
    },

    /// List a registrar's domains
    Domains {
        /// Registrar ID
        registrar: String,

        /// Checkpoint time returned by a previous page
        #[arg(long)]
        checkpoint_time: Option<String>,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Results per page
        #[arg(long)]
        per_page: Option<u32>,

        /// Total results returned by a previous page
        #[arg(long)]
        total: Option<u64>,

        /// Domain name search term
        #[arg(long)]
        search: Option<String>,
    },

    /// Show or replace security settings
    Security {
        /// Registrar ID
        registrar: String,

        /// Replace settings with the JSON file
        #[arg(long, value_name = "FILE")]
        set: Option<PathBuf>,
    },

    /// Change the EPP password
    Password {
        /// Registrar ID
        registrar: String,

        /// Current password
        #[arg(long, env = "CONSOLE_OLD_PASSWORD", hide_env_values = true)]
        old: String,

        /// New password
        #[arg(long, env = "CONSOLE_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },

    /// Update WHOIS-published fields from a JSON file
    Whois {
        /// WHOIS fields JSON file
        file: PathBuf,
    },

    /// Show a registrar's RDAP/WHOIS details
    Rdap {
        /// Registrar ID
        registrar: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(
        cli.server.as_deref(),
        cli.token.as_deref(),
        cli.output.map(|o| o.as_str()),
        cli.no_color,
    );

    let format = OutputFormat::from_str(&merged.output, true)
        .map_err(|e| anyhow::anyhow!("Invalid output format '{}': {}", merged.output, e))?;
    if merged.no_color {
        colored::control::set_override(false);
    }
    let ctx = OutputContext::new(format, cli.quiet);

    debug!(server = %merged.server, api_prefix = %merged.api_prefix, "Using console server");
    let client = create_client(&merged)?;

    // Execute command
    match &cli.command {
        Commands::Whoami => commands::whoami(&client, &ctx).await?,

        Commands::Registrars => commands::registrars(&client, &ctx).await?,

        Commands::SaveRegistrar { file } => commands::save_registrar(&client, file, &ctx).await?,

        Commands::Contacts { registrar, set } => {
            commands::contacts(&client, registrar, set.as_deref(), &ctx).await?;
        }

        Commands::Domains {
            registrar,
            checkpoint_time,
            page,
            per_page,
            total,
            search,
        } => {
            let args = DomainListArgs {
                checkpoint_time: checkpoint_time.clone(),
                page: *page,
                per_page: *per_page,
                total: *total,
                search: search.clone(),
            };
            commands::domains(&client, registrar, &args, &ctx).await?;
        }

        Commands::Security { registrar, set } => {
            commands::security(&client, registrar, set.as_deref(), &ctx).await?;
        }

        Commands::Password { registrar, old, new } => {
            commands::password(&client, registrar, old, new, &ctx).await?;
        }

        Commands::Whois { file } => commands::whois(&client, file, &ctx).await?,

        Commands::Rdap { registrar } => commands::rdap(&client, registrar, &ctx).await?,
    }

    Ok(())
}

/// Create a console client from the merged configuration
fn create_client(config: &MergedConfig) -> Result<ConsoleClient> {
    let client = match config.token.as_deref() {
        Some(token) => ConsoleClient::with_bearer_token(&config.server, token),
        None => ConsoleClient::new(&config.server),
    }
    .context("Failed to create console client")?;

    Ok(client
        .with_api_prefix(&config.api_prefix)
        .with_legacy_redirect_path(&config.legacy_redirect_path)
        .with_navigator(Arc::new(TerminalNavigator)))
}
