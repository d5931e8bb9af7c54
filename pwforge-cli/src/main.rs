//! pwforge CLI
//!
//! Command-line interface for managing Passwork vaults, folders and password
//! entries through the pwforge engines.
//!
//! # Usage
//!
//! ```bash
//! # Create a private vault with a generated master password
//! pwforge vault create ops
//!
//! # Create a folder inside it
//! pwforge folder create project-x --vault <VAULT_ID>
//!
//! # Find an entry by name and show its secret
//! pwforge --reveal password find --vault <VAULT_ID> --name db
//! ```
//!
//! Connection settings come from `--config`, the default config file, or
//! `PASSWORK_HOST` / `PASSWORK_API_KEY`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pwforge_client::{ClientConfig, PassworkClient};
use pwforge_core::Provider;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "pwforge")]
#[command(about = "Manage Passwork vaults, folders and password entries")]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print secrets instead of redacting them
    #[arg(long, global = true)]
    reveal: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage vaults
    #[command(subcommand)]
    Vault(VaultCommand),

    /// Manage folders
    #[command(subcommand)]
    Folder(FolderCommand),

    /// Manage password entries
    #[command(subcommand)]
    Password(PasswordCommand),

    /// Show an existing entity as it would be adopted under management
    Import {
        /// Resource kind
        kind: Kind,

        /// Remote identifier
        id: String,
    },
}

#[derive(Subcommand)]
enum VaultCommand {
    /// Show a vault
    Get { id: String },

    /// Create a vault
    Create {
        name: String,

        /// Make the vault visible to others (vaults are private by default)
        #[arg(long)]
        shared: bool,

        /// Master password (generated when omitted)
        #[arg(long)]
        master_password: Option<String>,
    },

    /// Rename a vault
    Rename { id: String, name: String },

    /// Delete a vault
    Delete { id: String },
}

#[derive(Subcommand)]
enum FolderCommand {
    /// Show a folder
    Get { id: String },

    /// Create a folder
    Create {
        name: String,

        /// Owning vault
        #[arg(long)]
        vault: String,

        /// Parent folder (top-level when omitted)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Rename a folder
    Rename { id: String, name: String },

    /// Delete a folder
    Delete { id: String },
}

#[derive(Subcommand)]
enum PasswordCommand {
    /// Show an entry
    Get { id: String },

    /// Create an entry
    Create {
        name: String,

        /// Owning vault
        #[arg(long)]
        vault: String,

        #[command(flatten)]
        fields: EntryFields,
    },

    /// Change attributes of an entry
    Update {
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: EntryFields,
    },

    /// Delete an entry
    Delete { id: String },

    /// Look up an entry by id or by name within a vault
    Find {
        /// Vault to search in
        #[arg(long)]
        vault: String,

        #[arg(long, conflicts_with = "name")]
        id: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },
}

/// Optional entry attributes shared by create and update.
#[derive(Args, Debug, Default)]
struct EntryFields {
    /// Containing folder
    #[arg(long)]
    folder: Option<String>,

    #[arg(long)]
    login: Option<String>,

    /// Secret value
    #[arg(long)]
    password: Option<String>,

    #[arg(long)]
    url: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Color tag (0 clears it)
    #[arg(long)]
    color: Option<u32>,

    /// Tag, repeatable; order is kept
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    Vault,
    Folder,
    Password,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ClientConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    debug!("connecting to {}", config.host);

    let client = Arc::new(
        PassworkClient::connect(&config)
            .await
            .with_context(|| format!("failed to log in to {}", config.host))?,
    );
    let provider = Provider::new(client.clone());

    let result = commands::run(&provider, cli.command).await;
    client.logout().await;

    let rendered = result?.render(cli.reveal)?;
    println!("{}", rendered);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
