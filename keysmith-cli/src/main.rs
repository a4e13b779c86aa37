//! Keysmith CLI - regenerate identities from a seed phrase
//!
//! Usage:
//!   keysmith principal -f seed.txt -i 0
//!   keysmith account -b
//!   keysmith private-key -p -o identity.pem
//!   keysmith public-key -x <private key hex>
//!   keysmith x-public-key

mod commands;
mod config;

use clap::{Parser, Subcommand};
use commands::{KeySourceArgs, SeedArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keysmith")]
#[command(about = "Keysmith - derive identities, accounts and keys from a seed phrase", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Key(KeyCommand),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Commands that derive or print key material.
#[derive(Subcommand)]
enum KeyCommand {
    /// Print the account identifier
    Account {
        #[command(flatten)]
        source: KeySourceArgs,

        /// Without checksum bytes
        #[arg(short = 'b', long = "body-only")]
        body_only: bool,
    },

    /// Print the legacy address
    LegacyAddress {
        #[command(flatten)]
        source: KeySourceArgs,
    },

    /// Print the principal
    Principal {
        #[command(flatten)]
        source: KeySourceArgs,
    },

    /// Write the private key in PEM format
    PrivateKey {
        #[command(flatten)]
        source: KeySourceArgs,

        /// Output file ("-" for stdout); an existing file is never overwritten
        #[arg(short = 'o', long = "output")]
        output: Option<String>,
    },

    /// Print the uncompressed public key
    PublicKey {
        #[command(flatten)]
        source: KeySourceArgs,
    },

    /// Print the extended public key of the account root
    XPublicKey {
        #[command(flatten)]
        seed: SeedArgs,
    },

    /// Write the extended private key of the account root
    XPrivateKey {
        #[command(flatten)]
        seed: SeedArgs,

        /// Output file ("-" for stdout); an existing file is never overwritten
        #[arg(short = 'o', long = "output")]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize configuration
    Init {
        /// Config file path
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config { action } => commands::config::handle(action, config_path),
        Commands::Key(command) => execute(command, &config::Config::resolve(config_path)?),
    }
}

fn execute(command: KeyCommand, config: &config::Config) -> anyhow::Result<()> {
    match command {
        KeyCommand::Account { source, body_only } => {
            println!("{}", commands::identity::account(&source, body_only, config)?);
        }
        KeyCommand::LegacyAddress { source } => {
            println!("{}", commands::identity::legacy_address(&source, config)?);
        }
        KeyCommand::Principal { source } => {
            println!("{}", commands::identity::principal(&source, config)?);
        }
        KeyCommand::PrivateKey { source, output } => {
            commands::keys::private_key(&source, output.as_deref(), config)?;
        }
        KeyCommand::PublicKey { source } => {
            println!("{}", commands::keys::public_key(&source, config)?);
        }
        KeyCommand::XPublicKey { seed } => {
            println!("{}", commands::keys::x_public_key(&seed, config)?);
        }
        KeyCommand::XPrivateKey { seed, output } => {
            commands::keys::x_private_key(&seed, output.as_deref(), config)?;
        }
    }

    Ok(())
}
