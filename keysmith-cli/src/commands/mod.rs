//! Command handlers and the arguments they share

pub mod config;
pub mod identity;
pub mod keys;

use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use keysmith_keys::{
    resolve_key_pair, write_secret_file, DerivationScheme, KeyPairMaterial, KeySource,
    MnemonicFile, Seed, SeedSource,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;
use zeroize::Zeroizing;

/// Output path meaning "write to stdout".
pub const STDOUT_PATH: &str = "-";

/// Where the seed comes from.
#[derive(Args, Debug, Default)]
pub struct SeedArgs {
    /// Seed file
    #[arg(short = 'f', long = "seed-file")]
    pub seed_file: Option<PathBuf>,

    /// Password protection: prompt for the seed passphrase
    #[arg(short = 'p', long = "protected")]
    pub protected: bool,
}

impl SeedArgs {
    pub fn seed_path(&self, config: &Config) -> PathBuf {
        self.seed_file
            .clone()
            .unwrap_or_else(|| config.seed_file.clone())
    }

    /// Load the seed, prompting for the passphrase when protected.
    pub fn load_seed(&self, config: &Config) -> Result<Seed> {
        let passphrase = if self.protected {
            Some(prompt_passphrase()?)
        } else {
            None
        };
        self.load_seed_with(config, passphrase)
    }

    fn load_seed_with(&self, config: &Config, passphrase: Option<Zeroizing<String>>) -> Result<Seed> {
        let path = self.seed_path(config);
        let mut source = MnemonicFile::new(&path);
        if let Some(passphrase) = passphrase {
            source = source.with_passphrase(passphrase);
        }
        debug!(?source, "loading seed");
        source
            .load()
            .with_context(|| format!("Failed to load seed from {}", path.display()))
    }
}

/// Where an identity key comes from: a seed plus index, or a raw private key.
#[derive(Args, Debug, Default)]
pub struct KeySourceArgs {
    #[command(flatten)]
    pub seed: SeedArgs,

    /// Derivation index; must be below 2^31 (hardened indices are rejected)
    #[arg(short = 'i', long = "index")]
    pub index: Option<u32>,

    /// Private key hex string; skips the seed file entirely
    #[arg(short = 'x', long = "private-key-hex")]
    pub private_key_hex: Option<String>,
}

impl KeySourceArgs {
    pub fn key_source(&self, config: &Config) -> Result<KeySource> {
        match self.private_key_hex.as_deref().filter(|hex| !hex.is_empty()) {
            Some(hex) => Ok(KeySource::FromRawScalar(Zeroizing::new(hex.to_string()))),
            None => Ok(KeySource::FromSeed {
                seed: self.seed.load_seed(config)?,
                index: self.index.unwrap_or(config.index),
            }),
        }
    }

    /// Resolve the arguments into key material along the default scheme.
    pub fn resolve(&self, config: &Config) -> Result<KeyPairMaterial> {
        let source = self.key_source(config)?;
        resolve_key_pair(&source, &DerivationScheme::default()).context("Failed to derive key")
    }
}

/// Prompt for the seed passphrase on the terminal.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    rpassword::prompt_password("Seed passphrase: ")
        .map(Zeroizing::new)
        .context("Failed to read passphrase")
}

/// Write secret output to `path`, or to stdout when `path` is `-`.
pub fn write_output(path: &str, contents: &[u8]) -> Result<()> {
    if path == STDOUT_PATH {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(contents)?;
        stdout.flush()?;
        return Ok(());
    }
    write_secret_file(path, contents).with_context(|| format!("Failed to write {}", path))
}
