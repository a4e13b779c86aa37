//! Configuration management

use anyhow::{Context, Result};
use keysmith_keys::DEFAULT_SEED_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default PEM output for `private-key`.
pub const DEFAULT_PEM_FILE: &str = "identity.pem";

/// Default output for `x-private-key`.
pub const DEFAULT_XPRV_FILE: &str = "xprv.txt";

/// CLI configuration. Command-line flags override every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed file holding the mnemonic
    pub seed_file: PathBuf,

    /// Output file for `private-key`
    pub output_file: String,

    /// Output file for `x-private-key`
    pub xprv_file: String,

    /// Derivation index used when `-i` is absent
    pub index: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_file: PathBuf::from(DEFAULT_SEED_FILE),
            output_file: DEFAULT_PEM_FILE.to_string(),
            xprv_file: DEFAULT_XPRV_FILE.to_string(),
            index: 0,
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load the explicit config if given, else the default one when present.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Ok(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".keysmith").join("config.toml"))
    }

    /// Initialize config directory and file
    pub fn init(path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        // Create directory if not exists
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Create default config if not exists
        if !config_path.exists() {
            Config::default().save(&config_path)?;
        }

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let written = Config::init(Some(&path)).unwrap();
        assert_eq!(written, path);
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_keeps_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "index = 7\n").unwrap();

        Config::init(Some(&path)).unwrap();
        assert_eq!(Config::load(&path).unwrap().index, 7);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "seed_file = \"/secure/seed.txt\"\n").unwrap();

        let config = Config::resolve(Some(&path)).unwrap();
        assert_eq!(config.seed_file, PathBuf::from("/secure/seed.txt"));
        assert_eq!(config.output_file, DEFAULT_PEM_FILE);
        assert_eq!(config.index, 0);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        assert!(Config::resolve(Some(Path::new("/nonexistent/config.toml"))).is_err());
    }
}
