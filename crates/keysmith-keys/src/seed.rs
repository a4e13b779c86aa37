// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Seed material and the sources it is loaded from.
//!
//! A seed file holds a BIP-39 mnemonic phrase. Loading it yields the 64-byte
//! BIP-39 seed, stretched with an optional passphrase. Prompting for that
//! passphrase is left to the caller.

use crate::error::KeyError;
use bip39::{Language, Mnemonic};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use zeroize::Zeroizing;

/// Default seed file name.
pub const DEFAULT_SEED_FILE: &str = "seed.txt";

/// Raw seed bytes, wiped on drop.
#[derive(Clone)]
pub struct Seed(Zeroizing<Vec<u8>>);

impl Seed {
    /// Wrap raw seed bytes. Fails on an empty seed.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.is_empty() {
            return Err(KeyError::InvalidSeed("seed is empty".to_string()));
        }
        Ok(Self(bytes))
    }

    /// Stretch a mnemonic phrase into its BIP-39 seed.
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self, KeyError> {
        let phrase = Zeroizing::new(phrase.trim().to_string());
        if phrase.is_empty() {
            return Err(KeyError::InvalidSeed("mnemonic is empty".to_string()));
        }
        let mnemonic = Mnemonic::parse_in(Language::English, phrase.as_str())
            .map_err(|e| KeyError::SeedLoad(format!("invalid mnemonic: {}", e)))?;
        let seed = Zeroizing::new(mnemonic.to_seed(passphrase));
        Ok(Self(Zeroizing::new(seed.to_vec())))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({} bytes)", self.0.len())
    }
}

/// Anything that can hand out seed bytes.
pub trait SeedSource {
    fn load(&self) -> Result<Seed, KeyError>;
}

/// A seed file containing a mnemonic phrase, optionally protected by a
/// BIP-39 passphrase.
pub struct MnemonicFile {
    path: PathBuf,
    passphrase: Option<Zeroizing<String>>,
}

impl MnemonicFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            passphrase: None,
        }
    }

    /// Apply a passphrase when stretching the mnemonic.
    pub fn with_passphrase(mut self, passphrase: Zeroizing<String>) -> Self {
        self.passphrase = Some(passphrase);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_protected(&self) -> bool {
        self.passphrase.is_some()
    }
}

impl SeedSource for MnemonicFile {
    fn load(&self) -> Result<Seed, KeyError> {
        let contents = std::fs::read_to_string(&self.path)
            .map(Zeroizing::new)
            .map_err(|e| {
                KeyError::SeedLoad(format!("cannot read {}: {}", self.path.display(), e))
            })?;
        if contents.trim().is_empty() {
            return Err(KeyError::InvalidSeed(format!(
                "seed file {} is empty",
                self.path.display()
            )));
        }

        let passphrase = self.passphrase.as_ref().map(|p| p.as_str()).unwrap_or("");
        let seed = Seed::from_mnemonic(&contents, passphrase)?;
        debug!(
            path = %self.path.display(),
            protected = self.is_protected(),
            "loaded seed"
        );
        Ok(seed)
    }
}

impl fmt::Debug for MnemonicFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicFile")
            .field("path", &self.path)
            .field("protected", &self.is_protected())
            .finish()
    }
}
