// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Keysmith key derivation library.
//!
//! This crate provides:
//! - BIP-39 seed loading and BIP-32 derivation along `m/44'/223'/0'/0/{index}`
//! - Principal and ledger account identifiers for derived keys
//! - Legacy (Ethereum-style) addresses
//! - PEM and extended key (`xprv` / `xpub`) output

// Suppress warning from zeroize macro
#![allow(unused_assignments)]

pub mod account;
pub mod address_derive;
pub mod codec;
pub mod error;
pub mod key_derive;
pub mod key_pair;
pub mod keypair_file;
pub mod principal;
pub mod seed;

pub use account::{AccountFormat, AccountId, Subaccount};
pub use address_derive::EthereumAddress;
pub use error::KeyError;
pub use key_derive::{
    derive_account_root, derive_grandchild, derive_master, ChildNumber, DerivationScheme,
    ExtendedPrivateKey, ExtendedPublicKey,
};
pub use key_pair::{resolve_key_pair, KeyPairMaterial, KeySource};
pub use keypair_file::write_secret_file;
pub use principal::PrincipalId;
pub use seed::{MnemonicFile, Seed, SeedSource, DEFAULT_SEED_FILE};
