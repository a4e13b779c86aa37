// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Error types for keysmith key derivation.

use thiserror::Error;

/// Errors that can occur while deriving or encoding keys.
///
/// Every variant is terminal: the operations are deterministic, so retrying
/// with the same input yields the same error.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid private key hex: {0}")]
    InvalidHexEncoding(String),

    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    #[error("Failed to load seed: {0}")]
    SeedLoad(String),

    #[error("Hardened index {0:#010x} is not allowed at this derivation level")]
    InvalidDerivationIndex(u32),

    #[error("Maximum derivation depth exceeded")]
    DepthOverflow,

    #[error("Key pair has no private key")]
    MissingPrivateKey,

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Checksum mismatch: {0}")]
    InvalidChecksum(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
