// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Legacy (Ethereum-style) address derivation from secp256k1 public keys.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use sha3::{Digest, Keccak256};

/// Ethereum-style address (20 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthereumAddress(pub [u8; 20]);

impl EthereumAddress {
    /// Derive from a public key.
    ///
    /// Algorithm:
    /// 1. Take the uncompressed public key (65 bytes: 0x04 || x || y)
    /// 2. Remove the 0x04 prefix (64 bytes)
    /// 3. Compute Keccak256 hash
    /// 4. Take the last 20 bytes as the address
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let point = public_key.to_encoded_point(false);
        let hash = Keccak256::digest(&point.as_bytes()[1..]);

        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        Self(address)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex, no prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for EthereumAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
