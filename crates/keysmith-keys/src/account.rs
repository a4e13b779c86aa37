// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Ledger account identifiers.
//!
//! ```text
//! hash       = SHA-224("\x0Aaccount-id" || principal || subaccount)   (28 bytes)
//! account_id = crc32(hash) || hash                                     (32 bytes)
//! ```

use crate::error::KeyError;
use crate::principal::PrincipalId;
use sha2::{Digest, Sha224};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Domain separator prepended to the account hash input.
pub const ACCOUNT_DOMAIN_SEPARATOR: &[u8] = b"\x0Aaccount-id";

pub const ACCOUNT_ID_LEN: usize = 32;
const CHECKSUM_LEN: usize = 4;

/// 32-byte discriminator selecting one of a principal's accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Subaccount(pub [u8; 32]);

impl Subaccount {
    /// Subaccount whose last eight bytes hold `n` big-endian.
    pub fn from_index(n: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }
}

/// How an account identifier is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountFormat {
    /// 64 lowercase hex characters, checksum included.
    #[default]
    Checksummed,
    /// The 28 hash bytes without checksum, as Candid `nat8` elements.
    BodyOnly,
}

/// A ledger account identifier (checksum + hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    pub fn new(principal: &PrincipalId, subaccount: &Subaccount) -> Self {
        let mut hasher = Sha224::new();
        hasher.update(ACCOUNT_DOMAIN_SEPARATOR);
        hasher.update(principal.as_slice());
        hasher.update(subaccount.0);
        let hash = hasher.finalize();

        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        bytes[..CHECKSUM_LEN].copy_from_slice(&crc32fast::hash(&hash).to_be_bytes());
        bytes[CHECKSUM_LEN..].copy_from_slice(&hash);
        Self(bytes)
    }

    /// Account of `principal` under the default (all-zero) subaccount.
    pub fn from_principal(principal: &PrincipalId) -> Self {
        Self::new(principal, &Subaccount::default())
    }

    /// Parse 64 hex characters, verifying the checksum.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|e| KeyError::Decoding(e.to_string()))?;
        if bytes.len() != ACCOUNT_ID_LEN {
            return Err(KeyError::Decoding(format!(
                "Invalid account identifier length: expected {}, got {}",
                ACCOUNT_ID_LEN,
                bytes.len()
            )));
        }
        let (checksum, body) = bytes.split_at(CHECKSUM_LEN);
        if checksum != crc32fast::hash(body).to_be_bytes() {
            return Err(KeyError::InvalidChecksum(format!("account {}", s)));
        }
        let mut arr = [0u8; ACCOUNT_ID_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    pub fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&self.0[..CHECKSUM_LEN]);
        checksum
    }

    /// The 28-byte hash, without the checksum.
    pub fn body(&self) -> &[u8] {
        &self.0[CHECKSUM_LEN..]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn render(&self, format: AccountFormat) -> String {
        match format {
            AccountFormat::Checksummed => self.to_hex(),
            AccountFormat::BodyOnly => self
                .body()
                .iter()
                .map(|b| format!("{}:nat8; ", b))
                .collect(),
        }
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for AccountId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
