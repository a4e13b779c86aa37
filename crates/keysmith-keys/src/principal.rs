// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Self-authenticating principal identifiers.
//!
//! Raw form: `SHA-224(DER(public key)) || 0x02`.
//! Textual form: `base32(crc32(raw) || raw)`, lowercase, unpadded, grouped
//! into chunks of five characters separated by `-`.

use crate::error::KeyError;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use sha2::{Digest, Sha224};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Maximum length of a principal in bytes.
pub const MAX_PRINCIPAL_LEN: usize = 29;

/// Trailing tag of principals derived from a public key.
pub const SELF_AUTHENTICATING_TAG: u8 = 0x02;

/// DER `SubjectPublicKeyInfo` header for an uncompressed secp256k1 point
/// (id-ecPublicKey, secp256k1, 66-byte BIT STRING).
pub const SECP256K1_SPKI_PREFIX: [u8; 23] = [
    0x30, 0x56, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05,
    0x2b, 0x81, 0x04, 0x00, 0x0a, 0x03, 0x42, 0x00,
];

const CHECKSUM_LEN: usize = 4;
const GROUP_LEN: usize = 5;
const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// A platform principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrincipalId {
    len: u8,
    bytes: [u8; MAX_PRINCIPAL_LEN],
}

impl PrincipalId {
    /// The principal a public key authenticates as.
    pub fn self_authenticating(public_key: &PublicKey) -> Self {
        let der = der_encode_public_key(public_key);
        let hash = Sha224::digest(der);

        let mut bytes = [0u8; MAX_PRINCIPAL_LEN];
        bytes[..hash.len()].copy_from_slice(&hash);
        bytes[hash.len()] = SELF_AUTHENTICATING_TAG;
        Self {
            len: MAX_PRINCIPAL_LEN as u8,
            bytes,
        }
    }

    /// Wrap raw principal bytes.
    pub fn from_slice(raw: &[u8]) -> Result<Self, KeyError> {
        if raw.len() > MAX_PRINCIPAL_LEN {
            return Err(KeyError::Decoding(format!(
                "principal is {} bytes, at most {} allowed",
                raw.len(),
                MAX_PRINCIPAL_LEN
            )));
        }
        let mut bytes = [0u8; MAX_PRINCIPAL_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self {
            len: raw.len() as u8,
            bytes,
        })
    }

    /// Parse the textual form, verifying the checksum.
    pub fn from_text(text: &str) -> Result<Self, KeyError> {
        let compact: String = text.chars().filter(|c| *c != '-').collect();
        let decoded = base32_decode(&compact.to_ascii_lowercase())?;
        if decoded.len() < CHECKSUM_LEN {
            return Err(KeyError::Decoding("principal text is too short".to_string()));
        }
        let (checksum, raw) = decoded.split_at(CHECKSUM_LEN);
        if checksum != crc32fast::hash(raw).to_be_bytes() {
            return Err(KeyError::InvalidChecksum(format!("principal {}", text)));
        }
        let principal = Self::from_slice(raw)?;
        // Reject non-canonical spellings (grouping, case).
        if principal.to_text() != text {
            return Err(KeyError::Decoding(format!(
                "principal {} is not in canonical form",
                text
            )));
        }
        Ok(principal)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn to_text(&self) -> String {
        let raw = self.as_slice();
        let mut buf = Vec::with_capacity(CHECKSUM_LEN + raw.len());
        buf.extend_from_slice(&crc32fast::hash(raw).to_be_bytes());
        buf.extend_from_slice(raw);

        let encoded = base32_encode(&buf);
        encoded
            .as_bytes()
            .chunks(GROUP_LEN)
            .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for PrincipalId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

/// DER-encode an uncompressed secp256k1 public key as `SubjectPublicKeyInfo`.
pub fn der_encode_public_key(public_key: &PublicKey) -> Vec<u8> {
    let point = public_key.to_encoded_point(false);
    let mut der = Vec::with_capacity(SECP256K1_SPKI_PREFIX.len() + point.len());
    der.extend_from_slice(&SECP256K1_SPKI_PREFIX);
    der.extend_from_slice(point.as_bytes());
    der
}

/// RFC 4648 base32, lowercase, no padding.
fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8 + 4) / 5);
    let mut buffer: u16 = 0;
    let mut bits = 0u8;
    for &byte in data {
        buffer = (buffer << 8) | u16::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

fn base32_decode(text: &str) -> Result<Vec<u8>, KeyError> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: u16 = 0;
    let mut bits = 0u8;
    for c in text.bytes() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or_else(|| KeyError::Decoding(format!("invalid base32 character {:?}", c as char)))?;
        buffer = (buffer << 5) | value as u16;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
        }
    }
    Ok(out)
}
