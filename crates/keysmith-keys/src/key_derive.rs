// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Hierarchical deterministic (HD) key derivation.
//!
//! This module implements BIP-32 over secp256k1 and the fixed BIP-44 layout
//! used for platform identities:
//!
//! ```text
//! m / 44' / 223' / 0' / 0 / {index}
//!     |______________|   |      |
//!       account root   change  caller-supplied index
//! ```
//!
//! The account root is reached with three hardened steps. Every identity is
//! then produced by exactly two normal steps below it: the fixed change index
//! first, the caller's index second.

use crate::error::KeyError;
use hmac::{Hmac, Mac};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

type HmacSha512 = Hmac<Sha512>;

/// First index of the hardened range.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key used to expand a seed into the master key.
pub const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// BIP-44 purpose.
pub const DERIVATION_PATH_PURPOSE: u32 = 44;

/// Registered SLIP-0044 coin type of the platform.
pub const DERIVATION_PATH_COIN_TYPE: u32 = 223;

/// Shortest seed accepted by the master key derivation.
pub const MIN_SEED_LEN: usize = 16;

/// Longest seed accepted by the master key derivation.
pub const MAX_SEED_LEN: usize = 64;

const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

/// A single step of a derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildNumber(u32);

impl ChildNumber {
    /// Normal (non-hardened) step. Fails for indices in the hardened range.
    pub fn normal(index: u32) -> Result<Self, KeyError> {
        if index >= HARDENED_OFFSET {
            return Err(KeyError::InvalidDerivationIndex(index));
        }
        Ok(Self(index))
    }

    /// Hardened step for `index` (the offset is added here).
    pub fn hardened(index: u32) -> Result<Self, KeyError> {
        if index >= HARDENED_OFFSET {
            return Err(KeyError::InvalidDerivationIndex(index));
        }
        Ok(Self(index | HARDENED_OFFSET))
    }

    /// Raw 32-bit value, including the hardened bit.
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_hardened(&self) -> bool {
        self.0 >= HARDENED_OFFSET
    }
}

impl From<u32> for ChildNumber {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.0 - HARDENED_OFFSET)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Protocol constants driving the derivation.
///
/// The value is immutable once built. `Default` is the platform scheme
/// (`Bitcoin seed`, `m/44'/223'/0'`, change index 0); tests may build
/// schemes with other constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationScheme {
    master_key: Vec<u8>,
    account_path: Vec<ChildNumber>,
    change_index: ChildNumber,
}

impl DerivationScheme {
    /// Build a scheme. The change index must be a normal index.
    pub fn new(
        master_key: impl Into<Vec<u8>>,
        account_path: Vec<ChildNumber>,
        change_index: u32,
    ) -> Result<Self, KeyError> {
        Ok(Self {
            master_key: master_key.into(),
            account_path,
            change_index: ChildNumber::normal(change_index)?,
        })
    }

    pub fn master_key(&self) -> &[u8] {
        &self.master_key
    }

    pub fn account_path(&self) -> &[ChildNumber] {
        &self.account_path
    }

    pub fn change_index(&self) -> ChildNumber {
        self.change_index
    }

    /// Render the full path of the identity at `index`, e.g. `m/44'/223'/0'/0/7`.
    pub fn path_for(&self, index: u32) -> String {
        let mut path = String::from("m");
        for step in &self.account_path {
            path.push_str(&format!("/{}", step));
        }
        path.push_str(&format!("/{}/{}", self.change_index, ChildNumber::from(index)));
        path
    }
}

impl Default for DerivationScheme {
    fn default() -> Self {
        Self {
            master_key: MASTER_HMAC_KEY.to_vec(),
            account_path: vec![
                ChildNumber(DERIVATION_PATH_PURPOSE | HARDENED_OFFSET),
                ChildNumber(DERIVATION_PATH_COIN_TYPE | HARDENED_OFFSET),
                ChildNumber(HARDENED_OFFSET),
            ],
            change_index: ChildNumber(0),
        }
    }
}

/// 256-bit chain code, wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChainCode([u8; 32]);

impl ChainCode {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ChainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChainCode(..)")
    }
}

/// First four bytes of HASH160 of a compressed public key.
pub type Fingerprint = [u8; 4];

/// Extended private key: a secp256k1 scalar plus chain code and position.
///
/// The scalar is always in `1..n`. Values are never mutated; every
/// derivation returns a new key.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    secret: SecretKey,
    chain_code: ChainCode,
    depth: u8,
    parent_fingerprint: Fingerprint,
    child_number: ChildNumber,
}

impl ExtendedPrivateKey {
    /// Expand a seed into the depth-0 master key.
    pub fn new_master(seed: &[u8], scheme: &DerivationScheme) -> Result<Self, KeyError> {
        if seed.is_empty() {
            return Err(KeyError::InvalidSeed("seed is empty".to_string()));
        }
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(KeyError::InvalidSeed(format!(
                "seed must be {}..={} bytes, got {}",
                MIN_SEED_LEN,
                MAX_SEED_LEN,
                seed.len()
            )));
        }

        let output = hmac_sha512(scheme.master_key(), &[seed])?;
        let (secret, chain_code) = split_master_output(&output)?;
        debug!("derived master key");

        Ok(Self {
            secret,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: ChildNumber(0),
        })
    }

    /// Derive the child at `index`. Indices at or above
    /// [`HARDENED_OFFSET`] use hardened derivation.
    pub fn derive_child(&self, index: u32) -> Result<Self, KeyError> {
        let depth = self.depth.checked_add(1).ok_or(KeyError::DepthOverflow)?;
        let child_number = ChildNumber::from(index);
        let parent_public = self.public_key();

        let output = if child_number.is_hardened() {
            let mut secret_bytes = Zeroizing::new([0u8; 32]);
            secret_bytes.copy_from_slice(&self.secret.to_bytes());
            hmac_sha512(
                self.chain_code.as_bytes(),
                &[&[0u8][..], &secret_bytes[..], &index.to_be_bytes()[..]],
            )?
        } else {
            let point = parent_public.to_encoded_point(true);
            hmac_sha512(
                self.chain_code.as_bytes(),
                &[point.as_bytes(), &index.to_be_bytes()[..]],
            )?
        };

        let secret = add_tweak(&self.secret, &output[..32])?;
        let chain_code = chain_code_from(&output[32..]);
        let parent_fingerprint = fingerprint(&parent_public);
        debug!(
            depth,
            child = %child_number,
            parent = %hex::encode(parent_fingerprint),
            "derived child key"
        );

        Ok(Self {
            secret,
            chain_code,
            depth,
            parent_fingerprint,
            child_number,
        })
    }

    /// Walk a sequence of steps starting from this key.
    pub fn derive_path(&self, path: &[ChildNumber]) -> Result<Self, KeyError> {
        path.iter()
            .try_fold(self.clone(), |key, step| key.derive_child(step.value()))
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    pub fn public_key(&self) -> PublicKey {
        self.secret.public_key()
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    /// Fingerprint of this key, as recorded in its children.
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(&self.public_key())
    }

    /// Neuter into the matching extended public key.
    pub fn to_extended_public_key(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            public_key: self.public_key(),
            chain_code: self.chain_code.clone(),
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
        }
    }

    /// Base58Check `xprv` serialization.
    pub fn to_xprv(&self) -> Zeroizing<String> {
        let mut key_data = Zeroizing::new([0u8; 33]);
        key_data[1..].copy_from_slice(&self.secret.to_bytes());
        let payload = serialize_extended(
            XPRV_VERSION,
            self.depth,
            self.parent_fingerprint,
            self.child_number,
            &self.chain_code,
            key_data.as_slice(),
        );
        Zeroizing::new(bs58::encode(payload.as_slice()).with_check().into_string())
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_number", &self.child_number)
            .finish_non_exhaustive()
    }
}

/// Extended public key: a curve point plus chain code and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    public_key: PublicKey,
    chain_code: ChainCode,
    depth: u8,
    parent_fingerprint: Fingerprint,
    child_number: ChildNumber,
}

impl ExtendedPublicKey {
    /// Public child derivation. Only normal indices can be derived without
    /// the private scalar.
    pub fn derive_child(&self, index: u32) -> Result<Self, KeyError> {
        let child_number = ChildNumber::normal(index)?;
        let depth = self.depth.checked_add(1).ok_or(KeyError::DepthOverflow)?;

        let point = self.public_key.to_encoded_point(true);
        let output = hmac_sha512(
            self.chain_code.as_bytes(),
            &[point.as_bytes(), &index.to_be_bytes()[..]],
        )?;
        let tweak = parse_scalar(&output[..32]).ok_or_else(|| {
            KeyError::InvalidScalar("derived tweak is not below the curve order".to_string())
        })?;

        let child = ProjectivePoint::GENERATOR * tweak + self.public_key.to_projective();
        let public_key = PublicKey::from_affine(child.to_affine()).map_err(|_| {
            KeyError::InvalidScalar("derived public key is the point at infinity".to_string())
        })?;

        Ok(Self {
            public_key,
            chain_code: chain_code_from(&output[32..]),
            depth,
            parent_fingerprint: fingerprint(&self.public_key),
            child_number,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(&self.public_key)
    }

    /// Base58Check `xpub` serialization.
    pub fn to_xpub(&self) -> String {
        let point = self.public_key.to_encoded_point(true);
        let payload = serialize_extended(
            XPUB_VERSION,
            self.depth,
            self.parent_fingerprint,
            self.child_number,
            &self.chain_code,
            point.as_bytes(),
        );
        bs58::encode(payload.as_slice()).with_check().into_string()
    }
}

impl fmt::Display for ExtendedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xpub())
    }
}

/// Expand a seed into the depth-0 master key.
pub fn derive_master(seed: &[u8], scheme: &DerivationScheme) -> Result<ExtendedPrivateKey, KeyError> {
    ExtendedPrivateKey::new_master(seed, scheme)
}

/// Derive the account root (`m/44'/223'/0'` for the default scheme).
pub fn derive_account_root(
    seed: &[u8],
    scheme: &DerivationScheme,
) -> Result<ExtendedPrivateKey, KeyError> {
    derive_master(seed, scheme)?.derive_path(scheme.account_path())
}

/// Derive the identity key at `index` below an account root: the change
/// step, then the index step. Both steps are normal derivations.
pub fn derive_grandchild(
    account_root: &ExtendedPrivateKey,
    index: u32,
    scheme: &DerivationScheme,
) -> Result<ExtendedPrivateKey, KeyError> {
    let index = ChildNumber::normal(index)?;
    let child = account_root.derive_child(scheme.change_index().value())?;
    child.derive_child(index.value())
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>, KeyError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| KeyError::InvalidSeed(format!("invalid HMAC key: {}", e)))?;
    for part in parts {
        mac.update(part);
    }
    let mut output = Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&mac.finalize().into_bytes());
    Ok(output)
}

/// Split a master HMAC output into scalar and chain code, rejecting a left
/// half equal to zero or not below the curve order.
fn split_master_output(output: &[u8; 64]) -> Result<(SecretKey, ChainCode), KeyError> {
    let secret = SecretKey::from_bytes(FieldBytes::from_slice(&output[..32])).map_err(|_| {
        KeyError::InvalidScalar("master scalar is zero or not below the curve order".to_string())
    })?;
    Ok((secret, chain_code_from(&output[32..])))
}

/// `(tweak + parent) mod n`, rejecting an out-of-range tweak and a zero sum.
fn add_tweak(parent: &SecretKey, tweak: &[u8]) -> Result<SecretKey, KeyError> {
    let tweak = parse_scalar(tweak).ok_or_else(|| {
        KeyError::InvalidScalar("derived tweak is not below the curve order".to_string())
    })?;
    let sum = tweak + *parent.to_nonzero_scalar();
    let child = Option::<NonZeroScalar>::from(NonZeroScalar::new(sum))
        .ok_or_else(|| KeyError::InvalidScalar("derived child scalar is zero".to_string()))?;
    Ok(SecretKey::from(child))
}

/// Parse 32 big-endian bytes as a scalar without reducing.
fn parse_scalar(bytes: &[u8]) -> Option<Scalar> {
    Option::from(Scalar::from_repr(FieldBytes::clone_from_slice(bytes)))
}

fn chain_code_from(bytes: &[u8]) -> ChainCode {
    let mut code = [0u8; 32];
    code.copy_from_slice(bytes);
    ChainCode(code)
}

fn fingerprint(public_key: &PublicKey) -> Fingerprint {
    let point = public_key.to_encoded_point(true);
    let hash = Ripemd160::digest(Sha256::digest(point.as_bytes()));
    let mut fp = [0u8; 4];
    fp.copy_from_slice(&hash[..4]);
    fp
}

fn serialize_extended(
    version: [u8; 4],
    depth: u8,
    parent_fingerprint: Fingerprint,
    child_number: ChildNumber,
    chain_code: &ChainCode,
    key_data: &[u8],
) -> Zeroizing<Vec<u8>> {
    let mut buf = Zeroizing::new(Vec::with_capacity(78));
    buf.extend_from_slice(&version);
    buf.push(depth);
    buf.extend_from_slice(&parent_fingerprint);
    buf.extend_from_slice(&child_number.value().to_be_bytes());
    buf.extend_from_slice(chain_code.as_bytes());
    buf.extend_from_slice(key_data);
    buf
}
