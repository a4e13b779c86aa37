// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Identity key material and the inputs it is resolved from.
//!
//! Every output command starts from a [`KeySource`]: either a seed plus a
//! derivation index, or a raw private-key hex string that skips derivation
//! entirely. [`resolve_key_pair`] turns either into a [`KeyPairMaterial`].

use crate::account::AccountId;
use crate::address_derive::EthereumAddress;
use crate::codec;
use crate::error::KeyError;
use crate::key_derive::{derive_account_root, derive_grandchild, DerivationScheme, ExtendedPrivateKey};
use crate::principal::PrincipalId;
use crate::seed::Seed;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

/// Length of an uncompressed SEC1 point.
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;

/// Length of a compressed SEC1 point.
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;

/// A secp256k1 public key, with its private scalar when known.
#[derive(Clone)]
pub struct KeyPairMaterial {
    secret: Option<SecretKey>,
    public: PublicKey,
}

impl KeyPairMaterial {
    /// Key pair carried by an extended private key.
    pub fn from_extended(key: &ExtendedPrivateKey) -> Self {
        Self::from_secret_key(key.secret_key().clone())
    }

    pub fn from_secret_key(secret: SecretKey) -> Self {
        let public = secret.public_key();
        Self {
            secret: Some(secret),
            public,
        }
    }

    /// Parse a 32-byte private scalar from hex. Surrounding whitespace is
    /// ignored; a `0x` prefix is not accepted.
    pub fn from_private_key_hex(input: &str) -> Result<Self, KeyError> {
        let bytes = Zeroizing::new(
            hex::decode(input.trim()).map_err(|e| KeyError::InvalidHexEncoding(e.to_string()))?,
        );
        if bytes.len() != 32 {
            return Err(KeyError::InvalidHexEncoding(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let secret = SecretKey::from_slice(&bytes).map_err(|_| {
            KeyError::InvalidScalar("private key is zero or not below the curve order".to_string())
        })?;
        Ok(Self::from_secret_key(secret))
    }

    /// Public-only material from a SEC1 point (compressed or uncompressed).
    pub fn from_public_key_sec1(bytes: &[u8]) -> Result<Self, KeyError> {
        let public = PublicKey::from_sec1_bytes(bytes)
            .map_err(|e| KeyError::InvalidPublicKey(format!("not a secp256k1 point: {}", e)))?;
        Ok(Self {
            secret: None,
            public,
        })
    }

    pub fn secret_key(&self) -> Option<&SecretKey> {
        self.secret.as_ref()
    }

    pub fn has_private_key(&self) -> bool {
        self.secret.is_some()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn public_key_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LEN] {
        let point = self.public.to_encoded_point(false);
        let mut bytes = [0u8; UNCOMPRESSED_PUBLIC_KEY_LEN];
        bytes.copy_from_slice(point.as_bytes());
        bytes
    }

    pub fn public_key_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_LEN] {
        let point = self.public.to_encoded_point(true);
        let mut bytes = [0u8; COMPRESSED_PUBLIC_KEY_LEN];
        bytes.copy_from_slice(point.as_bytes());
        bytes
    }

    /// Uncompressed public key as 130 lowercase hex characters.
    pub fn public_key_hex(&self) -> String {
        codec::to_hex(&self.public_key_uncompressed())
    }

    pub fn principal(&self) -> PrincipalId {
        PrincipalId::self_authenticating(&self.public)
    }

    /// Account under the default subaccount.
    pub fn account(&self) -> AccountId {
        AccountId::from_principal(&self.principal())
    }

    pub fn legacy_address(&self) -> EthereumAddress {
        EthereumAddress::from_public_key(&self.public)
    }

    pub fn to_pem(&self) -> Result<Zeroizing<String>, KeyError> {
        let secret = self.secret.as_ref().ok_or(KeyError::MissingPrivateKey)?;
        codec::secret_key_to_pem(secret)
    }
}

impl fmt::Debug for KeyPairMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairMaterial")
            .field("public", &self.public_key_hex())
            .field("private", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Where an identity key comes from.
pub enum KeySource {
    /// Derive `m/44'/223'/0'/0/{index}` from a seed.
    FromSeed { seed: Seed, index: u32 },
    /// Use a raw private scalar given as hex.
    FromRawScalar(Zeroizing<String>),
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::FromSeed { seed, index } => f
                .debug_struct("FromSeed")
                .field("seed", seed)
                .field("index", index)
                .finish(),
            KeySource::FromRawScalar(_) => f.write_str("FromRawScalar([REDACTED])"),
        }
    }
}

/// Resolve a key source into key material.
pub fn resolve_key_pair(
    source: &KeySource,
    scheme: &DerivationScheme,
) -> Result<KeyPairMaterial, KeyError> {
    match source {
        KeySource::FromSeed { seed, index } => {
            let account_root = derive_account_root(seed.as_bytes(), scheme)?;
            let key = derive_grandchild(&account_root, *index, scheme)?;
            debug!(path = %scheme.path_for(*index), "resolved key from seed");
            Ok(KeyPairMaterial::from_extended(&key))
        }
        KeySource::FromRawScalar(hex) => {
            debug!("resolved key from raw private key");
            KeyPairMaterial::from_private_key_hex(hex)
        }
    }
}
