// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Text encodings for key material.

use crate::error::KeyError;
use k256::pkcs8::LineEnding;
use k256::SecretKey;
use zeroize::Zeroizing;

/// PEM block naming the secp256k1 curve OID (1.3.132.0.10).
pub const SECP256K1_EC_PARAMETERS_PEM: &str =
    "-----BEGIN EC PARAMETERS-----\nBgUrgQQACg==\n-----END EC PARAMETERS-----\n";

/// Render a private key as an `EC PARAMETERS` block followed by a SEC1
/// `EC PRIVATE KEY` block.
pub fn secret_key_to_pem(secret: &SecretKey) -> Result<Zeroizing<String>, KeyError> {
    let sec1 = secret.to_sec1_pem(LineEnding::LF).map_err(pem_error)?;

    let mut pem = Zeroizing::new(String::with_capacity(
        SECP256K1_EC_PARAMETERS_PEM.len() + sec1.len(),
    ));
    pem.push_str(SECP256K1_EC_PARAMETERS_PEM);
    pem.push_str(&sec1);
    Ok(pem)
}

fn pem_error(err: impl std::fmt::Display) -> KeyError {
    KeyError::Encoding(format!("cannot encode private key as PEM: {}", err))
}

/// Lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
