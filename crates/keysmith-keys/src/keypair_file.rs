// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Writing secret material to files.

use crate::error::KeyError;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write `contents` to a new file readable only by the owner.
///
/// Fails with `AlreadyExists` if the file is present; key files are never
/// overwritten.
pub fn write_secret_file<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<(), KeyError> {
    let path = path.as_ref();
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);

    // Set restrictive permissions on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            KeyError::Io(std::io::Error::new(
                e.kind(),
                format!("refusing to overwrite {}", path.display()),
            ))
        } else {
            KeyError::Io(e)
        }
    })?;
    file.write_all(contents)?;
    file.sync_all()?;

    info!(path = %path.display(), "wrote key file");
    Ok(())
}
