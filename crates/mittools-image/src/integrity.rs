// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image fingerprints — SHA-256 hashing of files and buffers.

use std::io::Read;
use std::path::Path;

use mittools_core::ResizeFilter;
use mittools_core::error::MitToolsError;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::processor::scale_down;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Raw 32-byte SHA-256 digest of a file's contents.
pub fn file_digest(path: impl AsRef<Path>) -> Result<Vec<u8>, MitToolsError> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path).map_err(|err| {
        MitToolsError::ImageError(format!("Failed to open image {}: {}", path.display(), err))
    })?;

    let mut hasher = Sha256::new();
    let mut chunk = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut chunk).map_err(|err| {
            MitToolsError::ImageError(format!("Failed to read image {}: {}", path.display(), err))
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }
    let digest = hasher.finalize().to_vec();
    debug!(path = %path.display(), digest = %hex::encode(&digest), "File hashed");
    Ok(digest)
}

/// Lowercase hex SHA-256 of a file's contents.
pub fn hash_file(path: impl AsRef<Path>) -> Result<String, MitToolsError> {
    file_digest(path).map(hex::encode)
}

/// Verify that `data` matches the expected SHA-256 hex digest.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<(), MitToolsError> {
    let actual = hash_bytes(data);
    if actual.eq_ignore_ascii_case(expected_hex) {
        Ok(())
    } else {
        Err(MitToolsError::IntegrityMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}

/// Hash the original `input` file, then write a scaled copy to `output`.
///
/// The digest always describes the unscaled source.
pub fn sha256_scale(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    filter: ResizeFilter,
    scale: f32,
) -> Result<Vec<u8>, MitToolsError> {
    let digest = file_digest(input.as_ref())?;
    scale_down(input, output, filter, scale)?;
    Ok(digest)
}
