//! Integrity verification for fetched artifacts.
//!
//! Computes SHA-256 digests over files and byte slices and compares them
//! against manifest expectations. Verification fails closed: a mismatch,
//! a truncated read, or an unreadable file is always an error, never a
//! silent pass. Unsupported algorithms cannot reach this layer; they are
//! rejected when the manifest is parsed.

use crate::manifest::Sha256Digest;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors arising from digest computation and comparison.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The content could not be read.
    #[error("failed to read content for verification: {0}")]
    Io(#[from] std::io::Error),

    /// The computed digest does not match the expected digest.
    #[error("digest mismatch: expected {expected}, actual {actual}")]
    Mismatch {
        /// The digest the manifest expects.
        expected: Sha256Digest,
        /// The digest actually computed.
        actual: Sha256Digest,
    },
}

/// Compute the SHA-256 digest of a file, streaming in fixed-size chunks.
///
/// # Errors
///
/// Returns [`DigestError::Io`] when the file cannot be opened or read.
pub fn compute_sha256(path: &Path) -> Result<Sha256Digest, DigestError> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(digest_to_hex(hasher))
}

/// Compute the SHA-256 digest of a byte slice.
#[must_use]
pub fn sha256_of_bytes(bytes: &[u8]) -> Sha256Digest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    digest_to_hex(hasher)
}

/// Verify a file against an expected digest.
///
/// # Errors
///
/// Returns [`DigestError::Mismatch`] when the computed digest differs, or
/// [`DigestError::Io`] when the file cannot be read.
pub fn verify_file(path: &Path, expected: &Sha256Digest) -> Result<(), DigestError> {
    let actual = compute_sha256(path)?;
    if actual != *expected {
        return Err(DigestError::Mismatch {
            expected: expected.clone(),
            actual,
        });
    }
    Ok(())
}

/// Finalize a hasher into the validated digest newtype.
fn digest_to_hex(hasher: Sha256) -> Sha256Digest {
    let hex = format!("{:x}", hasher.finalize());
    // sha2 always produces valid 64-char lowercase hex.
    Sha256Digest::try_from(hex).expect("sha2 produces valid 64-char lowercase hex")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty input, a fixed vector.
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn empty_input_matches_known_vector() {
        let digest = sha256_of_bytes(b"");
        assert_eq!(digest.as_str(), EMPTY_SHA256);
    }

    #[test]
    fn file_and_bytes_agree() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("artifact");
        std::fs::write(&path, b"artifact content").expect("write artifact");
        let from_file = compute_sha256(&path).expect("compute digest");
        let from_bytes = sha256_of_bytes(b"artifact content");
        assert_eq!(from_file, from_bytes);
    }

    #[test]
    fn verify_accepts_matching_content() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("artifact");
        std::fs::write(&path, b"payload").expect("write artifact");
        let expected = sha256_of_bytes(b"payload");
        assert!(verify_file(&path, &expected).is_ok());
    }

    #[test]
    fn verify_rejects_single_bit_flip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("artifact");
        let mut content = b"payload".to_vec();
        let expected = sha256_of_bytes(&content);
        content[0] ^= 0x01;
        std::fs::write(&path, &content).expect("write artifact");
        let result = verify_file(&path, &expected);
        assert!(matches!(result, Err(DigestError::Mismatch { .. })));
    }

    #[test]
    fn verify_rejects_truncated_content() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("artifact");
        let expected = sha256_of_bytes(b"full payload");
        std::fs::write(&path, b"full").expect("write artifact");
        let result = verify_file(&path, &expected);
        assert!(matches!(result, Err(DigestError::Mismatch { .. })));
    }

    #[test]
    fn verify_fails_on_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent");
        let expected = sha256_of_bytes(b"anything");
        let result = verify_file(&path, &expected);
        assert!(matches!(result, Err(DigestError::Io(_))));
    }
}
