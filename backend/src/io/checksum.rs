//! Checksum calculation for sheet snapshots.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of raw sheet source bytes.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = "ИСИП-118,1 пара".as_bytes();
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
    }

    #[test]
    fn test_different_content_different_checksum() {
        assert_ne!(calculate_checksum(b"week 1"), calculate_checksum(b"week 2"));
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        let checksum = calculate_checksum(b"");
        assert_eq!(checksum.len(), 64);
        assert_eq!(
            checksum,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
