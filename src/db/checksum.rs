//! Checksum calculation for board snapshot deduplication.
//!
//! The change feed hashes each serialized board snapshot so that
//! subscribers can skip events that carry no observable change.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of serialized board content.
///
/// Returns the hexadecimal string representation of the hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = r#"{"title": "Openings"}"#;
        let checksum1 = calculate_checksum(content);
        let checksum2 = calculate_checksum(content);
        assert_eq!(checksum1, checksum2);
    }

    #[test]
    fn test_different_content_different_checksum() {
        let content1 = r#"{"title": "Openings"}"#;
        let content2 = r#"{"title": "Closures"}"#;
        let checksum1 = calculate_checksum(content1);
        let checksum2 = calculate_checksum(content2);
        assert_ne!(checksum1, checksum2);
    }
}
