//! Source content hashing, recorded in the catalog for provenance.

use sha2::{Digest, Sha256};

/// SHA-256 of `bytes` as lowercase hex.
pub fn hash_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes() {
        assert_eq!(
            hash_bytes(b"Hello, World!"),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_hash_changes_with_content() {
        assert_ne!(
            hash_bytes(b"Location code,ISO3 Alpha-code\n496,MNG\n"),
            hash_bytes(b"Location code,ISO3 Alpha-code\n4,AFG\n")
        );
    }
}
