use sha2::{Digest, Sha256};

/// Hash an opaque identifier (visitor id, phone number) using SHA256
///
/// Identifiers are hashed before they are persisted or written to logs.
/// Surrounding whitespace is ignored so that `" abc "` and `"abc"` collide.
pub fn hash_identifier(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_input_same_hash() {
        assert_eq!(hash_identifier("visitor_1"), hash_identifier("visitor_1"));
    }

    #[test]
    fn test_different_input_different_hash() {
        assert_ne!(hash_identifier("visitor_1"), hash_identifier("visitor_2"));
    }

    #[test]
    fn test_whitespace_ignored() {
        assert_eq!(hash_identifier("  visitor_1\n"), hash_identifier("visitor_1"));
    }

    #[test]
    fn test_hash_format() {
        let hash = hash_identifier("+15551234567");
        assert_eq!(hash.len(), 64, "SHA256 hash should be 64 hex characters");
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
