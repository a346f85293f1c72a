use sha2::{Digest, Sha256};

/// SHA-256 fingerprint of asset content, 64 lowercase hex characters.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn shape_is_stable() {
        let hash = content_hash("---\nname: x\n---\n");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, content_hash("---\nname: x\n---\n"));
        assert_ne!(hash, content_hash("---\nname: y\n---\n"));
    }
}
