// File: dudedirt-core/src/crypto/mod.rs
//
// Salted password hashing. Stored form is `hex(salt)$hex(sha256(salt || password))`.

use rand::Rng;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::rng().random();
    let digest = digest_with_salt(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };

    let actual = digest_with_salt(&salt, password);
    // Fixed-length comparison over the digests, not the inputs.
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn digest_with_salt(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let stored = hash_password("demo123");
        assert!(verify_password("demo123", &stored));
        assert!(!verify_password("demo124", &stored));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Random salt per hash.
        assert_ne!(hash_password("demo123"), hash_password("demo123"));
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify_password("demo123", "not-a-hash"));
        assert!(!verify_password("demo123", "zzzz$zzzz"));
    }
}
