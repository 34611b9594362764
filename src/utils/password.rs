//! Argon2id password hashing for registration.
//!
//! Hashes are stored in PHC string format so algorithm parameters and salt
//! travel with the hash. Verification belongs to the upstream
//! authentication collaborator; this service only ever writes hashes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_phc_formatted() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").expect("hashing should succeed");
        let b = hash_password("same-password").expect("hashing should succeed");
        assert_ne!(a, b, "two hashes of the same password must differ by salt");
    }
}
