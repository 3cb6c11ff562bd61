/// Password hashing and verification using Argon2id
///
/// Length rules live in the request validators; this module only turns a
/// plaintext into a PHC string and checks one against it.
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password")]
    Hash,

    #[error("Stored password hash is not a valid PHC string")]
    InvalidHash,
}

/// Hash a password using Argon2id with a fresh random salt
/// Returns the hash string suitable for storage in database
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(rand::thread_rng());

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::Hash)?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash
///
/// `Ok(false)` means the password does not match; an error means the stored
/// hash itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
