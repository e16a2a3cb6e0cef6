use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

const TOKEN_BYTES: usize = 45;

#[derive(Debug, thiserror::Error)]
#[error("credential hashing failed: {0}")]
pub struct CredentialError(String);

pub fn hash_credentials(raw_credentials: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(raw_credentials.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError(e.to_string()))
}

/// An unparseable stored hash verifies as `false`, never as an error.
pub fn verify_credentials(raw_credentials: &str, hashed_credentials: &str) -> bool {
    PasswordHash::new(hashed_credentials)
        .map(|parsed| {
            Argon2::default()
                .verify_password(raw_credentials.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Opaque URL-safe bearer token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
