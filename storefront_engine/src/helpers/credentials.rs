//! Password hashing.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`) with a random salt per
//! password. Guest accounts get an [`unusable_password`] that no input can match.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::*;
use rand::RngCore;
use thiserror::Error;

use crate::db_types::PasswordHash;

#[derive(Debug, Clone, Error)]
#[error("Could not hash the password. {0}")]
pub struct CredentialError(String);

pub fn hash_password(password: &str) -> Result<PasswordHash, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CredentialError(e.to_string()))?;
    Ok(PasswordHash(hash.to_string()))
}

/// A credential for accounts that must never be able to log in, such as accounts created during guest checkout.
pub fn unusable_password() -> PasswordHash {
    let mut noise = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut noise);
    PasswordHash(format!("!{}", hex::encode(noise)))
}

/// Checks `password` against a stored hash. Unusable and malformed hashes never verify.
pub fn verify_password(password: &str, hash: &PasswordHash) -> bool {
    if !hash.is_usable() {
        return false;
    }
    match PhcString::new(hash.as_str()) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            warn!("🔑️ Stored password hash could not be parsed. {e}");
            false
        },
    }
}
