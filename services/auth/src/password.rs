//! Password hashing and verification
//!
//! New credentials are hashed with Argon2. Stored credentials may also be
//! bcrypt hashes written by the seeding tools, or plaintext left over from
//! early development data.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

use crate::error::AuthError;
use tracing::{error, warn};

/// Kind of credential found in a resident row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredCredential {
    Argon2,
    Bcrypt,
    Plaintext,
}

impl StoredCredential {
    pub fn classify(stored: &str) -> Self {
        if stored.starts_with("$argon2") {
            StoredCredential::Argon2
        } else if looks_like_bcrypt(stored) {
            StoredCredential::Bcrypt
        } else {
            StoredCredential::Plaintext
        }
    }
}

/// Modular crypt form `$2?$NN$` followed by 53 salt and hash characters
fn looks_like_bcrypt(stored: &str) -> bool {
    let bytes = stored.as_bytes();
    bytes.len() == 60
        && bytes.starts_with(b"$2")
        && matches!(bytes[2], b'a' | b'b' | b'x' | b'y')
        && bytes[3] == b'$'
        && bytes[4].is_ascii_digit()
        && bytes[5].is_ascii_digit()
        && bytes[6] == b'$'
}

/// Hash a new password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            AuthError::InternalServerError
        })
}

/// Check `candidate` against the stored credential.
///
/// Returns `Ok(false)` on mismatch, for plaintext rows when `allow_plaintext`
/// is off, and for bcrypt-shaped rows the bcrypt crate refuses. A stored
/// argon2 hash that cannot be parsed is an error.
pub fn verify_password(
    candidate: &str,
    stored: &str,
    allow_plaintext: bool,
) -> Result<bool, AuthError> {
    match StoredCredential::classify(stored) {
        StoredCredential::Argon2 => {
            let parsed = PasswordHash::new(stored).map_err(|e| {
                error!("Stored argon2 hash is malformed: {}", e);
                AuthError::InternalServerError
            })?;
            match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => {
                    error!("Argon2 verification failed: {}", e);
                    Err(AuthError::InternalServerError)
                }
            }
        }
        StoredCredential::Bcrypt => match bcrypt::verify(candidate, stored) {
            Ok(matched) => Ok(matched),
            Err(e) => {
                warn!("Stored bcrypt hash is malformed: {}", e);
                Ok(false)
            }
        },
        StoredCredential::Plaintext => Ok(allow_plaintext && candidate == stored),
    }
}
