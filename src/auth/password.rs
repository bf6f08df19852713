use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use std::sync::LazyLock;

use crate::error::AppError;

/// Verified against when the username is unknown, so that a failed login
/// costs the same whether or not the account exists.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| hash("dummy-password").ok());

fn hasher() -> Result<Argon2<'static>, AppError> {
    // Argon2id, 19 MiB memory, 2 iterations, parallelism 1.
    let params = Params::new(19 * 1024, 2, 1, None)
        .map_err(|e| AppError::Internal(format!("Invalid argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password into a PHC string.
pub fn hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Check a password against a stored PHC string. An unparseable stored
/// hash never matches.
pub fn verify(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {e}");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Burn one verification against a throwaway hash. Always false.
pub fn verify_dummy(password: &str) -> bool {
    if let Some(stored) = DUMMY_HASH.as_deref() {
        let _ = verify(password, stored);
    }
    false
}
