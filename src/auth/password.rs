/// Password Hashing and Verification
///
/// bcrypt with a fixed work factor. Both calls are CPU-bound; async callers
/// should run them on the blocking pool.

use bcrypt::{hash, verify};

use crate::error::{AppError, AuthError};

/// bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

/// Hash a password with a fresh random salt
///
/// # Errors
/// Returns an internal error if bcrypt fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, BCRYPT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash
///
/// # Errors
/// - `AuthError::InvalidCredentials` if the password does not match
/// - an internal error if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    match verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::InvalidCredentials.into()),
        Err(e) => Err(AppError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
