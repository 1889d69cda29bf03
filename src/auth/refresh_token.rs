/// Refresh Token Generation
///
/// Refresh tokens are opaque: 32 bytes from the operating system's CSPRNG,
/// hex encoded. The value itself is the lookup key in the store.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::AppError;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new refresh token (64 lowercase hex characters)
///
/// # Errors
/// Returns an internal error if the entropy source is unavailable; the
/// failure is not retried.
pub fn generate_refresh_token() -> Result<String, AppError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Internal(format!("Entropy source unavailable: {}", e)))?;

    Ok(to_hex(&bytes))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
