//! Cryptographic Operations
//!
//! Base32 secret encoding and RFC 6238 one-time password computation.

pub mod base32;
pub mod totp;

use thiserror::Error;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid base32 character: {0}")]
    InvalidEncoding(char),

    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;

// Re-exports
pub use totp::{
    code_at, code_now, generate_secret, time_remaining, verify_at, verify_now, Secret,
    TotpAlgorithm, TotpConfig, DEFAULT_SECRET_LENGTH, LEGACY_SECRET_LENGTH, MIN_SECRET_LENGTH,
};
