//! Enrollment Module
//!
//! Per-account 2FA state: secret issuance, enable/disable, verification,
//! and backup document rendering.

pub mod backup;
pub mod manager;

use thiserror::Error;

/// Enrollment errors
#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("Unknown scope: {0}")]
    InvalidScope(String),

    #[error("Not enrolled: {0}")]
    NotEnrolled(String),

    #[error("Cannot enable 2FA without an enrolled secret")]
    NoSecretEnrolled,

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error("Enrollment store lock poisoned")]
    StorePoisoned,
}

pub type EnrollmentResult<T> = Result<T, EnrollmentError>;

// Re-exports
pub use backup::{backup_file_name, render_backup_document};
pub use manager::{TwoFactor, TwoFactorConfig};
