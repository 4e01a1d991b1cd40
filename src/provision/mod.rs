//! Provisioning
//!
//! otpauth:// URI construction and QR payload rendering for
//! authenticator-app import.

pub mod qr;
pub mod uri;

use thiserror::Error;

/// Provisioning errors
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    #[error("QR encoding failed: {0}")]
    QrFailed(String),
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;

// Re-exports
pub use qr::{QrRenderer, SvgQrRenderer};
pub use uri::build_provisioning_uri;
