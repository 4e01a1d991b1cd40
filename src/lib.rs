//! Twofactor - TOTP Enrollment Library
//!
//! RFC 6238 one-time passwords, otpauth:// provisioning, and per-account
//! 2FA enrollment state for web-application login flows.
//!
//! ```
//! use twofactor::{Database, TwoFactor, TwoFactorConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open_in_memory()?;
//! let config = TwoFactorConfig::default().with_scopes(["user", "admin"]);
//! let twofa = TwoFactor::new(db, config);
//!
//! let secret = twofa.get_or_create_secret("user", "alice")?;
//! let uri = twofactor::build_provisioning_uri(
//!     "Example",
//!     "alice@example.com",
//!     &secret,
//!     &twofa.config().totp,
//! )?;
//! assert!(uri.starts_with("otpauth://totp/"));
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod db;
pub mod enrollment;
pub mod provision;

// Re-exports
pub use crypto::{
    code_at, code_now, generate_secret, time_remaining, verify_at, verify_now, CryptoError,
    Secret, TotpAlgorithm, TotpConfig,
};
pub use db::{Database, DatabaseConfig, DbError, EnrollmentRecord};
pub use enrollment::{
    backup_file_name, render_backup_document, EnrollmentError, TwoFactor, TwoFactorConfig,
};
pub use provision::{build_provisioning_uri, ProvisionError, QrRenderer, SvgQrRenderer};
