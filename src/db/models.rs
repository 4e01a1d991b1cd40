//! Database Models
//!
//! Data structures for enrollment rows.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Enrollment row for one (scope, account) pair
///
/// `secret` holds the base32-encoded form or `None` before first setup.
/// `enabled` may only be true while a valid secret is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub scope: String,
    pub account_id: String,
    pub secret: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl EnrollmentRecord {
    /// Create a fresh record with no secret and 2FA disabled
    pub fn new(scope: impl Into<String>, account_id: impl Into<String>) -> Self {
        let now = Local::now();
        Self {
            scope: scope.into(),
            account_id: account_id.into(),
            secret: None,
            enabled: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a record carrying a base32-encoded secret
    pub fn with_secret(
        scope: impl Into<String>,
        account_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        let mut record = Self::new(scope, account_id);
        record.secret = Some(secret.into());
        record
    }
}
