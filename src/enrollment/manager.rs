//! Enrollment Manager
//!
//! Core 2FA state management over the enrollment store: secret issuance,
//! enable/disable, and code verification, gated by a scope whitelist.

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::debug;

use crate::crypto::{self, Secret, TotpConfig, DEFAULT_SECRET_LENGTH};
use crate::db::{self, Database, DbError, EnrollmentRecord};

use super::{EnrollmentError, EnrollmentResult};

/// Enrollment configuration
#[derive(Debug, Clone)]
pub struct TwoFactorConfig {
    /// Accepted scopes; any other scope fails before touching the store
    pub scopes: Vec<String>,
    /// TOTP parameters used for all accounts
    pub totp: TotpConfig,
    /// Byte length of newly generated secrets
    pub secret_length: usize,
}

impl Default for TwoFactorConfig {
    fn default() -> Self {
        Self {
            scopes: vec!["user".to_string()],
            totp: TotpConfig::default(),
            secret_length: DEFAULT_SECRET_LENGTH,
        }
    }
}

impl TwoFactorConfig {
    /// Set the scope whitelist
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_totp(mut self, totp: TotpConfig) -> Self {
        self.totp = totp;
        self
    }

    pub fn with_secret_length(mut self, length: usize) -> Self {
        self.secret_length = length;
        self
    }
}

/// Enrollment manager
///
/// Mutations are serialized through an interior lock, so concurrent
/// callers for the same key observe a single persisted secret.
pub struct TwoFactor {
    config: TwoFactorConfig,
    db: Mutex<Database>,
}

impl TwoFactor {
    /// Create a manager over an open enrollment store
    pub fn new(db: Database, config: TwoFactorConfig) -> Self {
        Self {
            config,
            db: Mutex::new(db),
        }
    }

    /// Get enrollment configuration
    pub fn config(&self) -> &TwoFactorConfig {
        &self.config
    }

    /// Return the stored secret for the account, generating and persisting
    /// one on first call
    ///
    /// Idempotent after creation. A stored secret too short to be usable
    /// is replaced by a freshly generated one.
    pub fn get_or_create_secret(&self, scope: &str, account_id: &str) -> EnrollmentResult<Secret> {
        self.check_scope(scope)?;
        let store = self.lock_store()?;

        if let Some(secret) = load_valid_secret(store.conn(), scope, account_id)? {
            return Ok(secret);
        }

        let secret = crypto::generate_secret(self.config.secret_length)?;
        let record = EnrollmentRecord::with_secret(scope, account_id, secret.to_base32());
        let inserted = db::insert_enrollment_if_absent(store.conn(), &record)?;

        if !inserted {
            // Row already present: keep a concurrently written valid
            // secret, otherwise replace the unusable one
            if let Some(existing) = load_valid_secret(store.conn(), scope, account_id)? {
                return Ok(existing);
            }
            db::update_secret(store.conn(), scope, account_id, &secret.to_base32())?;
        }

        debug!(scope = %scope, "generated new 2FA secret");
        Ok(secret)
    }

    /// Turn 2FA on or off for the account
    ///
    /// Enabling requires a valid stored secret. Disabling an account that
    /// never enrolled is a no-op.
    pub fn set_enabled(&self, scope: &str, account_id: &str, enabled: bool) -> EnrollmentResult<()> {
        self.check_scope(scope)?;
        let store = self.lock_store()?;

        if enabled {
            if load_valid_secret(store.conn(), scope, account_id)?.is_none() {
                return Err(EnrollmentError::NoSecretEnrolled);
            }
            db::update_enabled(store.conn(), scope, account_id, true)?;
        } else {
            match db::update_enabled(store.conn(), scope, account_id, false) {
                Ok(()) | Err(DbError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        debug!(scope = %scope, enabled, "2FA status changed");
        Ok(())
    }

    /// Whether 2FA is currently enabled for the account
    pub fn is_enabled(&self, scope: &str, account_id: &str) -> EnrollmentResult<bool> {
        self.check_scope(scope)?;
        let store = self.lock_store()?;

        match db::get_enrollment(store.conn(), scope, account_id) {
            Ok(record) => Ok(record.enabled),
            Err(DbError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify a submitted code against the account's stored secret
    pub fn verify(
        &self,
        scope: &str,
        account_id: &str,
        submitted: &str,
        now: u64,
    ) -> EnrollmentResult<bool> {
        self.check_scope(scope)?;

        let encoded = {
            let store = self.lock_store()?;
            match db::get_enrollment(store.conn(), scope, account_id) {
                Ok(record) => record.secret,
                Err(DbError::NotFound(_)) => None,
                Err(e) => return Err(e.into()),
            }
        }
        .ok_or_else(|| EnrollmentError::NotEnrolled(format!("{}/{}", scope, account_id)))?;

        let secret = Secret::from_base32(&encoded)?;
        let accepted = crypto::verify_at(&secret, submitted, now, &self.config.totp)?;

        if !accepted {
            debug!(scope = %scope, "2FA code rejected");
        }
        Ok(accepted)
    }

    fn check_scope(&self, scope: &str) -> EnrollmentResult<()> {
        if self.config.scopes.iter().any(|s| s == scope) {
            Ok(())
        } else {
            Err(EnrollmentError::InvalidScope(scope.to_string()))
        }
    }

    fn lock_store(&self) -> EnrollmentResult<MutexGuard<'_, Database>> {
        self.db.lock().map_err(|_| EnrollmentError::StorePoisoned)
    }
}

/// Load the stored secret if it decodes and is long enough to use
fn load_valid_secret(
    conn: &Connection,
    scope: &str,
    account_id: &str,
) -> EnrollmentResult<Option<Secret>> {
    let record = match db::get_enrollment(conn, scope, account_id) {
        Ok(record) => record,
        Err(DbError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let Some(encoded) = record.secret else {
        return Ok(None);
    };

    match Secret::from_base32(&encoded) {
        Ok(secret) if secret.meets_legacy_minimum() => Ok(Some(secret)),
        _ => Ok(None),
    }
}
